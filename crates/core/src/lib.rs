//! Session-management core for multi-view live stream viewers
//!
//! Maps grid slots to selected catalog sources, drives each slot's
//! independent connection/player lifecycle, forces reconnects through a
//! per-slot revision counter, and persists selection/layout across restarts.
//!
//! The wire protocol, rendering and catalog traversal are external
//! collaborators behind the [`player::Player`], [`player::PlayerFactory`] and
//! [`catalog::CatalogClient`] traits. This crate owns the state machine and
//! the resource-ownership discipline: at most one live binding per slot, torn
//! down strictly before its replacement is created.

pub mod catalog;
pub mod config;
pub mod error;
pub mod layout;
pub mod player;
pub mod session;
pub mod store;

pub use catalog::{CatalogClient, CatalogEntry, FetchState, UriInfo};
pub use config::{RelayServerConfig, SessionConfig};
pub use error::{Error, Result};
pub use layout::{GridLayout, LayoutManager, GRID_MAX};
pub use player::{ConnectionState, Player, PlayerFactory, StateChangeHandler};
pub use session::{
    MultiViewSession, Selection, SessionEvent, SessionHandle, SessionRegistry, SlotRecord,
    SlotStatus, SLOT_COUNT,
};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SessionStore};
