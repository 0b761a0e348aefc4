//! Player collaborator surface
//!
//! The core never owns the wire protocol. A [`Player`] is handed a source URI
//! (and, at factory construction time, a transport handle plus relay config)
//! and negotiates/renders one live stream. The core drives its lifecycle and
//! consumes its connection-state reports.

use crate::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Connection state reported by a player binding.
///
/// Mirrors the transport-level peer connection state set. `Closed` is the
/// only restart-eligible state; `Disconnected` is transient (a reconnecting
/// stream), not terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Binding created, negotiation not started
    New,
    /// Negotiation in progress
    Connecting,
    /// Media flowing
    Connected,
    /// Transport degraded mid-stream; may recover or progress to Closed
    Disconnected,
    /// Negotiation or transport failure; recovered only by explicit restart
    Failed,
    /// Transport shut the stream down; terminal for this binding
    Closed,
}

impl ConnectionState {
    /// States rendered as a loading spinner by a UI layer
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::New | Self::Connecting | Self::Disconnected)
    }

    /// Only Closed exposes the manual restart affordance
    pub fn can_restart(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Terminal failure, rendered as an error glyph
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Boxed callback invoked on every player state report
pub type StateChangeHandler = Box<dyn Fn(ConnectionState) + Send + Sync>;

/// One live stream negotiation/render session.
///
/// # Lifecycle
///
/// 1. Created by [`PlayerFactory::create_player`]
/// 2. `on_state_change()` registered, then `play()` issued
/// 3. State reports arrive via the handler until `stop()`
/// 4. `stop()` releases all transport resources; idempotent, but the owning
///    controller calls it exactly once
#[async_trait]
pub trait Player: Send + Sync {
    /// Start negotiation. Resolves once negotiation is issued; progress and
    /// completion arrive as state reports. Fails on negotiation error.
    async fn play(&self) -> Result<()>;

    /// Stop playback and release all resources held by this player.
    async fn stop(&self);

    /// Register the state report handler. Called once, before `play()`.
    fn on_state_change(&self, handler: StateChangeHandler);
}

/// Creates players bound to a specific source.
///
/// Implementations hold the transport handle, relay configuration and render
/// target; the core only supplies the source URI.
#[async_trait]
pub trait PlayerFactory: Send + Sync {
    /// Create a player for the given source URI.
    ///
    /// Fails if transport-level resources cannot be allocated; the core maps
    /// the failure to [`ConnectionState::Failed`] without retrying.
    async fn create_player(&self, source: &str) -> Result<Arc<dyn Player>>;
}
