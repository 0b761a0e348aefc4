//! Session management: registry, slot lifecycle and top-level composition
//!
//! [`MultiViewSession`] wires the persistence adapter, session registry,
//! layout manager and one lifecycle controller per slot behind a single event
//! loop. All transitions happen as reactions to discrete [`SessionEvent`]s on
//! one logical task, so no partial mutation ever interleaves across slots.

pub mod controller;
pub mod registry;

pub use controller::{SlotController, SlotStatus};
pub use registry::{Selection, SessionRegistry, SlotRecord, SLOT_COUNT};

use crate::catalog::{CatalogClient, FetchState};
use crate::layout::{GridLayout, LayoutManager};
use crate::player::{ConnectionState, PlayerFactory};
use crate::store::{KeyValueStore, SessionStore};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Discrete events driving the session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Transport readiness changed
    TransportReady(bool),
    /// User selected a source for a slot
    Select {
        /// Slot index
        slot: usize,
        /// Opaque catalog source id
        source: String,
    },
    /// User triggered the restart affordance (valid only in Closed)
    Restart {
        /// Slot index
        slot: usize,
    },
    /// User toggled the grid shape
    SetLayout {
        /// Full grid when true, single view when false
        full: bool,
    },
    /// A player binding reported a connection state
    PlayerState {
        /// Slot index
        slot: usize,
        /// Binding id the report belongs to
        binding: u64,
        /// Reported state
        state: ConnectionState,
    },
    /// Dispose all bindings and stop the event loop
    Shutdown,
}

/// Cloneable sender half handed to UI layers
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    /// Select a source for a slot
    pub fn select(&self, slot: usize, source: impl Into<String>) {
        let _ = self.tx.send(SessionEvent::Select {
            slot,
            source: source.into(),
        });
    }

    /// Force a reconnect of the slot's current source
    pub fn restart(&self, slot: usize) {
        let _ = self.tx.send(SessionEvent::Restart { slot });
    }

    /// Switch between single view and the full grid
    pub fn set_layout(&self, full: bool) {
        let _ = self.tx.send(SessionEvent::SetLayout { full });
    }

    /// Report transport readiness
    pub fn transport_ready(&self, ready: bool) {
        let _ = self.tx.send(SessionEvent::TransportReady(ready));
    }

    /// Stop the session
    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionEvent::Shutdown);
    }
}

/// Top-level composition of the session core
pub struct MultiViewSession {
    registry: SessionRegistry,
    layout: LayoutManager,
    controllers: Vec<SlotController>,
    catalog: Arc<dyn CatalogClient>,
    transport_ready: bool,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl MultiViewSession {
    /// Build the session, restoring persisted selections and layout
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        factory: Arc<dyn PlayerFactory>,
        catalog: Arc<dyn CatalogClient>,
    ) -> Self {
        let session_store = SessionStore::new(store);
        let registry = SessionRegistry::new(session_store.clone());
        let layout = LayoutManager::new(session_store);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controllers = (0..SLOT_COUNT)
            .map(|slot| SlotController::new(slot, Arc::clone(&factory), events_tx.clone()))
            .collect();

        Self {
            registry,
            layout,
            controllers,
            catalog,
            transport_ready: false,
            events_tx,
            events_rx,
        }
    }

    /// Sender half for UI layers
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            tx: self.events_tx.clone(),
        }
    }

    /// Registry read access
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Current grid dimensions
    pub fn layout(&self) -> GridLayout {
        self.layout.layout()
    }

    /// Current observable status of a slot
    pub fn slot_status(&self, slot: usize) -> SlotStatus {
        self.controllers[slot].status()
    }

    /// Subscribe to one slot's status changes
    pub fn subscribe_slot(&self, slot: usize) -> watch::Receiver<SlotStatus> {
        self.controllers[slot].subscribe()
    }

    /// Catalog read access
    pub fn catalog(&self) -> &Arc<dyn CatalogClient> {
        &self.catalog
    }

    /// Trigger a child fetch on user expansion; already-fetching nodes are
    /// left alone and fetch failures only logged.
    pub async fn expand(&self, uri: &str) {
        let info = self.catalog.uri_info(uri).unwrap_or_default();
        if info.fetch_state == FetchState::Fetching {
            return;
        }
        if let Err(e) = self.catalog.fetch_children(uri).await {
            warn!("Catalog fetch for '{}' failed: {}", uri, e);
        }
    }

    /// Run the event loop until shutdown
    pub async fn run(&mut self) {
        info!("Session event loop started");
        while let Some(event) = self.events_rx.recv().await {
            let stop = matches!(event, SessionEvent::Shutdown);
            self.handle_event(event).await;
            if stop {
                break;
            }
        }
        info!("Session event loop stopped");
    }

    /// Drain and handle all queued events; used when the embedder drives the
    /// loop itself.
    pub async fn process_pending(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event).await;
        }
    }

    /// React to one discrete event
    pub async fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::TransportReady(ready) => {
                if ready == self.transport_ready {
                    return;
                }
                info!("Transport {}", if ready { "ready" } else { "lost" });
                self.transport_ready = ready;
                self.sync_all().await;
            }
            SessionEvent::Select { slot, source } => {
                if let Err(e) = self.registry.set_source(slot, source) {
                    warn!("Persisting slot {} selection failed: {}", slot, e);
                }
                self.sync_slot(slot).await;
            }
            SessionEvent::Restart { slot } => {
                debug!("Slot {} restart requested", slot);
                self.registry.bump_revision(slot);
                self.sync_slot(slot).await;
            }
            SessionEvent::SetLayout { full } => {
                if let Err(e) = self.layout.set_layout(full) {
                    warn!("Persisting layout failed: {}", e);
                }
                self.sync_all().await;
            }
            SessionEvent::PlayerState {
                slot,
                binding,
                state,
            } => {
                self.controllers[slot].on_player_state(binding, state);
            }
            SessionEvent::Shutdown => {
                for controller in &mut self.controllers {
                    controller.dispose().await;
                }
            }
        }
    }

    async fn sync_slot(&mut self, slot: usize) {
        let mounted = slot < self.layout.visible_slots();
        let record = self.registry.record(slot);
        self.controllers[slot]
            .sync(
                self.transport_ready && mounted,
                &record.selection,
                record.revision,
            )
            .await;
    }

    async fn sync_all(&mut self) {
        for slot in 0..SLOT_COUNT {
            self.sync_slot(slot).await;
        }
    }
}
