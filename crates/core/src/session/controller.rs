//! Slot lifecycle controller
//!
//! One controller per slot. Each owns at most one live player binding, keyed
//! by the triple (transport-ready, selection, revision). Any identity change
//! tears the old binding down (`stop()` awaited, exactly once) strictly
//! before the next binding is created, so source swaps never leak a prior
//! binding's transport resources and no two bindings for one slot are ever
//! live at the same instant.

use crate::player::{ConnectionState, Player, PlayerFactory};
use crate::session::registry::Selection;
use crate::session::SessionEvent;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

/// Observable state of one slot, consumed by a UI layer.
///
/// `Unset` renders the idle glyph; loading states a spinner; `Failed` an
/// error glyph; `Closed` the manual restart control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    /// No binding (nothing selected, transport down, or torn down)
    #[default]
    Unset,
    /// A binding exists and last reported this state
    Active(ConnectionState),
}

impl SlotStatus {
    /// No binding and nothing in flight
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Loading/connecting/reconnecting
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Active(state) if state.is_loading())
    }

    /// Restart affordance visible
    pub fn can_restart(&self) -> bool {
        matches!(self, Self::Active(state) if state.can_restart())
    }

    /// Error glyph visible
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Active(state) if state.is_failed())
    }
}

/// Binding identity: the (selection, revision) half of the triple. The
/// transport-ready bit collapses to "no key" when false.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BindingKey {
    source: String,
    revision: u64,
}

/// The live pairing of this slot with a running player
struct PlayerBinding {
    id: u64,
    player: Arc<dyn Player>,
}

/// Drives one slot's connection/player lifecycle
pub struct SlotController {
    slot: usize,
    factory: Arc<dyn PlayerFactory>,
    events: mpsc::UnboundedSender<SessionEvent>,
    binding: Option<PlayerBinding>,
    bound_key: Option<BindingKey>,
    next_binding_id: u64,
    status_tx: watch::Sender<SlotStatus>,
}

impl SlotController {
    pub(crate) fn new(
        slot: usize,
        factory: Arc<dyn PlayerFactory>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let (status_tx, _) = watch::channel(SlotStatus::Unset);
        Self {
            slot,
            factory,
            events,
            binding: None,
            bound_key: None,
            next_binding_id: 0,
            status_tx,
        }
    }

    /// Current observable status
    pub fn status(&self) -> SlotStatus {
        *self.status_tx.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<SlotStatus> {
        self.status_tx.subscribe()
    }

    /// Reconcile the binding with the current triple.
    ///
    /// No-op while the identity is unchanged; otherwise teardown-then-create.
    /// A factory failure leaves the key recorded, so an unchanged triple is
    /// never retried automatically.
    pub(crate) async fn sync(&mut self, ready: bool, selection: &Selection, revision: u64) {
        let desired = match (ready, selection) {
            (true, Selection::Selected(uri)) => Some(BindingKey {
                source: uri.clone(),
                revision,
            }),
            _ => None,
        };

        if desired == self.bound_key {
            return;
        }

        self.teardown().await;
        self.bound_key = desired.clone();
        if let Some(key) = desired {
            self.create_binding(key).await;
        }
    }

    /// Tear down on unmount or shutdown
    pub(crate) async fn dispose(&mut self) {
        self.teardown().await;
        self.bound_key = None;
    }

    /// Route a player state report; reports from torn-down bindings are stale
    /// and discarded.
    pub(crate) fn on_player_state(&mut self, binding_id: u64, state: ConnectionState) {
        match &self.binding {
            Some(binding) if binding.id == binding_id => {
                debug!("Slot {}: connection state '{}'", self.slot, state);
                self.status_tx.send_replace(SlotStatus::Active(state));
            }
            _ => {
                debug!(
                    "Slot {}: discarding stale state '{}' from binding {}",
                    self.slot, state, binding_id
                );
            }
        }
    }

    async fn teardown(&mut self) {
        if let Some(binding) = self.binding.take() {
            debug!("Slot {}: stopping binding {}", self.slot, binding.id);
            // stop() completes before the next binding is issued
            binding.player.stop().await;
        }
        self.status_tx.send_replace(SlotStatus::Unset);
    }

    async fn create_binding(&mut self, key: BindingKey) {
        let id = self.next_binding_id;
        self.next_binding_id = self.next_binding_id.wrapping_add(1);

        info!(
            "Slot {}: binding source '{}' (revision {})",
            self.slot, key.source, key.revision
        );

        let player = match self.factory.create_player(&key.source).await {
            Ok(player) => player,
            Err(e) => {
                error!(
                    "Slot {}: failed to create player for '{}': {}",
                    self.slot, key.source, e
                );
                self.status_tx
                    .send_replace(SlotStatus::Active(ConnectionState::Failed));
                return;
            }
        };

        self.status_tx
            .send_replace(SlotStatus::Active(ConnectionState::New));

        let slot = self.slot;
        let events = self.events.clone();
        player.on_state_change(Box::new(move |state| {
            let _ = events.send(SessionEvent::PlayerState {
                slot,
                binding: id,
                state,
            });
        }));

        // Negotiation completion arrives as a later discrete event; the
        // calling context never blocks on play().
        let events = self.events.clone();
        let negotiating = Arc::clone(&player);
        tokio::spawn(async move {
            if let Err(e) = negotiating.play().await {
                error!("Slot {}: play() failed: {}", slot, e);
                let _ = events.send(SessionEvent::PlayerState {
                    slot,
                    binding: id,
                    state: ConnectionState::Failed,
                });
            }
        });

        self.binding = Some(PlayerBinding { id, player });
    }
}
