//! Session registry: the single writer for slot selections and revisions
//!
//! Owns the fixed-size slot array. All mutation goes through [`SessionRegistry`],
//! which serializes writes by ownership (one logical writer), persists the full
//! selection array on every `set_source`, and notifies only the dependents of
//! the mutated slot through a per-slot watch channel.

use crate::layout::GRID_MAX;
use crate::store::SessionStore;
use crate::Result;
use tokio::sync::watch;
use tracing::{debug, info};

/// Number of slots; all exist from startup regardless of the current layout
pub const SLOT_COUNT: usize = GRID_MAX * GRID_MAX;

/// A slot's selected source: idle is explicit, never a null string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No source selected
    #[default]
    Empty,
    /// An opaque catalog source id
    Selected(String),
}

impl Selection {
    /// The selected URI, if any
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Selected(uri) => Some(uri),
            Self::Empty => None,
        }
    }

    /// Whether the slot is idle
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Snapshot of one slot's registry record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotRecord {
    /// Current selection
    pub selection: Selection,
    /// Reconnect-forcing counter; monotonic, wraps only at the u64 ceiling
    pub revision: u64,
}

/// Fixed-size registry of slot selections and revisions.
///
/// Out-of-range slot indices are programming errors (all callers are bounded
/// by the layout dimensions) and panic rather than returning `Err`.
pub struct SessionRegistry {
    slots: Vec<SlotRecord>,
    notifiers: Vec<watch::Sender<SlotRecord>>,
    store: SessionStore,
}

impl SessionRegistry {
    /// Create the registry, restoring persisted selections.
    ///
    /// Restored slots start at revision 0; revisions are ephemeral and never
    /// persisted. A persisted array shorter than [`SLOT_COUNT`] is padded
    /// with empty slots, a longer one truncated.
    pub fn new(store: SessionStore) -> Self {
        let mut restored = store.load_selections();
        restored.truncate(SLOT_COUNT);
        restored.resize(SLOT_COUNT, Selection::Empty);

        let slots: Vec<SlotRecord> = restored
            .into_iter()
            .map(|selection| SlotRecord {
                selection,
                revision: 0,
            })
            .collect();

        let notifiers = slots
            .iter()
            .map(|record| watch::channel(record.clone()).0)
            .collect();

        info!(
            "Session registry restored: {} of {} slots selected",
            slots.iter().filter(|r| !r.selection.is_empty()).count(),
            SLOT_COUNT
        );

        Self {
            slots,
            notifiers,
            store,
        }
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < SLOT_COUNT,
            "slot index {index} out of range (slot count {SLOT_COUNT})"
        );
    }

    /// Current selection for a slot; no side effects
    pub fn source(&self, index: usize) -> &Selection {
        self.check_index(index);
        &self.slots[index].selection
    }

    /// Current revision counter for a slot
    pub fn revision(&self, index: usize) -> u64 {
        self.check_index(index);
        self.slots[index].revision
    }

    /// Full record snapshot for a slot
    pub fn record(&self, index: usize) -> SlotRecord {
        self.check_index(index);
        self.slots[index].clone()
    }

    /// Subscribe to changes of one slot only
    pub fn subscribe(&self, index: usize) -> watch::Receiver<SlotRecord> {
        self.check_index(index);
        self.notifiers[index].subscribe()
    }

    /// Select a source for a slot.
    ///
    /// Updates the selection, increments the revision, notifies the slot's
    /// dependents, then persists the full selection array. The in-memory
    /// update and notification apply even if persistence fails; the error is
    /// returned for logging.
    pub fn set_source(&mut self, index: usize, uri: impl Into<String>) -> Result<()> {
        self.check_index(index);
        let uri = uri.into();

        let record = &mut self.slots[index];
        record.selection = Selection::Selected(uri.clone());
        record.revision = record.revision.wrapping_add(1);
        debug!(
            "Slot {} selected '{}' (revision {})",
            index, uri, record.revision
        );
        self.notifiers[index].send_replace(record.clone());

        let selections: Vec<Selection> = self
            .slots
            .iter()
            .map(|record| record.selection.clone())
            .collect();
        self.store.save_selections(&selections)
    }

    /// Increment a slot's revision without changing its selection.
    ///
    /// Forces binding recreation for an unchanged source; never persisted.
    pub fn bump_revision(&mut self, index: usize) {
        self.check_index(index);
        let record = &mut self.slots[index];
        record.revision = record.revision.wrapping_add(1);
        debug!("Slot {} revision bumped to {}", index, record.revision);
        self.notifiers[index].send_replace(record.clone());
    }
}
