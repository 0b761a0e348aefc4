//! Grid layout management
//!
//! Exactly two canonical shapes exist: single view (1×1) and the full grid
//! (`GRID_MAX`×`GRID_MAX`). The choice is persisted as a presence-only
//! sentinel. Slots outside the visible region keep their stored selections;
//! unmounting them is the session's job, not the layout's.

use crate::store::SessionStore;
use crate::Result;
use tracing::debug;

/// Grid side length when multi-view is enabled
pub const GRID_MAX: usize = 2;

/// Current grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Row count
    pub rows: usize,
    /// Column count
    pub cols: usize,
}

impl GridLayout {
    /// Single view
    pub const SINGLE: GridLayout = GridLayout { rows: 1, cols: 1 };
    /// Full grid
    pub const FULL: GridLayout = GridLayout {
        rows: GRID_MAX,
        cols: GRID_MAX,
    };

    /// Slot index for a visible cell: row×width+col
    pub fn slot_index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row},{col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Number of visible slots
    pub fn slot_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Tracks the current grid shape and persists the choice
pub struct LayoutManager {
    full: bool,
    store: SessionStore,
}

impl LayoutManager {
    /// Create the manager, restoring the persisted shape
    pub fn new(store: SessionStore) -> Self {
        let full = store.load_multi_view();
        debug!(
            "Layout restored: {}",
            if full { "multi view" } else { "single view" }
        );
        Self { full, store }
    }

    /// Collapse to a canonical shape and persist the flag.
    ///
    /// The in-memory shape applies even if persistence fails; the error is
    /// returned for logging.
    pub fn set_layout(&mut self, full: bool) -> Result<()> {
        self.full = full;
        self.store.save_multi_view(full)
    }

    /// Current grid dimensions
    pub fn layout(&self) -> GridLayout {
        if self.full {
            GridLayout::FULL
        } else {
            GridLayout::SINGLE
        }
    }

    /// Number of currently visible slots
    pub fn visible_slots(&self) -> usize {
        self.layout().slot_count()
    }
}
