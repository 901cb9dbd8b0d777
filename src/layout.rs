//! Layout invalidation signal.
//!
//! List components do not render. When a mutation changes what a renderer
//! would show, they raise this signal and the consumer decides whether to
//! redraw or resize.

/// Tracks pending layout invalidations.
#[derive(Debug, Clone, Default)]
pub struct LayoutSignal {
    pending: bool,
    raised: u64,
}

impl LayoutSignal {
    /// Marks the layout as stale.
    pub fn invalidate(&mut self) {
        self.pending = true;
        self.raised += 1;
    }

    /// Returns whether an invalidation is pending and clears it.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Whether an invalidation is pending.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of invalidations raised since creation.
    pub fn raised(&self) -> u64 {
        self.raised
    }
}
