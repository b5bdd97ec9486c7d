/// How a paint operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStatus {
    /// Faces were selected and handed to the host.
    #[default]
    Completed,
    /// The element or material was the host's sentinel; nothing was touched.
    InvalidInput,
    /// The element has no solid above the volume threshold.
    NoSolid,
    /// No picked faces were supplied.
    NothingPicked,
}

/// Per-call summary of a paint or remove-paint operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintReport {
    pub status: PaintStatus,
    /// Faces that qualified for the operation.
    pub matched: usize,
    /// Faces the host accepted.
    pub applied: usize,
    /// Faces the host refused (already painted, not painted, ...).
    pub rejected: usize,
    /// Picked faces ignored because they carry no captured plane.
    pub skipped_items: usize,
}

impl PaintReport {
    pub(crate) fn with_status(status: PaintStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Adds another report's face counts to this one.
    pub fn merge(&mut self, other: &Self) {
        self.matched += other.matched;
        self.applied += other.applied;
        self.rejected += other.rejected;
        self.skipped_items += other.skipped_items;
    }
}
