/// Per-renderer frame counters.
///
/// Skips are expected backpressure, so they are counted here rather than logged.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    /// Frames submitted and scheduled for presentation.
    pub presented: u64,
    /// Frames skipped because no drawable was available.
    pub skipped_no_drawable: u64,
    /// Frames skipped because no command recording scope could be opened.
    pub skipped_no_encoder: u64,
    /// Set once the surface failed unrecoverably; no further frame can present.
    pub surface_failed: bool,
}

impl FrameStats {
    pub fn requested(&self) -> u64 {
        self.presented + self.skipped()
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_no_drawable + self.skipped_no_encoder
    }
}
