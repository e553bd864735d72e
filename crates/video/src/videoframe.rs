use {
    image::Image,
    std::time::{Duration, Instant},
};

/// One successful capture. Frames are shared as `Arc<VideoFrame>` and never
/// mutated after publication.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Image,
    /// Monotonic per-worker counter, starting at 1.
    pub sequence: u64,
    pub captured_at: Instant,
}

impl VideoFrame {
    pub fn new(image: Image, sequence: u64) -> Self {
        Self {
            image,
            sequence,
            captured_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }
}
