use {crate::*, image::Image};

/// A QR decoding strategy.
///
/// Implementations are CPU-bound and may block; callers run them off the
/// async executor.
pub trait Detect: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &str;

    /// Every symbol found in `image`, in detection order.
    fn detect(&self, image: &Image) -> Result<Vec<SymbolOccurrence>, DecodeError>;
}
