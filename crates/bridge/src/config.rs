use std::{path::PathBuf, time::Duration};

pub const DEFAULT_DEBUG_FRAME_PATH: &str = "/app/output/debug_last_frame.jpg";

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Where the last undecodable frame is written; `None` disables it.
    pub debug_frame_path: Option<PathBuf>,
    pub debug_jpeg_quality: u8,
    /// Upper bound on one store unit of work.
    pub store_timeout: Duration,
    /// Deadline for completing a line on the link once it has started.
    pub read_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            debug_frame_path: Some(PathBuf::from(DEFAULT_DEBUG_FRAME_PATH)),
            debug_jpeg_quality: 90,
            store_timeout: Duration::from_secs(5),
            read_timeout: link::DEFAULT_READ_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    pub fn with_debug_frame_path(mut self, path: Option<PathBuf>) -> Self {
        self.debug_frame_path = path;
        self
    }

    pub fn with_debug_jpeg_quality(mut self, quality: u8) -> Self {
        self.debug_jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
