use {crate::VideoFrame, std::sync::Arc, tokio::sync::watch};

/// Single-slot "most recent frame" cell.
///
/// Publishing swaps in a new `Arc` handle; readers clone the handle they see,
/// so a reader holds either the previous complete frame or the new one,
/// never a partially written buffer. The slot starts empty and is never
/// cleared once filled.
#[derive(Clone, Debug)]
pub struct LatestFrame {
    sender: Arc<watch::Sender<Option<Arc<VideoFrame>>>>,
}

impl Default for LatestFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl LatestFrame {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, frame: VideoFrame) {
        self.sender.send_replace(Some(Arc::new(frame)));
    }

    pub fn latest(&self) -> Option<Arc<VideoFrame>> {
        self.sender.borrow().clone()
    }

    /// Wait until a frame with a sequence number above `after` is available.
    pub async fn wait_newer(&self, after: u64) -> Arc<VideoFrame> {
        let mut receiver = self.sender.subscribe();
        loop {
            if let Some(frame) = receiver.borrow_and_update().as_ref() {
                if frame.sequence > after {
                    return Arc::clone(frame);
                }
            }
            // the sender lives in self, so the channel cannot close here
            let _ = receiver.changed().await;
        }
    }
}
