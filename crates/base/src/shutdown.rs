use {
    std::{sync::Arc, time::Duration},
    tokio::sync::watch,
};

// granularity of blocking sleeps, bounds how late a worker thread notices shutdown
const BLOCKING_SLICE: Duration = Duration::from_millis(50);

/// Process-wide stop signal shared by every loop in the station.
///
/// Cloning is cheap; all clones observe the same signal. Once triggered it
/// stays triggered.
#[derive(Clone, Debug)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolve once the signal has been triggered.
    pub async fn triggered(&self) {
        let mut receiver = self.sender.subscribe();
        // the sender lives in self, so wait_for cannot fail with a closed channel
        let _ = receiver.wait_for(|stop| *stop).await;
    }

    /// Sleep for `duration` unless shutdown arrives first.
    ///
    /// Returns `true` if the full duration elapsed.
    pub async fn sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_triggered(),
            _ = self.triggered() => false,
        }
    }

    /// Thread-blocking variant of [`Shutdown::sleep`] for worker threads.
    pub fn blocking_sleep(&self, duration: Duration) -> bool {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.is_triggered() {
                return false;
            }
            let slice = remaining.min(BLOCKING_SLICE);
            std::thread::sleep(slice);
            remaining -= slice;
        }
        !self.is_triggered()
    }
}
