use {
    crate::*,
    base::{Shutdown, Vec2, blocking_retry_until},
    image::{Image, PixelFormat},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::task::{JoinHandle, spawn_blocking},
};

// delay between attempts to (re)open the camera
const DEFAULT_REOPEN_DELAY: Duration = Duration::from_secs(2);

// consecutive capture failures before the device is closed and reopened
const DEFAULT_MAX_CAPTURE_FAILURES: u32 = 30;

/// Read access to the most recent frame.
///
/// Both methods are non-blocking.
pub trait FrameSource: Send + Sync {
    /// Most recent successful capture, or `None` if nothing has been captured yet.
    fn latest(&self) -> Option<Arc<VideoFrame>>;

    /// Whether the acquisition device is currently open.
    fn is_device_open(&self) -> bool;
}

/// Negotiated stream parameters, as reported by the device after opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub frame_rate: f32,
}

/// A camera backend driven by the acquisition worker thread.
///
/// All three methods are called from the same OS thread.
pub trait VideoInDevice: Send {
    /// Open the device, returning the parameters that were actually set.
    fn open(&mut self) -> Result<VideoInfo, VideoError>;
    /// Close the device, if open.
    fn close(&mut self);
    /// Block until the next frame is available.
    fn blocking_capture(&mut self) -> Result<Image, VideoError>;
}

#[derive(Debug, Clone)]
pub enum VideoInBackend {
    #[cfg(feature = "v4l2")]
    V4l2(v4l2::V4l2Config),
}

#[derive(Debug, Clone)]
pub struct VideoInConfig {
    pub reopen_delay: Duration,
    pub max_capture_failures: u32,
}

impl Default for VideoInConfig {
    fn default() -> Self {
        Self {
            reopen_delay: DEFAULT_REOPEN_DELAY,
            max_capture_failures: DEFAULT_MAX_CAPTURE_FAILURES,
        }
    }
}

impl VideoInConfig {
    pub fn with_reopen_delay(mut self, reopen_delay: Duration) -> Self {
        self.reopen_delay = reopen_delay;
        self
    }

    pub fn with_max_capture_failures(mut self, max_capture_failures: u32) -> Self {
        self.max_capture_failures = max_capture_failures.max(1);
        self
    }
}

/// Continuously running frame acquisition.
///
/// The worker opens the device (retrying forever with a fixed delay), then
/// publishes every successful capture. Failed captures are skipped and keep
/// the previous frame; a run of failures closes and reopens the device.
/// Dropping the `VideoIn` stops the worker.
pub struct VideoIn {
    latest: LatestFrame,
    device_open: Arc<AtomicBool>,
    stop: Shutdown,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    fn create_device(backend: VideoInBackend) -> Box<dyn VideoInDevice> {
        match backend {
            #[cfg(feature = "v4l2")]
            VideoInBackend::V4l2(config) => Box::new(v4l2::V4l2::new(config)),
        }
    }

    /// Start acquisition on a built-in backend.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(backend: VideoInBackend, config: VideoInConfig, shutdown: &Shutdown) -> Self {
        Self::spawn(Self::create_device(backend), config, shutdown)
    }

    /// Start acquisition on an arbitrary device.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        device: Box<dyn VideoInDevice>,
        config: VideoInConfig,
        shutdown: &Shutdown,
    ) -> Self {
        let latest = LatestFrame::new();
        let device_open = Arc::new(AtomicBool::new(false));

        // private stop signal: tripped by the process-wide shutdown or by drop
        let stop = Shutdown::new();
        tokio::spawn({
            let shutdown = shutdown.clone();
            let stop = stop.clone();
            async move {
                tokio::select! {
                    _ = shutdown.triggered() => stop.trigger(),
                    _ = stop.triggered() => {}
                }
            }
        });

        let join_handle = spawn_blocking({
            let latest = latest.clone();
            let device_open = Arc::clone(&device_open);
            let stop = stop.clone();
            move || run_worker(device, config, latest, device_open, stop)
        });

        Self {
            latest,
            device_open,
            stop,
            join_handle: Some(join_handle),
        }
    }

    /// Handle to the frame slot, for consumers that want to await new frames.
    pub fn frames(&self) -> LatestFrame {
        self.latest.clone()
    }

    /// Stop the worker and wait for it to close the device.
    pub async fn close(mut self) {
        self.stop.trigger();
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(error) = join_handle.await {
                log::error!("video worker: join failed: {}", error);
            }
        }
    }
}

impl FrameSource for VideoIn {
    fn latest(&self) -> Option<Arc<VideoFrame>> {
        self.latest.latest()
    }

    fn is_device_open(&self) -> bool {
        self.device_open.load(Ordering::Acquire)
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.stop.trigger();
    }
}

fn run_worker(
    mut device: Box<dyn VideoInDevice>,
    config: VideoInConfig,
    latest: LatestFrame,
    device_open: Arc<AtomicBool>,
    stop: Shutdown,
) {
    let mut sequence: u64 = 0;

    while !stop.is_triggered() {
        let Some(info) =
            blocking_retry_until("video worker: open camera", config.reopen_delay, &stop, || {
                device.open()
            })
        else {
            break;
        };
        device_open.store(true, Ordering::Release);
        log::info!(
            "video worker: camera open, {} {:?} at {:.1} fps",
            info.size,
            info.format,
            info.frame_rate
        );

        // keep pumping frames until capturing fails too often
        let mut failures: u32 = 0;
        while !stop.is_triggered() {
            match device.blocking_capture() {
                Ok(image) => {
                    failures = 0;
                    sequence += 1;
                    latest.publish(VideoFrame::new(image, sequence));
                }
                Err(error) => {
                    failures += 1;
                    log::debug!("video worker: capture failed ({}): {}", failures, error);
                    if failures >= config.max_capture_failures {
                        log::error!(
                            "video worker: {} consecutive capture failures, reopening camera",
                            failures
                        );
                        break;
                    }
                }
            }
        }

        device_open.store(false, Ordering::Release);
        device.close();
        if !stop.blocking_sleep(config.reopen_delay) {
            break;
        }
    }

    device_open.store(false, Ordering::Release);
    device.close();
    log::info!("video worker: stopped");
}

#[cfg(feature = "v4l2")]
pub mod v4l2;
