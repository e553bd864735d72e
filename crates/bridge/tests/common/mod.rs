#![allow(dead_code)]

use {
    base::{Shutdown, Vec2},
    bridge::{BridgeConfig, BridgeError, LinkProtocol, QrClassifier},
    image::{Image, PixelFormat},
    qr::{DecodeError, DecoderChain, Detect, SymbolOccurrence},
    std::{
        future::Future,
        sync::{
            Arc, Mutex,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    store::{MemoryStore, TrackingRecord, TrackingStore, UserRecord},
    tokio::io::{
        AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf, duplex,
    },
    video::{FrameSource, VideoFrame},
};

/// Frame source whose state the test sets directly.
#[derive(Default)]
pub struct StubFrames {
    open: AtomicBool,
    frame: Mutex<Option<Arc<VideoFrame>>>,
}

impl StubFrames {
    pub fn closed() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open_without_frame() -> Arc<Self> {
        let frames = Self::default();
        frames.open.store(true, Ordering::SeqCst);
        Arc::new(frames)
    }

    pub fn with_image(image: Image) -> Arc<Self> {
        let frames = Self::open_without_frame();
        *frames.frame.lock().unwrap() = Some(Arc::new(VideoFrame::new(image, 1)));
        frames
    }

    pub fn with_blank_frame() -> Arc<Self> {
        Self::with_image(blank_image())
    }
}

impl FrameSource for StubFrames {
    fn latest(&self) -> Option<Arc<VideoFrame>> {
        self.frame.lock().unwrap().clone()
    }

    fn is_device_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

pub fn blank_image() -> Image {
    Image::new(Vec2::new(32, 24), vec![200; 32 * 24], PixelFormat::Luma8)
}

/// Decoder strategy with a canned answer.
pub struct Canned(pub Vec<SymbolOccurrence>);

impl Detect for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn detect(&self, _image: &Image) -> Result<Vec<SymbolOccurrence>, DecodeError> {
        Ok(self.0.clone())
    }
}

pub fn symbol(text: &str, x: f32) -> SymbolOccurrence {
    SymbolOccurrence::new(text, Vec2::new(x, 100.0))
}

pub fn decoding(occurrences: Vec<SymbolOccurrence>) -> Arc<DecoderChain> {
    Arc::new(DecoderChain::new(vec![Box::new(Canned(occurrences))]))
}

pub fn decoding_nothing() -> Arc<DecoderChain> {
    decoding(Vec::new())
}

/// TN123 belongs to user 7 in dorm 12.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_user(UserRecord::new(7, "12")).await;
    store.insert_user(UserRecord::new(8, "Annex B")).await;
    store.insert_tracking(TrackingRecord::new("TN123", 7)).await;
    store.insert_tracking(TrackingRecord::new("TN456", 8)).await;
    store.insert_tracking(TrackingRecord::new("TN789", 99)).await;
    store
}

pub fn quiet_config() -> BridgeConfig {
    BridgeConfig::default()
        .with_debug_frame_path(None)
        .with_read_timeout(Duration::from_millis(200))
}

/// The microcontroller end of the link.
pub struct Peer {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
}

impl Peer {
    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).await.unwrap();
    }

    /// Next response line, without its newline.
    pub async fn recv(&mut self) -> String {
        let mut line = String::new();
        tokio::time::timeout(Duration::from_secs(5), self.reader.read_line(&mut line))
            .await
            .expect("no response from station")
            .unwrap();
        assert!(line.ends_with('\n'), "response must be newline-terminated");
        line.trim_end_matches('\n').to_string()
    }

    /// True if nothing arrives within `wait`.
    pub async fn is_silent_for(&mut self, wait: Duration) -> bool {
        let mut line = String::new();
        tokio::time::timeout(wait, self.reader.read_line(&mut line))
            .await
            .is_err()
    }
}

pub fn protocol<S: TrackingStore>(
    frames: Arc<dyn FrameSource>,
    decoder: Arc<DecoderChain>,
    store: S,
    config: BridgeConfig,
) -> (LinkProtocol<DuplexStream, S>, Peer) {
    let (station, peer) = duplex(4096);
    let classifier = Arc::new(QrClassifier::new(store, config.store_timeout));
    let protocol = LinkProtocol::new(station, frames, decoder, classifier, config);
    let (reader, writer) = tokio::io::split(peer);
    (
        protocol,
        Peer {
            reader: BufReader::new(reader),
            writer,
        },
    )
}

/// Run the protocol alongside `script`, shutting it down once the script ends.
pub async fn drive<S: TrackingStore, T>(
    protocol: LinkProtocol<DuplexStream, S>,
    script: impl Future<Output = T>,
) -> (Result<(), BridgeError>, T) {
    let shutdown = Shutdown::new();
    let client = async {
        let out = script.await;
        shutdown.trigger();
        out
    };
    tokio::join!(protocol.run(&shutdown), client)
}
