use {
    crate::*,
    base::Shutdown,
    link::{Command, LineReader, Response, write_json_line},
    qr::DecoderChain,
    std::sync::Arc,
    store::{TrackingStatus, TrackingStore},
    tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf},
    video::{FrameSource, VideoFrame},
};

/// Command loop on one link connection.
///
/// `READ_QR` always gets exactly one response line. `update_status` and
/// everything else is handled silently.
pub struct LinkProtocol<L, S> {
    reader: LineReader<ReadHalf<L>>,
    writer: WriteHalf<L>,
    frames: Arc<dyn FrameSource>,
    decoder: Arc<DecoderChain>,
    classifier: Arc<QrClassifier<S>>,
    config: BridgeConfig,
}

impl<L: AsyncRead + AsyncWrite, S: TrackingStore> LinkProtocol<L, S> {
    pub fn new(
        link: L,
        frames: Arc<dyn FrameSource>,
        decoder: Arc<DecoderChain>,
        classifier: Arc<QrClassifier<S>>,
        config: BridgeConfig,
    ) -> Self {
        let (read_half, writer) = tokio::io::split(link);
        Self {
            reader: LineReader::with_timeout(read_half, config.read_timeout),
            writer,
            frames,
            decoder,
            classifier,
            config,
        }
    }

    /// Serve commands until `shutdown` fires or the link fails.
    ///
    /// Returns `Ok(())` on shutdown. End of stream is [`link::LinkError::Closed`].
    pub async fn run(mut self, shutdown: &Shutdown) -> Result<(), BridgeError> {
        loop {
            tokio::select! {
                _ = shutdown.triggered() => {
                    log::info!("protocol: shutting down");
                    return Ok(());
                }
                ready = self.reader.ready() => ready?,
            }

            let Some(line) = self.reader.read_line().await? else {
                continue;
            };

            match Command::parse(&line) {
                Command::ReadQr => {
                    let response = self.read_qr().await;
                    write_json_line(&mut self.writer, &response).await?;
                }
                Command::UpdateStatus {
                    tracking_number,
                    status,
                } => {
                    // fire and forget, the peer never waits for an answer
                    if let Err(error) = self.update_status(&tracking_number, &status).await {
                        log::error!(
                            "protocol: updating {} to {} failed: {}",
                            tracking_number,
                            status,
                            error
                        );
                    }
                }
                Command::MalformedUpdate { reason } => {
                    log::warn!("protocol: ignoring update_status: {}", reason);
                }
                Command::Unrecognized => {
                    log::debug!("protocol: ignoring {:?}", line);
                }
            }
        }
    }

    async fn read_qr(&self) -> Response {
        if !self.frames.is_device_open() {
            log::warn!("protocol: READ_QR while camera is closed");
            return Response::camera_unavailable();
        }
        let Some(frame) = self.frames.latest() else {
            log::warn!("protocol: READ_QR before the first frame");
            return Response::no_frame();
        };

        let text = self.decode(&frame).await;
        let classification = self.classifier.classify(text.as_deref()).await;
        if classification == Classification::NoQrDetected {
            if let Err(error) = self.save_debug_frame(&frame).await {
                log::error!("protocol: failed to save debug frame: {}", error);
            }
        }
        Response::qr_result(text.as_deref(), classification.label())
    }

    async fn decode(&self, frame: &Arc<VideoFrame>) -> Option<String> {
        let decoder = Arc::clone(&self.decoder);
        let frame = Arc::clone(frame);
        match tokio::task::spawn_blocking(move || decoder.decode(&frame.image)).await {
            Ok(occurrence) => occurrence.map(|o| o.text),
            Err(error) => {
                log::error!("protocol: decoder task failed: {}", error);
                None
            }
        }
    }

    async fn save_debug_frame(&self, frame: &VideoFrame) -> Result<(), BridgeError> {
        let Some(path) = &self.config.debug_frame_path else {
            return Ok(());
        };
        image::write_jpeg(
            frame.image.clone(),
            path.clone(),
            self.config.debug_jpeg_quality,
        )
        .await?;
        log::info!("protocol: no QR detected, saved {}", path.display());
        Ok(())
    }

    async fn update_status(&self, tracking_number: &str, status: &str) -> Result<(), BridgeError> {
        let status = TrackingStatus::from(status);
        if self
            .classifier
            .update_status(tracking_number, &status)
            .await?
        {
            log::info!("protocol: {} is now {}", tracking_number, status);
        } else {
            log::warn!("protocol: {} not found, status not updated", tracking_number);
        }
        Ok(())
    }
}
