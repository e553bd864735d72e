use {
    base::{Shutdown, log, retry_until},
    bridge::{LinkProtocol, QrClassifier},
    link::open_serial,
    qr::{ClassicDecoder, DecoderChain, Detect, ModelDecoder},
    station::StationConfig,
    std::sync::Arc,
    store::PgStore,
    video::{FrameSource, VideoIn, VideoInBackend},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StationConfig::from_env()?;
    match &config.log_dir {
        Some(dir) => base::init_file_logger(dir)?,
        None => base::init_stdout_logger(),
    }

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    log::info!("opening camera");
    let videoin = Arc::new(VideoIn::open(
        VideoInBackend::V4l2(config.camera.clone()),
        config.video.clone(),
        &shutdown,
    ));
    let frames: Arc<dyn FrameSource> = videoin.clone();
    tokio::spawn({
        let first = videoin.frames();
        let shutdown = shutdown.clone();
        async move {
            tokio::select! {
                frame = first.wait_newer(0) => log::info!(
                    "first frame captured: {} {:?}",
                    frame.image.size,
                    frame.image.format
                ),
                _ = shutdown.triggered() => {}
            }
        }
    });

    let decoder = Arc::new(build_decoder(&config));
    log::info!("decoding with {} strategies", decoder.len());

    log::info!("connecting to the tracking store");
    let Some(store) = retry_until(
        "connect to store",
        config.retry_delay,
        &shutdown,
        || PgStore::connect(&config.store),
    )
    .await
    else {
        log::info!("shutdown before the store was reachable");
        return Ok(());
    };
    let classifier = Arc::new(QrClassifier::new(store, config.bridge.store_timeout));

    while !shutdown.is_triggered() {
        let Some(serial) = retry_until(
            "open serial port",
            config.retry_delay,
            &shutdown,
            || async { open_serial(&config.serial) },
        )
        .await
        else {
            break;
        };

        let protocol = LinkProtocol::new(
            serial,
            Arc::clone(&frames),
            Arc::clone(&decoder),
            Arc::clone(&classifier),
            config.bridge.clone(),
        );
        log::info!("serving {}", config.serial.path);
        match protocol.run(&shutdown).await {
            Ok(()) => break,
            Err(error) => {
                log::error!("link failed: {}, reopening", error);
                if !shutdown.sleep(config.retry_delay).await {
                    break;
                }
            }
        }
    }

    classifier.store().close().await;
    drop(frames);
    if let Ok(videoin) = Arc::try_unwrap(videoin) {
        videoin.close().await;
    }
    log::info!("station stopped");
    Ok(())
}

fn build_decoder(config: &StationConfig) -> DecoderChain {
    let mut strategies: Vec<Box<dyn Detect>> = vec![Box::new(ClassicDecoder::new())];
    if let Some(model) = &config.model {
        match ModelDecoder::new(model.clone()) {
            Ok(decoder) => strategies.push(Box::new(decoder)),
            // a missing model only costs the fallback strategy
            Err(error) => log::error!("model decoder unavailable: {}", error),
        }
    }
    DecoderChain::new(strategies)
}

async fn wait_for_signal(shutdown: Shutdown) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(error) => {
                log::warn!("cannot listen for SIGTERM: {}", error);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    log::info!("shutdown requested");
    shutdown.trigger();
}
