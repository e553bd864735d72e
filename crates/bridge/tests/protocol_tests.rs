mod common;

use {
    base::Shutdown,
    bridge::{BridgeConfig, BridgeError},
    common::*,
    link::LinkError,
    qr::DecoderChain,
    std::{sync::Arc, time::Duration},
    store::{MemoryStore, TrackingStatus},
};

#[tokio::test]
async fn test_read_qr_before_first_frame() {
    let (protocol, mut peer) = protocol(
        StubFrames::open_without_frame(),
        decoding_nothing(),
        seeded_store().await,
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"error":"Failed to capture image"}"#);
}

#[tokio::test]
async fn test_read_qr_with_camera_closed() {
    let (protocol, mut peer) = protocol(
        StubFrames::closed(),
        decoding_nothing(),
        seeded_store().await,
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"error":"Cannot open camera"}"#);
}

#[tokio::test]
async fn test_no_qr_reports_minus_two_and_saves_frame() {
    let debug_path = std::env::temp_dir()
        .join(format!("station-protocol-{}", std::process::id()))
        .join("debug_last_frame.jpg");
    let _ = std::fs::remove_file(&debug_path);

    let config = quiet_config().with_debug_frame_path(Some(debug_path.clone()));
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding_nothing(),
        seeded_store().await,
        config,
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"No QR code detected","mapped_label":-2}"#);

    let written = std::fs::read(&debug_path).expect("debug frame should be written");
    assert_eq!(&written[..2], &[0xff, 0xd8]);
    std::fs::remove_file(&debug_path).ok();
}

#[tokio::test]
async fn test_unwritable_debug_path_still_answers() {
    // a directory cannot be overwritten by a file
    let config = quiet_config().with_debug_frame_path(Some(std::env::temp_dir()));
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding_nothing(),
        seeded_store().await,
        config,
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"No QR code detected","mapped_label":-2}"#);
}

#[tokio::test]
async fn test_known_parcel_reports_dorm_and_marks_scanned() {
    let store = seeded_store().await;
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding(vec![symbol("TN123", 300.0)]),
        store.clone(),
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":12}"#);

    let record = store.tracking("TN123").await.unwrap();
    assert_eq!(record.status, TrackingStatus::Scanned);
    assert!(record.updated_at.is_some());
}

#[tokio::test]
async fn test_unknown_parcel_reports_minus_one() {
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding(vec![symbol("NOPE", 300.0)]),
        seeded_store().await,
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"NOPE","mapped_label":-1}"#);
}

#[tokio::test]
async fn test_rightmost_symbol_is_reported() {
    let decoder = Arc::new(DecoderChain::new(vec![
        Box::new(Canned(Vec::new())),
        Box::new(Canned(vec![symbol("NOPE", 120.0), symbol("TN123", 480.0)])),
    ]));
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoder,
        seeded_store().await,
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":12}"#);
}

#[tokio::test]
async fn test_empty_payloads_do_not_mask_a_parcel() {
    // the first strategy only reads an empty payload, the second finds the
    // parcel next to another empty one further right
    let decoder = Arc::new(DecoderChain::new(vec![
        Box::new(Canned(vec![symbol("", 300.0)])),
        Box::new(Canned(vec![symbol("TN123", 100.0), symbol("", 400.0)])),
    ]));
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoder,
        seeded_store().await,
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":12}"#);
}

#[tokio::test]
async fn test_update_status_is_silent_and_applied() {
    let store = seeded_store().await;
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding_nothing(),
        store.clone(),
        quiet_config(),
    );
    let (result, (silent, response)) = drive(protocol, async {
        peer.send(r#"{"type":"update_status","trackingNumber":"TN123","status":"delivered"}"#)
            .await;
        let silent = peer.is_silent_for(Duration::from_millis(100)).await;
        // the next line on the wire belongs to this request
        peer.send("READ_QR").await;
        (silent, peer.recv().await)
    })
    .await;
    result.unwrap();
    assert!(silent);
    assert_eq!(response, r#"{"qr_text":"No QR code detected","mapped_label":-2}"#);

    let record = store.tracking("TN123").await.unwrap();
    assert_eq!(record.status, TrackingStatus::Other("delivered".to_string()));
}

#[tokio::test]
async fn test_ignored_lines_keep_the_loop_running() {
    let store = seeded_store().await;
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding(vec![symbol("TN123", 10.0)]),
        store.clone(),
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("PING").await;
        peer.send("").await;
        peer.send("{garbage").await;
        peer.send(r#"{"type":"update_status","status":"delivered"}"#).await;
        peer.send(r#"{"type":"update_status","trackingNumber":"NOPE","status":"lost"}"#)
            .await;
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":12}"#);
}

#[tokio::test]
async fn test_one_response_per_request() {
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding(vec![symbol("TN123", 10.0)]),
        seeded_store().await,
        quiet_config(),
    );
    let (result, responses) = drive(protocol, async {
        for _ in 0..3 {
            peer.send("READ_QR").await;
        }
        let mut responses = Vec::new();
        for _ in 0..3 {
            responses.push(peer.recv().await);
        }
        let extra = peer.is_silent_for(Duration::from_millis(100)).await;
        (responses, extra)
    })
    .await;
    result.unwrap();
    let (responses, silent) = responses;
    assert!(silent);
    for response in responses {
        assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":12}"#);
    }
}

#[tokio::test]
async fn test_store_timeout_reports_minus_one() {
    let store = seeded_store().await.with_latency(Duration::from_millis(300));
    let config = quiet_config().with_store_timeout(Duration::from_millis(50));
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding(vec![symbol("TN123", 10.0)]),
        store.clone(),
        config,
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":-1}"#);
    // the abandoned unit of work never committed
    assert_eq!(
        store.tracking("TN123").await.unwrap().status,
        TrackingStatus::Pending
    );
}

#[tokio::test]
async fn test_store_failure_reports_minus_one() {
    let store = seeded_store().await;
    store.set_unavailable(true);
    let (protocol, mut peer) = protocol(
        StubFrames::with_blank_frame(),
        decoding(vec![symbol("TN123", 10.0)]),
        store,
        quiet_config(),
    );
    let (result, response) = drive(protocol, async {
        peer.send("READ_QR").await;
        peer.recv().await
    })
    .await;
    result.unwrap();
    assert_eq!(response, r#"{"qr_text":"TN123","mapped_label":-1}"#);
}

#[tokio::test]
async fn test_partial_line_is_dropped() {
    let (protocol, mut peer) = protocol(
        StubFrames::open_without_frame(),
        decoding_nothing(),
        MemoryStore::new(),
        quiet_config().with_read_timeout(Duration::from_millis(50)),
    );
    let (result, (silent, response)) = drive(protocol, async {
        peer.send_raw(b"READ_").await;
        let silent = peer.is_silent_for(Duration::from_millis(150)).await;
        peer.send("READ_QR").await;
        (silent, peer.recv().await)
    })
    .await;
    result.unwrap();
    assert!(silent);
    assert_eq!(response, r#"{"error":"Failed to capture image"}"#);
}

#[tokio::test]
async fn test_end_of_stream_ends_run() {
    let (protocol, peer) = protocol(
        StubFrames::open_without_frame(),
        decoding_nothing(),
        MemoryStore::new(),
        BridgeConfig::default().with_debug_frame_path(None),
    );
    drop(peer);
    let shutdown = Shutdown::new();
    let result = tokio::time::timeout(Duration::from_secs(2), protocol.run(&shutdown))
        .await
        .expect("run should end when the link closes");
    assert!(matches!(result, Err(BridgeError::Link(LinkError::Closed))));
}

#[tokio::test]
async fn test_shutdown_ends_idle_run() {
    let (protocol, _peer) = protocol(
        StubFrames::open_without_frame(),
        decoding_nothing(),
        MemoryStore::new(),
        quiet_config(),
    );
    let shutdown = Shutdown::new();
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(2), protocol.run(&shutdown))
        .await
        .expect("run should end on shutdown");
    assert!(result.is_ok());
}
