use {
    std::time::Duration,
    store::{
        MemoryStore, StoreError, StoreTx, TrackingRecord, TrackingStatus, TrackingStore,
        UserRecord,
    },
};

async fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_user(UserRecord::new(7, "12")).await;
    store.insert_tracking(TrackingRecord::new("TN123", 7)).await;
    store
}

#[tokio::test]
async fn test_lookup_and_user() {
    let store = seeded().await;
    let mut tx = store.begin().await.unwrap();
    let record = tx.lock_tracking("TN123").await.unwrap().unwrap();
    assert_eq!(record.user_id, 7);
    assert_eq!(record.status, TrackingStatus::Pending);
    assert_eq!(record.updated_at, None);
    assert_eq!(tx.find_user(7).await.unwrap().unwrap().dorm_number, "12");
    assert!(tx.lock_tracking("TN999").await.unwrap().is_none());
    assert!(tx.find_user(8).await.unwrap().is_none());
}

#[tokio::test]
async fn test_writes_land_on_commit() {
    let store = seeded().await;
    let mut tx = store.begin().await.unwrap();
    assert!(tx.set_status("TN123", &TrackingStatus::Scanned).await.unwrap());
    // visible inside the unit of work
    let inside = tx.lock_tracking("TN123").await.unwrap().unwrap();
    assert_eq!(inside.status, TrackingStatus::Scanned);
    tx.commit().await.unwrap();

    let committed = store.tracking("TN123").await.unwrap();
    assert_eq!(committed.status, TrackingStatus::Scanned);
    assert!(committed.updated_at.is_some());
}

#[tokio::test]
async fn test_drop_rolls_back() {
    let store = seeded().await;
    {
        let mut tx = store.begin().await.unwrap();
        tx.set_status("TN123", &TrackingStatus::from("delivered"))
            .await
            .unwrap();
    }
    let record = store.tracking("TN123").await.unwrap();
    assert_eq!(record.status, TrackingStatus::Pending);
}

#[tokio::test]
async fn test_missing_record_is_not_updated() {
    let store = seeded().await;
    let mut tx = store.begin().await.unwrap();
    assert!(!tx.set_status("TN999", &TrackingStatus::Scanned).await.unwrap());
    tx.commit().await.unwrap();
    assert!(store.tracking("TN999").await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_units_of_work_are_serialized() {
    let store = seeded().await;
    let mut first = store.begin().await.unwrap();

    let waiter = {
        let store = store.clone();
        tokio::spawn(async move {
            let mut tx = store.begin().await.unwrap();
            let status = tx.lock_tracking("TN123").await.unwrap().unwrap().status;
            tx.commit().await.unwrap();
            status
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiter.is_finished());

    first
        .set_status("TN123", &TrackingStatus::from("delivered"))
        .await
        .unwrap();
    first.commit().await.unwrap();

    // the second unit of work sees the first one's committed write
    assert_eq!(
        waiter.await.unwrap(),
        TrackingStatus::Other("delivered".to_string())
    );
}

#[tokio::test]
async fn test_unavailable_store_fails_begin() {
    let store = seeded().await;
    store.set_unavailable(true);
    assert!(matches!(store.begin().await, Err(StoreError::Database(_))));
    store.set_unavailable(false);
    assert!(store.begin().await.is_ok());
}

#[tokio::test]
async fn test_latency_delays_round_trips() {
    let store = seeded().await.with_latency(Duration::from_millis(30));
    let mut tx = store.begin().await.unwrap();
    let started = std::time::Instant::now();
    tx.lock_tracking("TN123").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
}
