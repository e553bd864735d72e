use {
    crate::*,
    std::{
        collections::HashMap,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::{Duration, SystemTime},
    },
    tokio::sync::{Mutex, MutexGuard},
};

#[derive(Debug, Default)]
struct Tables {
    tracking: HashMap<String, TrackingRecord>,
    users: HashMap<i32, UserRecord>,
}

/// In-process store for tests and dry runs.
///
/// A unit of work holds the whole table lock, so units of work are fully
/// serialized. Writes are staged and only land on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    latency: Duration,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every round trip, to exercise timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make `begin` fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn insert_tracking(&self, record: TrackingRecord) {
        let mut tables = self.tables.lock().await;
        tables.tracking.insert(record.tracking_number.clone(), record);
    }

    pub async fn insert_user(&self, user: UserRecord) {
        let mut tables = self.tables.lock().await;
        tables.users.insert(user.id, user);
    }

    /// Committed state of a tracking record.
    pub async fn tracking(&self, tracking_number: &str) -> Option<TrackingRecord> {
        self.tables.lock().await.tracking.get(tracking_number).cloned()
    }
}

impl TrackingStore for MemoryStore {
    type Tx<'a> = MemoryTx<'a>;

    async fn begin(&self) -> Result<MemoryTx<'_>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        let tables = self.tables.lock().await;
        Ok(MemoryTx {
            tables,
            staged: HashMap::new(),
            latency: self.latency,
        })
    }
}

pub struct MemoryTx<'a> {
    tables: MutexGuard<'a, Tables>,
    staged: HashMap<String, (TrackingStatus, SystemTime)>,
    latency: Duration,
}

impl MemoryTx<'_> {
    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn current(&self, tracking_number: &str) -> Option<TrackingRecord> {
        let mut record = self.tables.tracking.get(tracking_number).cloned()?;
        if let Some((status, updated_at)) = self.staged.get(tracking_number) {
            record.status = status.clone();
            record.updated_at = Some(*updated_at);
        }
        Some(record)
    }
}

impl StoreTx for MemoryTx<'_> {
    async fn lock_tracking(
        &mut self,
        tracking_number: &str,
    ) -> Result<Option<TrackingRecord>, StoreError> {
        self.round_trip().await;
        Ok(self.current(tracking_number))
    }

    async fn set_status(
        &mut self,
        tracking_number: &str,
        status: &TrackingStatus,
    ) -> Result<bool, StoreError> {
        self.round_trip().await;
        if !self.tables.tracking.contains_key(tracking_number) {
            return Ok(false);
        }
        self.staged.insert(
            tracking_number.to_string(),
            (status.clone(), SystemTime::now()),
        );
        Ok(true)
    }

    async fn find_user(&mut self, user_id: i32) -> Result<Option<UserRecord>, StoreError> {
        self.round_trip().await;
        Ok(self.tables.users.get(&user_id).cloned())
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        self.round_trip().await;
        let staged = std::mem::take(&mut self.staged);
        for (tracking_number, (status, updated_at)) in staged {
            if let Some(record) = self.tables.tracking.get_mut(&tracking_number) {
                record.status = status;
                record.updated_at = Some(updated_at);
            }
        }
        Ok(())
    }
}
