use {crate::*, std::future::Future};

/// A source of units of work over tracking and user records.
pub trait TrackingStore: Send + Sync {
    type Tx<'a>: StoreTx + 'a
    where
        Self: 'a;

    /// Start a unit of work. Waits while another one holds the store.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx<'_>, StoreError>> + Send;
}

/// One unit of work. Dropping it without [`StoreTx::commit`] discards every
/// write made through it.
pub trait StoreTx: Send {
    /// Look up a tracking record and lock it for the rest of the unit of work.
    fn lock_tracking(
        &mut self,
        tracking_number: &str,
    ) -> impl Future<Output = Result<Option<TrackingRecord>, StoreError>> + Send;

    /// Set the status (and update time) of a tracking record.
    ///
    /// Returns `false` when no record has that tracking number.
    fn set_status(
        &mut self,
        tracking_number: &str,
        status: &TrackingStatus,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn find_user(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = Result<Option<UserRecord>, StoreError>> + Send;

    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
