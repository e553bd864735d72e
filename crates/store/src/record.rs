use std::{convert::Infallible, fmt, str::FromStr, time::SystemTime};

/// Lifecycle state of a parcel.
///
/// Only `pending` and `scanned` are assigned meaning here; anything the
/// peer sends is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingStatus {
    Pending,
    Scanned,
    Other(String),
}

impl TrackingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TrackingStatus::Pending => "pending",
            TrackingStatus::Scanned => "scanned",
            TrackingStatus::Other(status) => status,
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackingStatus {
    type Err = Infallible;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        Ok(match status {
            "pending" => TrackingStatus::Pending,
            "scanned" => TrackingStatus::Scanned,
            other => TrackingStatus::Other(other.to_string()),
        })
    }
}

impl From<&str> for TrackingStatus {
    fn from(status: &str) -> Self {
        match status.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingRecord {
    pub tracking_number: String,
    pub user_id: i32,
    pub status: TrackingStatus,
    /// Last status change, if the store keeps one.
    pub updated_at: Option<SystemTime>,
}

impl TrackingRecord {
    pub fn new(tracking_number: impl Into<String>, user_id: i32) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            user_id,
            status: TrackingStatus::Pending,
            updated_at: None,
        }
    }

    pub fn with_status(mut self, status: TrackingStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i32,
    /// Stored as free text; parsed by the consumer.
    pub dorm_number: String,
}

impl UserRecord {
    pub fn new(id: i32, dorm_number: impl Into<String>) -> Self {
        Self {
            id,
            dorm_number: dorm_number.into(),
        }
    }
}
