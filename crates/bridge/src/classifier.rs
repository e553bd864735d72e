use {
    std::{fmt, future::Future, time::Duration},
    store::{StoreError, StoreTx, TrackingStatus, TrackingStore},
};

/// What a decode attempt means for the gate controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NoQrDetected,
    /// Unknown parcel, unknown owner, unusable dorm number, or the store failed.
    NotFound,
    DormNumber(u32),
}

impl Classification {
    /// Integer sent to the link peer.
    pub fn label(&self) -> i64 {
        match self {
            Classification::NoQrDetected => -2,
            Classification::NotFound => -1,
            Classification::DormNumber(dorm) => i64::from(*dorm),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::NoQrDetected => write!(f, "no QR detected"),
            Classification::NotFound => write!(f, "not found"),
            Classification::DormNumber(dorm) => write!(f, "dorm {}", dorm),
        }
    }
}

/// Dorm numbers are stored as text; only plain non-negative integers count.
pub fn parse_dorm_number(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Maps decoded QR text to a label, marking the parcel as scanned on the way.
pub struct QrClassifier<S> {
    store: S,
    store_timeout: Duration,
}

impl<S: TrackingStore> QrClassifier<S> {
    pub fn new(store: S, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn bounded<T>(
        &self,
        work: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.store_timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.store_timeout)),
        }
    }

    /// Classify the text of the selected QR symbol, if there was one.
    ///
    /// A known parcel is set to `scanned` even when its owner or dorm number
    /// turns out to be unusable. Store failures are logged and reported as
    /// [`Classification::NotFound`].
    pub async fn classify(&self, text: Option<&str>) -> Classification {
        let Some(text) = text else {
            return Classification::NoQrDetected;
        };
        match self.bounded(self.scan(text)).await {
            Ok(classification) => {
                log::info!("classifier: {} -> {}", text, classification);
                classification
            }
            Err(error) => {
                log::error!("classifier: lookup of {} failed: {}", text, error);
                Classification::NotFound
            }
        }
    }

    async fn scan(&self, tracking_number: &str) -> Result<Classification, StoreError> {
        let mut tx = self.store.begin().await?;
        let Some(record) = tx.lock_tracking(tracking_number).await? else {
            return Ok(Classification::NotFound);
        };
        tx.set_status(tracking_number, &TrackingStatus::Scanned)
            .await?;
        let user = tx.find_user(record.user_id).await?;
        tx.commit().await?;

        let Some(user) = user else {
            log::warn!(
                "classifier: {} belongs to unknown user {}",
                tracking_number,
                record.user_id
            );
            return Ok(Classification::NotFound);
        };
        match parse_dorm_number(&user.dorm_number) {
            Some(dorm) => Ok(Classification::DormNumber(dorm)),
            None => {
                log::warn!(
                    "classifier: user {} has unusable dorm number {:?}",
                    user.id,
                    user.dorm_number
                );
                Ok(Classification::NotFound)
            }
        }
    }

    /// Set a parcel's status as the peer asked.
    ///
    /// Returns `false` when no parcel has that tracking number.
    pub async fn update_status(
        &self,
        tracking_number: &str,
        status: &TrackingStatus,
    ) -> Result<bool, StoreError> {
        self.bounded(async {
            let mut tx = self.store.begin().await?;
            let updated = tx.set_status(tracking_number, status).await?;
            tx.commit().await?;
            Ok(updated)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Classification::NoQrDetected.label(), -2);
        assert_eq!(Classification::NotFound.label(), -1);
        assert_eq!(Classification::DormNumber(0).label(), 0);
        assert_eq!(Classification::DormNumber(12).label(), 12);
    }

    #[test]
    fn test_parse_dorm_number() {
        assert_eq!(parse_dorm_number("12"), Some(12));
        assert_eq!(parse_dorm_number(" 7 \n"), Some(7));
        assert_eq!(parse_dorm_number("0"), Some(0));
        assert_eq!(parse_dorm_number("A-12"), None);
        assert_eq!(parse_dorm_number("12A"), None);
        assert_eq!(parse_dorm_number("-3"), None);
        assert_eq!(parse_dorm_number("+3"), None);
        assert_eq!(parse_dorm_number(""), None);
        assert_eq!(parse_dorm_number("99999999999"), None);
    }
}
