use {crate::Shutdown, std::fmt::Display, std::future::Future, std::time::Duration};

/// Retry `attempt` with a fixed delay until it succeeds.
///
/// Failures are logged and never give up on their own. Returns `None` only
/// when `shutdown` fires, either before an attempt or during the delay.
pub async fn retry_until<T, E, F, Fut>(
    what: &str,
    delay: Duration,
    shutdown: &Shutdown,
    mut attempt: F,
) -> Option<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures: u64 = 0;
    loop {
        if shutdown.is_triggered() {
            return None;
        }
        match attempt().await {
            Ok(value) => {
                if failures > 0 {
                    log::info!("{} succeeded after {} failed attempts", what, failures);
                }
                return Some(value);
            }
            Err(error) => {
                failures += 1;
                log::warn!(
                    "{} failed (attempt {}): {}, retrying in {:?}",
                    what,
                    failures,
                    error,
                    delay
                );
                if !shutdown.sleep(delay).await {
                    return None;
                }
            }
        }
    }
}

/// Thread-blocking variant of [`retry_until`] for worker threads.
pub fn blocking_retry_until<T, E, F>(
    what: &str,
    delay: Duration,
    shutdown: &Shutdown,
    mut attempt: F,
) -> Option<T>
where
    E: Display,
    F: FnMut() -> Result<T, E>,
{
    let mut failures: u64 = 0;
    loop {
        if shutdown.is_triggered() {
            return None;
        }
        match attempt() {
            Ok(value) => {
                if failures > 0 {
                    log::info!("{} succeeded after {} failed attempts", what, failures);
                }
                return Some(value);
            }
            Err(error) => {
                failures += 1;
                log::warn!(
                    "{} failed (attempt {}): {}, retrying in {:?}",
                    what,
                    failures,
                    error,
                    delay
                );
                if !shutdown.blocking_sleep(delay) {
                    return None;
                }
            }
        }
    }
}
