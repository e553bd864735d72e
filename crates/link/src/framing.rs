use {
    crate::LinkError,
    serde::Serialize,
    std::time::Duration,
    tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
};

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Newline-delimited reader with a per-line deadline.
///
/// Waiting for the first byte of a line is unbounded; once it has arrived
/// the rest of the line must follow within the read timeout or the partial
/// line is thrown away.
pub struct LineReader<R> {
    reader: BufReader<R>,
    timeout: Duration,
    line: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_timeout(reader, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeout(reader: R, timeout: Duration) -> Self {
        Self {
            reader: BufReader::new(reader),
            timeout,
            line: Vec::new(),
        }
    }

    /// Wait until at least one byte can be read.
    ///
    /// Cancel-safe. Returns [`LinkError::Closed`] at end of stream.
    pub async fn ready(&mut self) -> Result<(), LinkError> {
        if self.reader.fill_buf().await?.is_empty() {
            return Err(LinkError::Closed);
        }
        Ok(())
    }

    /// Read the next line without its terminator.
    ///
    /// Returns `Ok(None)` when the line did not complete within the timeout.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub async fn read_line(&mut self) -> Result<Option<String>, LinkError> {
        self.ready().await?;
        self.line.clear();
        match tokio::time::timeout(self.timeout, self.reader.read_until(b'\n', &mut self.line))
            .await
        {
            Ok(Ok(0)) => Err(LinkError::Closed),
            Ok(Ok(_)) => {
                let text = String::from_utf8_lossy(&self.line)
                    .trim_end_matches(['\r', '\n'])
                    .to_string();
                self.line.clear();
                Ok(Some(text))
            }
            Ok(Err(error)) => Err(error.into()),
            Err(_) => {
                log::debug!(
                    "link: discarding {} byte partial line after {:?}",
                    self.line.len(),
                    self.timeout
                );
                self.line.clear();
                Ok(None)
            }
        }
    }
}

/// Write `value` as one compact JSON object followed by a newline.
pub async fn write_json_line<T: Serialize, W: AsyncWrite + Unpin>(
    writer: &mut W,
    value: &T,
) -> Result<(), LinkError> {
    let mut payload = serde_json::to_vec(value)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}
