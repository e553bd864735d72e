use std::fmt;

#[derive(Debug)]
pub enum LinkError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Encode(serde_json::Error),
    /// The peer closed the link.
    Closed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Io(err) => write!(f, "io error: {err}"),
            LinkError::Serial(err) => write!(f, "serial error: {err}"),
            LinkError::Encode(err) => write!(f, "encode error: {err}"),
            LinkError::Closed => write!(f, "link closed"),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Io(err)
    }
}

impl From<tokio_serial::Error> for LinkError {
    fn from(err: tokio_serial::Error) -> Self {
        LinkError::Serial(err)
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::Encode(err)
    }
}
