use std::fmt;

#[derive(Debug)]
pub enum VideoError {
    /// The camera could not be opened or configured.
    Open(String),
    /// The camera is open but did not deliver a frame.
    Capture(String),
    /// The camera offers nothing the station can decode.
    Unsupported(String),
    /// A delivered buffer does not match its declared layout.
    Frame(image::ImageError),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Open(msg) => write!(f, "cannot open camera: {msg}"),
            VideoError::Capture(msg) => write!(f, "capture failed: {msg}"),
            VideoError::Unsupported(msg) => write!(f, "unsupported camera mode: {msg}"),
            VideoError::Frame(err) => write!(f, "bad frame: {err}"),
        }
    }
}

impl std::error::Error for VideoError {}

// V4L2 ioctls report through io::Error, and all of them happen while opening
impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Open(err.to_string())
    }
}

impl From<image::ImageError> for VideoError {
    fn from(err: image::ImageError) -> Self {
        VideoError::Frame(err)
    }
}
