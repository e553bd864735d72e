use {image::ImageError, link::LinkError, std::fmt, store::StoreError};

#[derive(Debug)]
pub enum BridgeError {
    Link(LinkError),
    Store(StoreError),
    Image(ImageError),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Link(err) => write!(f, "link error: {err}"),
            BridgeError::Store(err) => write!(f, "store error: {err}"),
            BridgeError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<LinkError> for BridgeError {
    fn from(err: LinkError) -> Self {
        BridgeError::Link(err)
    }
}

impl From<StoreError> for BridgeError {
    fn from(err: StoreError) -> Self {
        BridgeError::Store(err)
    }
}

impl From<ImageError> for BridgeError {
    fn from(err: ImageError) -> Self {
        BridgeError::Image(err)
    }
}
