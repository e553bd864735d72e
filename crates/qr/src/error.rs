use {image::ImageError, std::fmt};

#[derive(Debug)]
pub enum DecodeError {
    Image(ImageError),
    ModelLoad(String),
    Inference(String),
    ShapeMismatch { expected: String, got: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Image(error) => write!(f, "image error: {}", error),
            DecodeError::ModelLoad(msg) => write!(f, "model load error: {}", msg),
            DecodeError::Inference(msg) => write!(f, "inference error: {}", msg),
            DecodeError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {}, got {}", expected, got)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<ImageError> for DecodeError {
    fn from(error: ImageError) -> Self {
        DecodeError::Image(error)
    }
}

impl From<base::TensorError> for DecodeError {
    fn from(error: base::TensorError) -> Self {
        DecodeError::Inference(error.to_string())
    }
}
