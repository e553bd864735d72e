//! Glue between the camera, the decoders, the tracking store and the link.
//!
//! [`LinkProtocol`] reads commands from the link and answers `READ_QR` with
//! the label [`QrClassifier`] derives from the current frame.

mod classifier;
pub use classifier::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod protocol;
pub use protocol::*;
