//! QR symbol decoding.
//!
//! Two strategies share the [`Detect`] trait: a classical grid detector
//! ([`ClassicDecoder`]) and an ONNX object detector whose boxes are decoded
//! crop by crop ([`ModelDecoder`]). [`DecoderChain`] runs them in order and
//! picks a single occurrence with [`select_rightmost`].

mod chain;
pub use chain::*;

mod classic;
pub use classic::*;

mod detect;
pub use detect::*;

mod error;
pub use error::*;

#[cfg(feature = "model")]
mod model;
#[cfg(feature = "model")]
pub use model::*;

mod occurrence;
pub use occurrence::*;
