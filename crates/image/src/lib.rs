//! Frame images for the parcel station.
//!
//! An [`Image`] is a packed pixel buffer together with its size and a
//! declared [`PixelFormat`], so consumers never have to guess channel order.
//! Conversions to RGB and luma feed the QR decoders; JPEG encoding backs the
//! debug artifact written when nothing could be decoded.

mod error;
pub use error::*;

mod image;
pub use image::*;

mod jpeg;
pub use jpeg::*;

mod pixelformat;
pub use pixelformat::*;

mod rgb;
pub use rgb::*;
