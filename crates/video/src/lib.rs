//! Frame acquisition for the parcel station.
//!
//! A blocking worker owns the camera device and publishes every successful
//! capture into a [`LatestFrame`] cell. Consumers only ever see the most
//! recent complete frame through the [`FrameSource`] trait and never wait on
//! the worker.

mod error;
pub use error::*;

mod latest;
pub use latest::*;

mod videoframe;
pub use videoframe::*;

mod videoin;
pub use videoin::*;
