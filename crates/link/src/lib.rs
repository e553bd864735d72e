//! The byte-stream link to the gate controller.
//!
//! Requests and responses are newline-terminated UTF-8 lines. Requests are
//! either the bare `READ_QR` token or a JSON object; responses are always a
//! single JSON object.

mod command;
pub use command::*;

mod error;
pub use error::*;

mod framing;
pub use framing::*;

mod response;
pub use response::*;

mod serial;
pub use serial::*;
