//! Tracking record storage.
//!
//! All reads and writes go through a unit of work ([`StoreTx`]) obtained from
//! [`TrackingStore::begin`]. A unit of work holds the lock on the records it
//! touches until it is committed or dropped; dropping rolls back.

mod error;
pub use error::*;

mod memory;
pub use memory::*;

mod postgres;
pub use postgres::*;

mod record;
pub use record::*;

mod store;
pub use store::*;
