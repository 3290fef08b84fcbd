//! Small seams shared across the filelog crates.
pub mod clock;

pub use clock::{Clock, LocalClock, TIMESTAMP_FORMAT};
