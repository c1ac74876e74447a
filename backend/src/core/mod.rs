//! Core infrastructure: the injectable time source.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
