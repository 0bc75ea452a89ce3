//! Gregorian calendar arithmetic and cyclical time encoding.
//!
//! Everything in here is pure: no I/O, no clock access. Functions that depend on
//! "today" take it as an argument.

pub mod leap;
pub mod phase;

pub use leap::*;
pub use phase::*;
