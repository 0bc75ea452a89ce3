//! Placement of downloaded series into the output arrays.

pub mod error;
pub mod record_mapper;

pub use error::MappingError;
pub use record_mapper::*;
