pub mod bundle;
pub mod error;
pub mod stats;
