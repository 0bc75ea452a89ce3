//! Assembles NASA POWER solar-irradiance time series into fixed-shape training arrays.
//!
//! For every configured location and every year of a range, three series are downloaded:
//! the daily irradiance of a region around the location, the daily irradiance at the
//! location and, from 2001 on, its hourly irradiance. They are mapped into
//!
//! * `X` with shape `(T, P, F + 2)`,
//! * `y_daily` with shape `(T, P, 3)`,
//! * `y_hourly` with shape `(T * 24, P, 5)`,
//!
//! where `T` is the number of days, `P` the number of locations and `F` the number of
//! region grid cells. The trailing channels carry sine/cosine phase features.

mod assembler;
pub mod calendar;
mod config;
mod error;
mod mapping;
mod power;
mod types;
mod utils;
mod writer;

pub use assembler::*;
pub use error::DatasetError;
pub use utils::{ensure_cache_dir_exists, get_cache_dir};

pub use config::error::ConfigError;
pub use config::locations::LocationSet;
pub use config::settings::AssemblySettings;

pub use mapping::error::MappingError;
pub use mapping::record_mapper::*;

pub use power::client::*;
pub use power::error::PowerApiError;
pub use power::request::*;
pub use power::response::*;
pub use power::source::IrradianceSource;

pub use types::arrays::*;
pub use types::geo::*;
pub use types::record_kind::*;
pub use types::time_range::*;

pub use writer::bundle::*;
pub use writer::error::WriterError;
pub use writer::stats::*;
