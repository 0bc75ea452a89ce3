//! The three output arrays and their channel layouts.

use crate::types::time_range::GridDimensions;
use ndarray::Array3;

/// Canonical sentinel for missing or invalid irradiance values.
pub const SENTINEL: f32 = -1.0;

/// Name of the input array in the bundle.
pub const X_NAME: &str = "X";
/// Name of the daily target array in the bundle.
pub const Y_DAILY_NAME: &str = "y_daily";
/// Name of the hourly target array in the bundle.
pub const Y_HOURLY_NAME: &str = "y_hourly";

/// Channel layout of `y_daily`.
pub mod daily_channel {
    pub const IRRADIANCE: usize = 0;
    pub const YEAR_SIN: usize = 1;
    pub const YEAR_COS: usize = 2;
    pub const COUNT: usize = 3;
}

/// Channel layout of `y_hourly`.
pub mod hourly_channel {
    pub const IRRADIANCE: usize = 0;
    pub const YEAR_SIN: usize = 1;
    pub const YEAR_COS: usize = 2;
    pub const DAY_SIN: usize = 3;
    pub const DAY_COS: usize = 4;
    pub const COUNT: usize = 5;
}

/// Number of phase channels trailing the region cells in `X`.
pub const X_PHASE_CHANNELS: usize = 2;

/// The arrays produced by a run.
///
/// * `x`: `(T, P, F + 2)`; region cells `0..F`, then year sine and year cosine.
/// * `y_daily`: `(T, P, 3)`; see [`daily_channel`].
/// * `y_hourly`: `(T * 24, P, 5)`; see [`hourly_channel`].
///
/// All arrays share the same time origin: row 0 is 1 January of the first year.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetArrays {
    pub x: Array3<f32>,
    pub y_daily: Array3<f32>,
    pub y_hourly: Array3<f32>,
}

impl DatasetArrays {
    /// Allocates zero-filled arrays at their final size.
    pub fn zeros(dims: GridDimensions) -> Self {
        Self {
            x: Array3::zeros((dims.days, dims.patches, dims.cells + X_PHASE_CHANNELS)),
            y_daily: Array3::zeros((dims.days, dims.patches, daily_channel::COUNT)),
            y_hourly: Array3::zeros((dims.hours(), dims.patches, hourly_channel::COUNT)),
        }
    }

    /// Number of region cells `F` in `x`.
    pub fn cells(&self) -> usize {
        self.x.dim().2 - X_PHASE_CHANNELS
    }

    /// Channel of `x` holding the year-phase sine.
    pub fn x_year_sin(&self) -> usize {
        self.cells()
    }

    /// Channel of `x` holding the year-phase cosine.
    pub fn x_year_cos(&self) -> usize {
        self.cells() + 1
    }

    /// `(name, array)` pairs in bundle order.
    pub fn named(&self) -> [(&'static str, &Array3<f32>); 3] {
        [
            (X_NAME, &self.x),
            (Y_DAILY_NAME, &self.y_daily),
            (Y_HOURLY_NAME, &self.y_hourly),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shapes() {
        let arrays = DatasetArrays::zeros(GridDimensions::new(365, 2, 16));
        assert_eq!(arrays.x.dim(), (365, 2, 18));
        assert_eq!(arrays.y_daily.dim(), (365, 2, 3));
        assert_eq!(arrays.y_hourly.dim(), (8760, 2, 5));
        assert_eq!(arrays.cells(), 16);
        assert_eq!(arrays.x_year_sin(), 16);
        assert_eq!(arrays.x_year_cos(), 17);
        assert!(arrays.x.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_named_order() {
        let arrays = DatasetArrays::zeros(GridDimensions::new(1, 1, 1));
        let names: Vec<_> = arrays.named().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["X", "y_daily", "y_hourly"]);
    }
}
