//! Per-channel summary statistics of the finished arrays.

use crate::types::arrays::DatasetArrays;
use log::info;
use ndarray::{Array3, Axis};
use std::fmt;

/// Statistics of one trailing channel over all rows and locations.
///
/// `std` is the population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl ChannelStats {
    /// Computes the statistics of every channel of `array`.
    ///
    /// Returns an empty vector for arrays without rows or locations.
    pub fn per_channel(array: &Array3<f32>) -> Vec<ChannelStats> {
        array
            .axis_iter(Axis(2))
            .filter(|channel| !channel.is_empty())
            .map(|channel| {
                let values = channel.mapv(f64::from);
                let (min, max) = values
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    });
                ChannelStats {
                    min,
                    max,
                    mean: values.mean().unwrap_or(f64::NAN),
                    std: values.std(0.0),
                }
            })
            .collect()
    }
}

impl fmt::Display for ChannelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min {:.4} max {:.4} mean {:.4} std {:.4}",
            self.min, self.max, self.mean, self.std
        )
    }
}

/// Shape and channel statistics of one named array.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayReport {
    pub name: &'static str,
    pub shape: [usize; 3],
    pub channels: Vec<ChannelStats>,
}

/// What the writer found in the dataset before serializing it.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    /// Negative irradiance cells rewritten to the sentinel.
    pub replaced_cells: usize,
    pub arrays: Vec<ArrayReport>,
}

impl DatasetReport {
    pub fn collect(arrays: &DatasetArrays, replaced_cells: usize) -> Self {
        let arrays = arrays
            .named()
            .into_iter()
            .map(|(name, array)| {
                let (t, p, c) = array.dim();
                ArrayReport {
                    name,
                    shape: [t, p, c],
                    channels: ChannelStats::per_channel(array),
                }
            })
            .collect();
        Self {
            replaced_cells,
            arrays,
        }
    }

    pub fn array(&self, name: &str) -> Option<&ArrayReport> {
        self.arrays.iter().find(|a| a.name == name)
    }

    pub fn log(&self) {
        info!(
            "Normalized {} invalid irradiance cells to the sentinel",
            self.replaced_cells
        );
        for array in &self.arrays {
            info!("{} shape {:?}", array.name, array.shape);
            for (channel, stats) in array.channels.iter().enumerate() {
                info!("  {}[..., {}]: {}", array.name, channel, stats);
            }
        }
    }
}
