//! Serialization of the finished arrays into a single gzip-compressed bincode bundle.

use crate::types::arrays::{
    daily_channel, hourly_channel, DatasetArrays, X_NAME, Y_DAILY_NAME, Y_HOURLY_NAME,
};
use crate::writer::error::WriterError;
use crate::writer::stats::DatasetReport;
use async_compression::tokio::bufread::GzipDecoder;
use bincode::config::{Configuration, Fixint, LittleEndian};
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use ndarray::{s, Array3, ArrayViewMut, Dimension};
use serde::{Deserialize, Serialize};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, BufReader};
use tokio::task;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// On-disk layout: arrays in bundle order, each tagged with its name.
#[derive(Serialize, Deserialize)]
struct BundleFile {
    arrays: Vec<NamedArray>,
}

#[derive(Serialize, Deserialize)]
struct NamedArray {
    name: String,
    array: Array3<f32>,
}

/// Rewrites every negative irradiance value in the three arrays to `sentinel`.
///
/// Only irradiance channels are touched: region cells of `x` and channel 0 of both
/// targets. Phase channels keep their negative values. This deliberately differs from
/// replacing every negative value in the arrays, which would clobber the lower half of
/// each sine/cosine feature. Returns the number of cells that changed.
pub fn normalize_sentinels(arrays: &mut DatasetArrays, sentinel: f32) -> usize {
    let cells = arrays.cells();
    replace_negative(arrays.x.slice_mut(s![.., .., ..cells]), sentinel)
        + replace_negative(
            arrays.y_daily.slice_mut(s![.., .., daily_channel::IRRADIANCE]),
            sentinel,
        )
        + replace_negative(
            arrays.y_hourly.slice_mut(s![.., .., hourly_channel::IRRADIANCE]),
            sentinel,
        )
}

fn replace_negative<D: Dimension>(mut view: ArrayViewMut<'_, f32, D>, sentinel: f32) -> usize {
    let mut replaced = 0;
    view.map_inplace(|v| {
        if *v < 0.0 && *v != sentinel {
            *v = sentinel;
            replaced += 1;
        }
    });
    replaced
}

/// Writes the dataset bundle to its final location.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    output: PathBuf,
    sentinel: f32,
}

impl DatasetWriter {
    pub fn new(output: impl Into<PathBuf>, sentinel: f32) -> Self {
        Self {
            output: output.into(),
            sentinel,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Normalizes sentinels, logs per-channel statistics and writes the bundle.
    ///
    /// The bundle is written to a temporary file next to the output and renamed into
    /// place, so the output path never holds a partial bundle.
    pub async fn write(&self, mut arrays: DatasetArrays) -> Result<DatasetReport, WriterError> {
        let replaced = normalize_sentinels(&mut arrays, self.sentinel);
        let report = DatasetReport::collect(&arrays, replaced);
        report.log();

        let dir = match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| WriterError::OutputDirCreation(dir.clone(), e))?;

        let output = self.output.clone();
        let size = task::spawn_blocking(move || {
            let bundle = BundleFile {
                arrays: vec![
                    NamedArray {
                        name: X_NAME.to_string(),
                        array: arrays.x,
                    },
                    NamedArray {
                        name: Y_DAILY_NAME.to_string(),
                        array: arrays.y_daily,
                    },
                    NamedArray {
                        name: Y_HOURLY_NAME.to_string(),
                        array: arrays.y_hourly,
                    },
                ],
            };
            write_bundle_file(&bundle, &dir, &output)
        })
        .await??;

        info!("Wrote dataset bundle ({} bytes) to {}", size, self.output.display());
        Ok(report)
    }
}

/// Encodes and compresses `bundle` into a temporary file in `dir`, then renames it to
/// `output`. Blocking; returns the compressed size.
fn write_bundle_file(bundle: &BundleFile, dir: &Path, output: &Path) -> Result<u64, WriterError> {
    let temp_file =
        NamedTempFile::new_in(dir).map_err(|e| WriterError::Write(dir.to_path_buf(), e))?;
    let mut encoder = GzEncoder::new(BufWriter::new(temp_file), Compression::default());
    bincode::serde::encode_into_std_write(bundle, &mut encoder, BINCODE_CONFIG)
        .map_err(|e| WriterError::Encode(Box::new(e)))?;
    let temp_file = encoder
        .finish()
        .map_err(WriterError::Compression)?
        .into_inner()
        .map_err(|e| WriterError::Write(dir.to_path_buf(), e.into_error()))?;

    let file = temp_file.as_file();
    let size = file
        .sync_all()
        .and_then(|_| file.metadata())
        .map_err(|e| WriterError::Write(dir.to_path_buf(), e))?
        .len();
    debug!("Compressed bundle to {} bytes", size);

    temp_file
        .persist(output)
        .map_err(|e| WriterError::Persist(output.to_path_buf(), e))?;
    Ok(size)
}

/// A bundle read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBundle {
    arrays: Vec<(String, Array3<f32>)>,
}

impl DatasetBundle {
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, WriterError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|e| WriterError::Read(path.clone(), e))?;
        let mut decoder = GzipDecoder::new(BufReader::new(file));
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| WriterError::Read(path.clone(), e))?;

        let bundle = task::spawn_blocking(move || {
            bincode::serde::decode_from_slice::<BundleFile, _>(&bytes, BINCODE_CONFIG)
                .map(|(bundle, _)| bundle)
                .map_err(|e| WriterError::Decode(path, Box::new(e)))
        })
        .await??;

        Ok(Self {
            arrays: bundle
                .arrays
                .into_iter()
                .map(|named| (named.name, named.array))
                .collect(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Array3<f32>> {
        self.arrays
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, array)| array)
    }

    /// Splits the bundle back into the three dataset arrays.
    pub fn into_arrays(mut self, path: &Path) -> Result<DatasetArrays, WriterError> {
        let mut take = |name: &'static str| {
            self.arrays
                .iter()
                .position(|(n, _)| n == name)
                .map(|i| self.arrays.swap_remove(i).1)
                .ok_or_else(|| WriterError::MissingArray {
                    path: path.to_path_buf(),
                    name,
                })
        };
        Ok(DatasetArrays {
            x: take(X_NAME)?,
            y_daily: take(Y_DAILY_NAME)?,
            y_hourly: take(Y_HOURLY_NAME)?,
        })
    }
}
