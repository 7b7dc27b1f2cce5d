//! I/O utilities for reading sequence batches and writing image batches.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, WriteNpyExt};

use crate::batch::{ImageBatch, SequenceBatch};
use crate::error::{ImagingError, Result};

/// Read a sequence batch, choosing the format from the file extension.
///
/// Supported extensions: `.npy` and `.csv`.
pub fn read_batch<P: AsRef<Path>>(path: P) -> Result<SequenceBatch> {
    let path = path.as_ref();
    let batch = match extension(path).as_deref() {
        Some("npy") => read_npy(path)?,
        Some("csv") => read_csv(path)?,
        _ => {
            return Err(ImagingError::FormatError(format!(
                "unsupported input format: {}",
                path.display()
            )))
        }
    };

    let (n_samples, n_timestamps) = batch.shape();
    tracing::debug!(path = %path.display(), n_samples, n_timestamps, "read sequence batch");
    Ok(batch)
}

/// Read a 2D array of shape (N, L) from a NumPy .npy file.
///
/// Both `f64` and `f32` arrays are accepted.
pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<SequenceBatch> {
    let file = File::open(path.as_ref())?;
    match Array2::<f64>::read_npy(BufReader::new(file)) {
        Ok(arr) => Ok(SequenceBatch::from_array(arr)),
        Err(e) => {
            let file = File::open(path.as_ref())?;
            let arr = Array2::<f32>::read_npy(BufReader::new(file)).map_err(|_| {
                ImagingError::FormatError(format!("Failed to read npy file: {}", e))
            })?;
            Ok(SequenceBatch::from_array(arr.mapv(f64::from)))
        }
    }
}

/// Read a headerless CSV file, one sample per record.
///
/// Blank lines and lines starting with `#` are skipped. Fields may be quoted
/// and surrounding whitespace is trimmed. Records of unequal length are
/// rejected by [`SequenceBatch::from_rows`].
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<SequenceBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path.as_ref())
        .map_err(csv_error)?;

    let rows = reader
        .deserialize::<Vec<f64>>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    SequenceBatch::from_rows(&rows)
}

fn csv_error(e: csv::Error) -> ImagingError {
    let message = match e.position() {
        Some(pos) => format!("line {}: {}", pos.line(), e),
        None => format!("Failed to read csv: {}", e),
    };
    match e.into_kind() {
        csv::ErrorKind::Io(io) => ImagingError::IoError(io),
        _ => ImagingError::FormatError(message),
    }
}

/// Write an image batch, choosing the format from the file extension.
///
/// Supported extensions: `.npy` (3D array) and `.json` (nested lists).
pub fn write_images<P: AsRef<Path>>(path: P, images: &ImageBatch) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("npy") => {
            let writer = BufWriter::new(File::create(path)?);
            images
                .view()
                .write_npy(writer)
                .map_err(|e| ImagingError::FormatError(format!("Failed to write npy: {}", e)))
        }
        Some("json") => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(writer, &images.to_nested())
                .map_err(|e| ImagingError::FormatError(format!("Failed to write json: {}", e)))
        }
        _ => Err(ImagingError::FormatError(format!(
            "unsupported output format: {}",
            path.display()
        ))),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
