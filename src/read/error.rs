//! Errors from reading SRT measurement files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SrtReadError {
    #[error("Measurement file '{0}' does not exist")]
    FileNotFound(PathBuf),

    #[error("Couldn't open '{path}' as an HDF5 file: {err}")]
    FileOpen { path: PathBuf, err: hdf5::Error },

    #[error("'{0}' is not an SRT measurement file; it has no 'Data' group")]
    NotMeasurementFile(PathBuf),

    #[error("Attempted to read from a measurement file that has been closed")]
    ReaderClosed,

    #[error("Measurement file has no '{path}'")]
    MissingField { path: String },

    #[error("'{path}' has {found} entries, but there are {expected} measurements")]
    LengthMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("Expected '{path}' to be a single value, but it has shape {shape:?}")]
    NotScalar { path: String, shape: Vec<usize> },

    #[error("Row {row} of '{path}' has {found} channels, but row 0 has {expected}")]
    RaggedSpectrum {
        path: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("'{path}' has an unsupported number of dimensions ({ndim})")]
    UnsupportedRank { path: String, ndim: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),
}

impl SrtReadError {
    /// Did this error come from opening the file, i.e. the file is missing,
    /// unreadable or not laid out as a measurement file?
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            SrtReadError::FileNotFound(_)
                | SrtReadError::FileOpen { .. }
                | SrtReadError::NotMeasurementFile(_)
        )
    }
}
