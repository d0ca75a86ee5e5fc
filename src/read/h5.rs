//! Thin wrappers around the `hdf5` crate that report what was missing.

use std::path::Path;

use hdf5::{types::VarLenArray, Dataset, File, Group, H5Type};
use log::trace;
use ndarray::prelude::*;

use super::SrtReadError;

/// Open an HDF5 file read only.
pub(crate) fn h5_open(path: &Path) -> Result<File, SrtReadError> {
    if !path.exists() {
        return Err(SrtReadError::FileNotFound(path.to_path_buf()));
    }
    File::open(path).map_err(|err| SrtReadError::FileOpen {
        path: path.to_path_buf(),
        err,
    })
}

/// The path of `name` inside `parent`, e.g. "/Data/Positioning/TrueTime".
fn child_path(parent: &Group, name: &str) -> String {
    format!("{}/{}", parent.name().trim_end_matches('/'), name)
}

/// Open a group that must exist.
pub(crate) fn h5_open_group(parent: &Group, name: &str) -> Result<Group, SrtReadError> {
    if !parent.link_exists(name) {
        return Err(SrtReadError::MissingField {
            path: child_path(parent, name),
        });
    }
    Ok(parent.group(name)?)
}

/// Open a dataset that must exist.
pub(crate) fn h5_open_dataset(parent: &Group, name: &str) -> Result<Dataset, SrtReadError> {
    if !parent.link_exists(name) {
        return Err(SrtReadError::MissingField {
            path: child_path(parent, name),
        });
    }
    let dataset = parent.dataset(name)?;
    trace!("Opened '{}' with shape {:?}", dataset.name(), dataset.shape());
    Ok(dataset)
}

/// Read a 1-D float dataset. Values are converted from their stored byte order
/// by HDF5.
pub(crate) fn h5_get_1d(parent: &Group, name: &str) -> Result<Array1<f64>, SrtReadError> {
    let dataset = h5_open_dataset(parent, name)?;
    if dataset.ndim() != 1 {
        return Err(SrtReadError::UnsupportedRank {
            path: dataset.name(),
            ndim: dataset.ndim(),
        });
    }
    let values: Vec<f64> = dataset.read_raw()?;
    Ok(Array1::from(values))
}

/// Read a single value. The producer writes these either as scalar datasets
/// or as one-element arrays; both are accepted.
pub(crate) fn h5_get_scalar<T: H5Type + Copy>(
    parent: &Group,
    name: &str,
) -> Result<T, SrtReadError> {
    let dataset = h5_open_dataset(parent, name)?;
    if dataset.is_scalar() {
        return Ok(dataset.read_scalar()?);
    }
    if dataset.size() != 1 {
        return Err(SrtReadError::NotScalar {
            path: dataset.name(),
            shape: dataset.shape(),
        });
    }
    let values: Vec<T> = dataset.read_raw()?;
    Ok(values[0])
}

/// The length of a 1-D dataset, without reading it.
pub(crate) fn h5_get_len(parent: &Group, name: &str) -> Result<usize, SrtReadError> {
    let dataset = h5_open_dataset(parent, name)?;
    match *dataset.shape().as_slice() {
        [len] => Ok(len),
        _ => Err(SrtReadError::UnsupportedRank {
            path: dataset.name(),
            ndim: dataset.ndim(),
        }),
    }
}

/// Read a stack of spectra into a `[row][channel]` array, exactly as the
/// values are interpreted by their declared type. No byte swapping is done
/// here; see [`byteswap_f64`].
///
/// The stack may be a 2-D dataset, or a 1-D dataset of variable-length rows.
/// In the latter case every row must have the same length.
pub(crate) fn h5_get_spectra(parent: &Group, name: &str) -> Result<Array2<f64>, SrtReadError> {
    let dataset = h5_open_dataset(parent, name)?;
    let spectra = match *dataset.shape().as_slice() {
        [num_rows, num_chans] => {
            let values: Vec<f64> = dataset.read_raw()?;
            Array2::from_shape_vec((num_rows, num_chans), values)?
        }

        [num_rows] => {
            let rows: Vec<VarLenArray<f64>> = dataset.read_raw()?;
            let num_chans = rows.first().map(|row| row.len()).unwrap_or(0);
            let mut spectra = Array2::zeros((num_rows, num_chans));
            for (i_row, (row, mut spectra_row)) in
                rows.iter().zip(spectra.outer_iter_mut()).enumerate()
            {
                if row.len() != num_chans {
                    return Err(SrtReadError::RaggedSpectrum {
                        path: dataset.name(),
                        row: i_row,
                        expected: num_chans,
                        found: row.len(),
                    });
                }
                spectra_row.assign(&ArrayView1::from(row.as_slice()));
            }
            spectra
        }

        _ => {
            return Err(SrtReadError::UnsupportedRank {
                path: dataset.name(),
                ndim: dataset.ndim(),
            })
        }
    };
    trace!("Read '{}' as {:?}", dataset.name(), spectra.dim());
    Ok(spectra)
}

/// Reverse the bytes of every value. The spectrometer writes its spectra
/// big endian underneath a type that doesn't say so.
pub(crate) fn byteswap_f64(values: &mut Array2<f64>) {
    values.par_mapv_inplace(|v| f64::from_bits(v.to_bits().swap_bytes()));
}
