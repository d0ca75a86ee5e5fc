//! Code to handle reading from SRT measurement files.
//!
//! The files are HDF5, laid out like this:
//!
//! ```text
//! Data/
//!   Positioning/
//!     TrueTime                           f64 [N]
//!     ObjectPosition/Azimuth             f64 [N]
//!     ObjectPosition/elevation           f64 [N]
//!     ObjectOffset/CenterH               f64 [N]
//!     ObjectOffset/CenterV               f64 [N]
//!     TrueMeasurementPosition/Azimuth    f64 [N]
//!     TrueMeasurementPosition/Elevation  f64 [N]
//!   Spectrometer/
//!     IQRate, CarrierFrequency, Gain     f64 scalars
//!     N_FFT, N_AVG, Window, t_int_ms     u32 scalars
//!     BasebandPowerSpectrum              f64 [N][L]
//! ```

mod error;
mod h5;

pub use error::SrtReadError;

use std::path::{Path, PathBuf};

use hdf5::{File, Group};
use hifitime::Epoch;
use log::{debug, trace, warn};
use ndarray::prelude::*;

use crate::{true_time_to_epoch, ObjectPositions, PositionField, SpectrometerMetadata};
use h5::*;

const DATA: &str = "Data";
const POSITIONING: &str = "Positioning";
const SPECTROMETER: &str = "Spectrometer";
const TRUE_TIME: &str = "TrueTime";
const POWER_SPECTRUM: &str = "BasebandPowerSpectrum";

pub struct SrtReader {
    /// The path to the measurement file on disk.
    path: PathBuf,

    /// The open file. `None` once the reader has been closed.
    file: Option<File>,
}

impl SrtReader {
    /// Open a measurement file. The file must be HDF5 and have a "Data" group
    /// at its root; nothing else is checked until it is read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SrtReader, SrtReadError> {
        let path = path.as_ref();
        debug!("Using measurement file: {}", path.display());

        let file = h5_open(path)?;
        if !file.link_exists(DATA) {
            return Err(SrtReadError::NotMeasurementFile(path.to_path_buf()));
        }

        Ok(SrtReader {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    /// Open a measurement file, hand the reader to `f`, and close the file
    /// afterwards, whatever `f` returned.
    pub fn scoped<P, T, F>(path: P, f: F) -> Result<T, SrtReadError>
    where
        P: AsRef<Path>,
        F: FnOnce(&SrtReader) -> Result<T, SrtReadError>,
    {
        let mut reader = SrtReader::open(path)?;
        let result = f(&reader);
        reader.close();
        result
    }

    /// Release the file. Closing an already-closed reader does nothing.
    pub fn close(&mut self) {
        if let Some(file) = self.file.take() {
            debug!("Closing measurement file: {}", self.path.display());
            drop(file);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn data(&self) -> Result<Group, SrtReadError> {
        let file = self.file.as_ref().ok_or(SrtReadError::ReaderClosed)?;
        h5_open_group(file, DATA)
    }

    fn positioning(&self) -> Result<Group, SrtReadError> {
        h5_open_group(&self.data()?, POSITIONING)
    }

    fn spectrometer(&self) -> Result<Group, SrtReadError> {
        h5_open_group(&self.data()?, SPECTROMETER)
    }

    /// The number of measurements in the file, i.e. the length of `TrueTime`.
    /// Every other per-measurement array must have this many entries.
    pub fn num_measurements(&self) -> Result<usize, SrtReadError> {
        h5_get_len(&self.positioning()?, TRUE_TIME)
    }

    /// The timestamp of every measurement. `TrueTime` is seconds since
    /// 1904-01-01T00:00:00 UTC; leap seconds are not counted.
    pub fn get_time(&self) -> Result<Vec<Epoch>, SrtReadError> {
        let true_time = h5_get_1d(&self.positioning()?, TRUE_TIME)?;
        let timestamps: Vec<Epoch> = true_time.iter().copied().map(true_time_to_epoch).collect();

        match timestamps.as_slice() {
            [] => debug!("No timestamps"),
            [t] => debug!("Only timestamp: {t}"),
            [t0, .., tn] => {
                debug!("First timestamp: {t0}");
                debug!("Last timestamp:  {tn}");
            }
        }

        Ok(timestamps)
    }

    /// All six positioning sequences, under their canonical names.
    pub fn get_object_positions(&self) -> Result<ObjectPositions, SrtReadError> {
        let positioning = self.positioning()?;
        let num_measurements = h5_get_len(&positioning, TRUE_TIME)?;

        let read = |field: PositionField| -> Result<Array1<f64>, SrtReadError> {
            let (group, name) = field.stored_path();
            let group = h5_open_group(&positioning, group)?;
            let values = h5_get_1d(&group, name)?;
            if values.len() != num_measurements {
                return Err(SrtReadError::LengthMismatch {
                    path: format!("{}/{}", group.name(), name),
                    expected: num_measurements,
                    found: values.len(),
                });
            }
            trace!("Read {} {} values", values.len(), field.name());
            Ok(values)
        };

        Ok(ObjectPositions {
            azimuth: read(PositionField::Azimuth)?,
            elevation: read(PositionField::Elevation)?,
            center_h: read(PositionField::CenterH)?,
            center_v: read(PositionField::CenterV)?,
            true_azimuth: read(PositionField::TrueAzimuth)?,
            true_elevation: read(PositionField::TrueElevation)?,
        })
    }

    pub fn get_spectrometer_metadata(&self) -> Result<SpectrometerMetadata, SrtReadError> {
        let spectrometer = self.spectrometer()?;
        let metadata = SpectrometerMetadata {
            iq_rate: h5_get_scalar(&spectrometer, "IQRate")?,
            carrier_frequency: h5_get_scalar(&spectrometer, "CarrierFrequency")?,
            gain: h5_get_scalar(&spectrometer, "Gain")?,
            n_fft: h5_get_scalar(&spectrometer, "N_FFT")?,
            n_avg: h5_get_scalar(&spectrometer, "N_AVG")?,
            window: h5_get_scalar(&spectrometer, "Window")?,
            t_int_ms: h5_get_scalar(&spectrometer, "t_int_ms")?,
        };
        debug!("IQ rate:           {} Hz", metadata.iq_rate);
        debug!("Carrier frequency: {} Hz", metadata.carrier_frequency);
        debug!("N_FFT: {}, N_AVG: {}", metadata.n_fft, metadata.n_avg);
        Ok(metadata)
    }

    /// The power spectra, one row per measurement (`[measurement][channel]`),
    /// in host byte order.
    pub fn get_power_spectrum(&self) -> Result<Array2<f64>, SrtReadError> {
        let num_measurements = self.num_measurements()?;
        let spectrometer = self.spectrometer()?;
        let mut spectra = h5_get_spectra(&spectrometer, POWER_SPECTRUM)?;
        if spectra.len_of(Axis(0)) != num_measurements {
            return Err(SrtReadError::LengthMismatch {
                path: format!("{}/{}", spectrometer.name(), POWER_SPECTRUM),
                expected: num_measurements,
                found: spectra.len_of(Axis(0)),
            });
        }

        byteswap_f64(&mut spectra);
        debug!(
            "Power spectrum: {} measurements x {} channels",
            spectra.len_of(Axis(0)),
            spectra.len_of(Axis(1))
        );
        Ok(spectra)
    }
}

impl Drop for SrtReader {
    fn drop(&mut self) {
        if self.file.is_some() {
            warn!(
                "Measurement file '{}' was never closed; closing it now",
                self.path.display()
            );
            self.close();
        }
    }
}
