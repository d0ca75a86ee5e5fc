//! Reading of Small Radio Telescope (SRT) HDF5 measurement files.

pub mod freq;
pub mod read;

pub use freq::{FrequencyAxis, FrequencyAxisError};
pub use read::{SrtReadError, SrtReader};

use hifitime::{Epoch, SECONDS_PER_DAY};
use ndarray::Array1;

/// The number of UTC seconds between 1900-01-01 and 1904-01-01 (1461 days;
/// 1900 is not a leap year). `TrueTime` is counted from the latter, hifitime
/// counts UTC seconds from the former.
pub const SECONDS_1900_TO_1904: f64 = 1461.0 * SECONDS_PER_DAY;

/// The reference epoch of `TrueTime` values, 1904-01-01T00:00:00 UTC.
pub fn true_time_epoch() -> Epoch {
    Epoch::from_utc_seconds(SECONDS_1900_TO_1904)
}

/// Convert a `TrueTime` value (seconds since 1904-01-01T00:00:00 UTC) into an
/// [`Epoch`]. Fractional seconds are kept.
pub fn true_time_to_epoch(true_time: f64) -> Epoch {
    Epoch::from_utc_seconds(SECONDS_1900_TO_1904 + true_time)
}

/// The logical names of the positioning sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionField {
    Azimuth,
    Elevation,
    CenterH,
    CenterV,
    TrueAzimuth,
    TrueElevation,
}

impl PositionField {
    pub const ALL: [PositionField; 6] = [
        PositionField::Azimuth,
        PositionField::Elevation,
        PositionField::CenterH,
        PositionField::CenterV,
        PositionField::TrueAzimuth,
        PositionField::TrueElevation,
    ];

    /// The canonical name of this field.
    pub fn name(self) -> &'static str {
        match self {
            PositionField::Azimuth => "Azimuth",
            PositionField::Elevation => "Elevation",
            PositionField::CenterH => "CenterH",
            PositionField::CenterV => "CenterV",
            PositionField::TrueAzimuth => "TrueAzimuth",
            PositionField::TrueElevation => "TrueElevation",
        }
    }

    /// Where this field lives, relative to the `Data/Positioning` group.
    ///
    /// The object elevation is stored as "elevation"; the producer writes it
    /// with the wrong case, and that is what has to be read.
    pub fn stored_path(self) -> (&'static str, &'static str) {
        match self {
            PositionField::Azimuth => ("ObjectPosition", "Azimuth"),
            PositionField::Elevation => ("ObjectPosition", "elevation"),
            PositionField::CenterH => ("ObjectOffset", "CenterH"),
            PositionField::CenterV => ("ObjectOffset", "CenterV"),
            PositionField::TrueAzimuth => ("TrueMeasurementPosition", "Azimuth"),
            PositionField::TrueElevation => ("TrueMeasurementPosition", "Elevation"),
        }
    }

    pub fn from_name(name: &str) -> Option<PositionField> {
        PositionField::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Antenna positioning over the measurement. Every array has one entry per
/// measurement index. All values are in \[degrees\].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPositions {
    /// The commanded azimuth of the tracked object.
    pub azimuth: Array1<f64>,

    /// The commanded elevation of the tracked object.
    pub elevation: Array1<f64>,

    /// The horizontal pointing offset from the object.
    pub center_h: Array1<f64>,

    /// The vertical pointing offset from the object.
    pub center_v: Array1<f64>,

    /// The azimuth the antenna was actually at.
    pub true_azimuth: Array1<f64>,

    /// The elevation the antenna was actually at.
    pub true_elevation: Array1<f64>,
}

impl ObjectPositions {
    pub fn field(&self, field: PositionField) -> &Array1<f64> {
        match field {
            PositionField::Azimuth => &self.azimuth,
            PositionField::Elevation => &self.elevation,
            PositionField::CenterH => &self.center_h,
            PositionField::CenterV => &self.center_v,
            PositionField::TrueAzimuth => &self.true_azimuth,
            PositionField::TrueElevation => &self.true_elevation,
        }
    }

    /// Look up a sequence by its canonical name (e.g. "Elevation").
    pub fn get(&self, name: &str) -> Option<&Array1<f64>> {
        PositionField::from_name(name).map(|f| self.field(f))
    }

    /// The number of measurements.
    pub fn len(&self) -> usize {
        self.azimuth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.azimuth.is_empty()
    }
}

/// Spectrometer settings for the measurement. Each is a single value for the
/// whole file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrometerMetadata {
    /// The IQ sample rate \[Hz\].
    pub iq_rate: f64,

    /// The centre frequency of the baseband \[Hz\].
    pub carrier_frequency: f64,

    pub gain: f64,

    /// The FFT length, i.e. the number of channels in each spectrum.
    pub n_fft: u32,

    /// The number of FFTs averaged into each spectrum.
    pub n_avg: u32,

    /// The FFT window function, as the instrument enumerates it.
    pub window: u32,

    /// The integration time of each spectrum \[ms\].
    pub t_int_ms: u32,
}
