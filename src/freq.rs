//! The frequency axis of the SRT spectrometer.

use thiserror::Error;

use crate::SpectrometerMetadata;

/// The SRT's carrier frequency; the hydrogen line \[Hz\].
pub const SRT_CARRIER_FREQ_HZ: f64 = 1.4204e9;

/// The SRT's spectrometer channel width \[Hz\].
pub const SRT_CHANNEL_STEP_HZ: f64 = 3906.0;

/// The SRT's spectrometer has channels -256 to 255 about the carrier.
pub const SRT_HALF_WIDTH: i64 = 256;

/// The default stride through the tick boundaries.
pub const DEFAULT_TICK_DOWNSAMPLE: usize = 64;

#[derive(Error, Debug, PartialEq)]
pub enum FrequencyAxisError {
    #[error("Frequency scale must be positive; got {0}")]
    InvalidScale(f64),

    #[error("Tick downsample factor must be at least 1")]
    InvalidDownsample,

    #[error("FFT length must be at least 2 to make a frequency axis; got {0}")]
    InvalidFftLength(u32),
}

/// A spectrometer frequency axis: channel `k` is at `carrier + step * k` for
/// `k` in `-half_width..half_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyAxis {
    /// \[Hz\]
    pub carrier_hz: f64,

    /// \[Hz\]
    pub step_hz: f64,

    pub half_width: i64,
}

impl Default for FrequencyAxis {
    fn default() -> Self {
        FrequencyAxis::srt()
    }
}

impl FrequencyAxis {
    pub const fn new(carrier_hz: f64, step_hz: f64, half_width: i64) -> FrequencyAxis {
        FrequencyAxis {
            carrier_hz,
            step_hz,
            half_width,
        }
    }

    /// The SRT's fixed axis: 512 channels of 3906 Hz around 1.4204 GHz.
    pub const fn srt() -> FrequencyAxis {
        FrequencyAxis::new(SRT_CARRIER_FREQ_HZ, SRT_CHANNEL_STEP_HZ, SRT_HALF_WIDTH)
    }

    /// Derive the axis from a file's spectrometer settings. The channel width
    /// is the IQ rate over the FFT length, so this is not rounded to a whole
    /// number of Hz like [`FrequencyAxis::srt`].
    pub fn from_metadata(
        metadata: &SpectrometerMetadata,
    ) -> Result<FrequencyAxis, FrequencyAxisError> {
        if metadata.n_fft < 2 {
            return Err(FrequencyAxisError::InvalidFftLength(metadata.n_fft));
        }
        Ok(FrequencyAxis::new(
            metadata.carrier_frequency,
            metadata.iq_rate / f64::from(metadata.n_fft),
            i64::from(metadata.n_fft / 2),
        ))
    }

    fn freq(&self, k: i64) -> f64 {
        self.carrier_hz + self.step_hz * k as f64
    }

    pub fn num_channels(&self) -> usize {
        self.half_width.saturating_mul(2).max(0) as usize
    }

    /// The frequency of every channel \[Hz\], ascending.
    pub fn channel_frequencies(&self) -> Vec<f64> {
        (-self.half_width..self.half_width)
            .map(|k| self.freq(k))
            .collect()
    }

    /// The lowest and highest channel frequencies \[Hz\].
    pub fn frequency_range(&self) -> (f64, f64) {
        (self.freq(-self.half_width), self.freq(self.half_width - 1))
    }

    /// Tick positions for a plot of this axis. The `2 * half_width + 1` channel
    /// boundaries are strided by `downsample`, then divided by `scale` (e.g.
    /// 1e6 for MHz). For the SRT with a stride of 64, that's 9 ticks.
    pub fn axis_tick_values(
        &self,
        downsample: usize,
        scale: f64,
    ) -> Result<Vec<f64>, FrequencyAxisError> {
        // `!(scale > 0.0)` also catches NaN.
        if !(scale > 0.0) {
            return Err(FrequencyAxisError::InvalidScale(scale));
        }
        if downsample == 0 {
            return Err(FrequencyAxisError::InvalidDownsample);
        }

        Ok((-self.half_width..=self.half_width)
            .step_by(downsample)
            .map(|k| self.freq(k) / scale)
            .collect())
    }
}
