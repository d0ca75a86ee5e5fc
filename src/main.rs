use std::path::PathBuf;

use clap::{AppSettings, Parser};
use log::{info, warn};
use ndarray::prelude::*;

use srt::{FrequencyAxis, PositionField, SrtReadError, SrtReader};

#[derive(Parser)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(disable_help_subcommand = true)]
#[clap(infer_long_args = true)]
/// Summarise an SRT measurement file.
struct Args {
    /// The HDF5 measurement file to summarise.
    file: PathBuf,

    /// Derive the frequency axis from the file's spectrometer settings instead
    /// of using the SRT's fixed axis.
    #[clap(long)]
    axis_from_file: bool,

    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv).
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbosity);

    if let Err(e) = try_main(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn try_main(args: &Args) -> Result<(), SrtReadError> {
    SrtReader::scoped(&args.file, |reader| {
        let timestamps = reader.get_time()?;
        let positions = reader.get_object_positions()?;
        let metadata = reader.get_spectrometer_metadata()?;
        let spectrum = reader.get_power_spectrum()?;

        info!("File: {}", reader.path().display());
        info!("Measurements:      {}", timestamps.len());
        info!("Spectrum channels: {}", spectrum.len_of(Axis(1)));
        if let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) {
            info!("First timestamp:   {first}");
            info!("Last timestamp:    {last}");
        }

        info!("IQ rate:           {} Hz", metadata.iq_rate);
        info!("Carrier frequency: {} Hz", metadata.carrier_frequency);
        info!("Gain:              {}", metadata.gain);
        info!("N_FFT:             {}", metadata.n_fft);
        info!("N_AVG:             {}", metadata.n_avg);
        info!("Window:            {}", metadata.window);
        info!("Integration time:  {} ms", metadata.t_int_ms);

        for field in PositionField::ALL {
            let values = positions.field(field);
            let min = values.fold(f64::INFINITY, |acc, &v| acc.min(v));
            let max = values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            info!("{:<14} {min:>10.4} .. {max:>10.4} deg", field.name());
        }

        let axis = if args.axis_from_file {
            FrequencyAxis::from_metadata(&metadata).unwrap_or_else(|e| {
                warn!("{e}; using the SRT's fixed axis");
                FrequencyAxis::srt()
            })
        } else {
            FrequencyAxis::srt()
        };
        let (min_freq, max_freq) = axis.frequency_range();
        info!(
            "Frequency axis:    {:.4} .. {:.4} MHz ({} channels)",
            min_freq / 1e6,
            max_freq / 1e6,
            axis.num_channels()
        );
        if axis.num_channels() != spectrum.len_of(Axis(1)) {
            warn!(
                "The frequency axis has {} channels but the spectra have {}",
                axis.num_channels(),
                spectrum.len_of(Axis(1))
            );
        }

        Ok(())
    })
}

/// The least severe level shown for a number of `-v` flags.
fn log_level(verbosity: u8) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

/// `RUST_LOG`, if set, takes precedence over the `-v` flags.
fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_level(verbosity))
        .format_target(false)
        .target(env_logger::Target::Stdout);
    // With -vvv, say where each message came from.
    if verbosity > 2 {
        builder.format(|buf, record| {
            use std::io::Write;

            writeln!(
                buf,
                "[{} {:<5} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.module_path().unwrap_or("srt"),
                record.line().unwrap_or(0),
                record.args()
            )
        });
    }
    builder.parse_default_env();
    builder.init();
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(log_level(0), LevelFilter::Info);
        assert_eq!(log_level(1), LevelFilter::Debug);
        assert_eq!(log_level(2), LevelFilter::Trace);
        assert_eq!(log_level(5), LevelFilter::Trace);
    }

    #[test]
    fn test_args_count_verbosity() {
        let args = Args::try_parse_from(["srt-info", "-vv", "obs.h5"]).unwrap();
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.file, PathBuf::from("obs.h5"));
        assert!(!args.axis_from_file);

        let args = Args::try_parse_from(["srt-info", "--axis-from-file", "obs.h5"]).unwrap();
        assert_eq!(args.verbosity, 0);
        assert!(args.axis_from_file);
    }
}
