//! Convert a signal file to WAV.

use std::path::PathBuf;

use clap::Args;
use netplus_io::{ExportOptions, SignalFile, export_wav};

/// Convert a signal file to a 32-bit float WAV file.
#[derive(Args)]
pub struct ExportWavArgs {
    /// Signal file to read
    pub input: PathBuf,

    /// WAV file to write (default: input with a .wav extension)
    pub output: Option<PathBuf>,

    /// Sample rate in Hz (default: derived from the sampling period)
    #[arg(short = 'r', long)]
    pub sample_rate: Option<u32>,

    /// Scale to a peak of 1.0
    #[arg(long)]
    pub normalize: bool,
}

/// Run the export-wav command.
pub fn run(args: ExportWavArgs) -> anyhow::Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("wav"));
    let signal = SignalFile::open(&args.input)?;
    let info = export_wav(
        &signal,
        &output,
        ExportOptions {
            sample_rate: args.sample_rate,
            normalize: args.normalize,
        },
    )?;
    let layout = if info.channels == 2 { "stereo I/Q" } else { "mono" };
    println!(
        "Wrote {} ({layout}, {} Hz, {} frames)",
        output.display(),
        info.sample_rate,
        info.num_frames
    );
    Ok(())
}
