//! Display signal file metadata.

use std::path::PathBuf;

use clap::Args;
use netplus_core::SignalHeader;
use netplus_io::read_signal_info;
use serde::Serialize;

use super::common::format_seconds;

/// Display signal file information.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the signal file
    pub file: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    file: &'a std::path::Path,
    header: &'a SignalHeader,
    num_samples: u64,
    duration_secs: f64,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let info = read_signal_info(&args.file)?;

    if args.json {
        let output = InspectOutput {
            file: &args.file,
            header: &info.header,
            num_samples: info.num_samples,
            duration_secs: info.duration_secs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let h = &info.header;
    println!("File:               {}", args.file.display());
    println!("Signal Type:        {}", h.signal_type);
    println!("Samples:            {} x {} ({} bytes each)", info.num_samples, h.sample_kind, h.sample_size);
    println!("First Saved Sample: {}", h.first_saved_sample);
    println!("Symbol Period:      {}", format_seconds(h.symbol_period));
    println!("Sampling Period:    {}", format_seconds(h.sampling_period));
    println!("Samples/Symbol:     {}", h.samples_per_symbol);
    println!("Central Wavelength: {:.3} nm", h.central_wavelength * 1e9);
    println!("Central Frequency:  {:.3} THz", h.central_frequency * 1e-12);
    println!("Duration:           {}", format_seconds(info.duration_secs));
    Ok(())
}
