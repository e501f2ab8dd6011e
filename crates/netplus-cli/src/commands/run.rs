//! Run the built-in QAM transmitter.

use std::path::PathBuf;

use clap::Args;
use netplus_config::RunConfig;

use super::common::format_seconds;
use crate::transmitter;

/// Options for `netplus run`. Each one overrides the run configuration.
#[derive(Args)]
pub struct RunArgs {
    /// Folder for signal files
    #[arg(short, long)]
    pub signals_folder: Option<PathBuf>,

    /// Number of bits to transmit
    #[arg(short = 'n', long)]
    pub bits: Option<u64>,

    /// Constellation size M (2, 4, 16, 64, ...)
    #[arg(short = 'm', long)]
    pub order: Option<u32>,

    /// Ring capacity for every signal
    #[arg(long)]
    pub buffer_length: Option<usize>,

    /// Do not write signal files
    #[arg(long)]
    pub no_save: bool,
}

fn apply(args: &RunArgs, config: &mut RunConfig) {
    if let Some(folder) = &args.signals_folder {
        config.signals_folder.clone_from(folder);
    }
    if let Some(bits) = args.bits {
        config.transmitter.number_of_bits = bits;
    }
    if let Some(order) = args.order {
        config.transmitter.order = order;
    }
    if let Some(len) = args.buffer_length {
        config.transmitter.buffer_length = Some(len);
    }
    if args.no_save {
        config.transmitter.save_signals = false;
    }
}

/// Run the run command.
pub fn run(args: RunArgs, mut config: RunConfig) -> anyhow::Result<()> {
    apply(&args, &mut config);
    config.validate()?;

    let tx = &config.transmitter;
    println!(
        "Transmitter: {}-QAM, {} bits at {}/bit, {} samples/symbol",
        tx.order,
        tx.number_of_bits,
        format_seconds(tx.bit_period),
        tx.samples_per_symbol
    );

    tracing::info!(
        folder = %config.signals_folder.display(),
        buffer_length = config.transmitter_buffer_length(),
        save = tx.save_signals,
        "building transmitter"
    );
    let mut transmitter = transmitter::build(&config);
    let report = transmitter.system.run()?;
    tracing::info!(
        passes = report.passes,
        files = report.saved_paths().count(),
        "transmitter run complete"
    );

    println!("Quiescent after {} passes", report.passes);
    for (id, label) in transmitter.signals() {
        let Some(signal) = report.signal(id) else {
            continue;
        };
        match &signal.path {
            Some(path) => println!(
                "  {id:<4} {label:<10} {:>10} samples -> {}",
                signal.written,
                path.display()
            ),
            None => println!("  {id:<4} {label:<10} {:>10} samples", signal.written),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_to_the_config() {
        let args = RunArgs {
            signals_folder: Some(PathBuf::from("elsewhere")),
            bits: Some(10),
            order: Some(16),
            buffer_length: Some(7),
            no_save: true,
        };
        let mut config = RunConfig::default();
        apply(&args, &mut config);
        assert_eq!(config.signals_folder, PathBuf::from("elsewhere"));
        assert_eq!(config.transmitter.number_of_bits, 10);
        assert_eq!(config.transmitter.order, 16);
        assert_eq!(config.transmitter_buffer_length(), 7);
        assert!(!config.transmitter.save_signals);
    }
}
