//! Run configuration commands.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use netplus_config::{RunConfig, find_run_config, user_config_file};

use super::common::load_config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the configuration a run would use
    Show,

    /// Write a configuration file with every default filled in
    Init {
        /// Where to write it (default: --config, else the user config file)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, explicit: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show(explicit),
        ConfigCommand::Init { path, force } => {
            let path = path
                .or_else(|| explicit.map(Path::to_path_buf))
                .unwrap_or_else(user_config_file);
            init(&path, force)
        }
    }
}

fn show(explicit: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(explicit)?;
    match find_run_config(explicit) {
        Some(path) => println!("# {}", path.display()),
        None => println!("# built-in defaults"),
    }
    print!("{}", config.to_toml()?);
    Ok(())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    RunConfig::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netplus.toml");
        init(&path, false).unwrap();
        assert_eq!(RunConfig::load(&path).unwrap(), RunConfig::default());
        assert!(init(&path, false).is_err());
        init(&path, true).unwrap();
    }
}
