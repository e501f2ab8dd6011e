//! Platform-specific paths for run configuration.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/netplus/` (Linux), `~/Library/Application Support/netplus/` (macOS), `%APPDATA%\netplus\` (Windows)
//! - **Default run configuration**: `config.toml` inside the user config directory
//!
//! A `netplus.toml` in the working directory takes precedence over the
//! user file; see [`find_run_config`].
//!
//! # Example
//!
//! ```rust,no_run
//! use netplus_config::paths;
//!
//! if let Some(path) = paths::find_run_config(None) {
//!     println!("Using configuration at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "netplus";

/// File name of the user-level run configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE_NAME: &str = "netplus.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the user-level run configuration file.
pub fn user_config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// Find the run configuration to use.
///
/// Searches in the following order:
/// 1. `explicit`, if given (returned even when missing, so loading reports it)
/// 2. `netplus.toml` in the current directory
/// 3. The user configuration file
pub fn find_run_config(explicit: Option<&Path>) -> Option<PathBuf> {
    find_run_config_in(explicit, Path::new("."), &user_config_file())
}

fn find_run_config_in(explicit: Option<&Path>, cwd: &Path, user_file: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = cwd.join(LOCAL_CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    user_file.is_file().then(|| user_file.to_path_buf())
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}
