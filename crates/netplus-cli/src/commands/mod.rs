//! CLI command implementations.

pub mod common;
pub mod config;
pub mod export_wav;
pub mod inspect;
pub mod run;
