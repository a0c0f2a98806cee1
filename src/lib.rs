//! Command-line front end of the cartridge packaging engine.
//!
//! Loads `cartridge.toml`, turns it into a frozen package set, and drives
//! [`cartridge_packager::pipeline`] against the real filesystem. The
//! `cartridge-package` binary is a thin wrapper around [`run::run`].

pub mod cli;
pub mod config;
pub mod error;
pub mod run;

pub use config::{CartridgeManifest, ConfigError};
pub use error::{CartridgeError, Result};
