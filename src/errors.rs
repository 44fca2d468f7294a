// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Failed invocations are reported as [`InvokeError`]; this module covers
//! everything around them (config files, CLI wiring).

use thiserror::Error;

use crate::render::InvokeError;

#[derive(Error, Debug)]
pub enum ProcrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProcrunError>;
