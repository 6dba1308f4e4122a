//! Board loading errors

use std::path::PathBuf;

use thiserror::Error;
use zeroboot_core::blob::BlobError;
use zeroboot_core::ConfigError;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML syntax: {0}")]
    Toml(#[from] toml::de::Error),

    /// Values that parse but do not describe a board
    #[error("invalid board definition ({} problem(s))", .0.len())]
    Invalid(Vec<String>),

    #[error("{0}")]
    Resolve(ConfigError),

    #[error("{0}")]
    Blob(BlobError),

    #[error("OUT_DIR is not set; emit() must run from a build script")]
    NoOutDir,
}

impl From<ConfigError> for BoardError {
    fn from(err: ConfigError) -> Self {
        BoardError::Resolve(err)
    }
}

impl From<BlobError> for BoardError {
    fn from(err: BlobError) -> Self {
        BoardError::Blob(err)
    }
}

impl BoardError {
    /// Heading used in boxed diagnostics
    pub fn heading(&self) -> &'static str {
        match self {
            BoardError::Io { .. } => "Failed to read board definition",
            BoardError::Toml(_) => "Invalid TOML syntax in board definition",
            BoardError::Invalid(_) => "Invalid board definition",
            BoardError::Resolve(_) => "Board configuration does not resolve",
            BoardError::Blob(_) => "Failed to encode resolved configuration",
            BoardError::NoOutDir => "Not running inside a build script",
        }
    }

    /// Detail lines for boxed diagnostics
    pub fn details(&self) -> Vec<String> {
        match self {
            BoardError::Invalid(problems) => problems.clone(),
            BoardError::Io { source, .. } => vec![source.to_string()],
            BoardError::Toml(err) => err.to_string().lines().map(str::to_owned).collect(),
            other => vec![other.to_string()],
        }
    }
}
