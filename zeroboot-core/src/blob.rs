//! Binary form of the resolved configuration
//!
//! The board tooling resolves at build time and embeds the result as a
//! postcard blob; the bootloader decodes it once at startup.

use crate::resolve::{ResolvedConfig, CONFIG_VERSION};

/// Upper bound on an encoded configuration
pub const MAX_BLOB_SIZE: usize = 256;

/// Blob encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlobError {
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch { found: u8 },
}

impl core::fmt::Display for BlobError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BlobError::Serialize => f.write_str("configuration does not fit the blob buffer"),
            BlobError::Deserialize => f.write_str("configuration blob is corrupt"),
            BlobError::VersionMismatch { found } => write!(
                f,
                "configuration blob version {} (expected {})",
                found, CONFIG_VERSION
            ),
        }
    }
}

/// Encode into `buf`, returning the used prefix
pub fn encode<'a>(config: &ResolvedConfig, buf: &'a mut [u8]) -> Result<&'a mut [u8], BlobError> {
    postcard::to_slice(config, buf).map_err(|_| BlobError::Serialize)
}

/// Decode and version-check a blob
pub fn decode(bytes: &[u8]) -> Result<ResolvedConfig, BlobError> {
    let config: ResolvedConfig =
        postcard::from_bytes(bytes).map_err(|_| BlobError::Deserialize)?;

    if config.version != CONFIG_VERSION {
        warn!(
            "Config version mismatch: found {}, expected {}",
            config.version, CONFIG_VERSION
        );
        return Err(BlobError::VersionMismatch {
            found: config.version,
        });
    }
    Ok(config)
}
