//! Build-script integration
//!
//! A firmware crate's `build.rs` calls [`emit`] with its board file. The
//! board is resolved at compile time and the postcard blob lands in
//! `OUT_DIR`, ready for `include_bytes!`:
//!
//! ```ignore
//! fn main() {
//!     zeroboot_board::emit("board.toml");
//! }
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use zeroboot_core::blob::{self, MAX_BLOB_SIZE};
use zeroboot_core::Resolution;

use crate::board::Board;
use crate::error::BoardError;
use crate::report;

/// File name of the blob written to `OUT_DIR`
pub const BLOB_FILE_NAME: &str = "zeroboot_config.bin";

/// Result of a successful emit
#[derive(Debug)]
pub struct Emitted {
    pub board: Board,
    pub resolution: Resolution,
    pub blob_path: PathBuf,
}

/// Encode a resolution to its blob bytes
pub fn encode(resolution: &Resolution) -> Result<Vec<u8>, BoardError> {
    let mut buf = [0u8; MAX_BLOB_SIZE];
    let bytes = blob::encode(&resolution.config, &mut buf)?;
    Ok(bytes.to_vec())
}

/// Write the encoded resolution to `path`
pub fn write_blob(resolution: &Resolution, path: &Path) -> Result<(), BoardError> {
    let bytes = encode(resolution)?;
    fs::write(path, bytes).map_err(|source| BoardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load, resolve and write the blob into `out_dir`
pub fn try_emit(board_path: &Path, out_dir: &Path) -> Result<Emitted, BoardError> {
    let board = Board::load(board_path)?;
    let resolution = board.resolve()?;
    let blob_path = out_dir.join(BLOB_FILE_NAME);
    write_blob(&resolution, &blob_path)?;
    Ok(Emitted {
        board,
        resolution,
        blob_path,
    })
}

/// Build-script entry point
///
/// Fails the build with a boxed diagnostic if the board does not resolve.
/// Warnings are forwarded as `cargo:warning` lines.
pub fn emit(board_path: impl AsRef<Path>) -> PathBuf {
    let board_path = board_path.as_ref();
    println!("cargo:rerun-if-changed={}", board_path.display());
    let label = board_path.display().to_string();

    let result = env::var_os("OUT_DIR")
        .ok_or(BoardError::NoOutDir)
        .and_then(|out_dir| try_emit(board_path, Path::new(&out_dir)));

    match result {
        Ok(emitted) => {
            for warning in &emitted.resolution.warnings {
                println!("cargo:warning={}: {}", label, warning);
            }
            println!(
                "cargo:warning={} ({}) validated successfully",
                label, emitted.board.name
            );
            emitted.blob_path
        }
        Err(err) => panic!("{}", report::error_box(&label, &err)),
    }
}
