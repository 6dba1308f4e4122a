//! Board checking shared by `zeroboot-check`

use std::path::{Path, PathBuf};

use zeroboot_core::Resolution;

use crate::board::Board;
use crate::emit::write_blob;
use crate::error::BoardError;

/// Options applied to every checked board
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Promote the first warning to an error
    pub deny_warnings: bool,
    /// Write `<stem>.bin` blobs into this directory
    pub emit_dir: Option<PathBuf>,
}

/// A board that passed
#[derive(Debug)]
pub struct Checked {
    pub board: Board,
    pub resolution: Resolution,
    pub blob_path: Option<PathBuf>,
}

/// Blob file name for a board definition path
pub fn blob_file_name(board_path: &Path) -> String {
    let stem = board_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "board".to_string());
    format!("{}.bin", stem)
}

/// Load and resolve one board, writing its blob if asked
pub fn check_board(path: &Path, options: &CheckOptions) -> Result<Checked, BoardError> {
    let mut board = Board::load(path)?;
    if options.deny_warnings {
        board.policy = board.policy.with_deny_warnings(true);
    }
    let resolution = board.resolve()?;

    let blob_path = match &options.emit_dir {
        Some(dir) => {
            let blob_path = dir.join(blob_file_name(path));
            write_blob(&resolution, &blob_path)?;
            Some(blob_path)
        }
        None => None,
    };

    Ok(Checked {
        board,
        resolution,
        blob_path,
    })
}
