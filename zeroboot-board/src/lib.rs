//! Board definitions for the zeroboot bootloader
//!
//! Parses `board.toml`, resolves it with [`zeroboot_core`] and hands the
//! result to firmware build scripts as a postcard blob.

pub mod board;
pub mod check;
pub mod emit;
pub mod error;
pub mod report;
pub mod schema;

pub use board::Board;
pub use check::{check_board, CheckOptions, Checked};
pub use emit::{emit, try_emit, Emitted, BLOB_FILE_NAME};
pub use error::BoardError;
