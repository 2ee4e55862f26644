pub mod config;
pub mod process;
pub mod rename;
pub mod tags;

use std::path::PathBuf;

/// How a file is being processed.
///
/// A single-file invocation runs `Interactive` (verbose tag dump allowed,
/// save progress shown); directory batches run `Batch` (quiet saves).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    Interactive,
    Batch,
}

impl ProcessMode {
    #[must_use]
    pub const fn is_batch(self) -> bool {
        matches!(self, Self::Batch)
    }
}

/// Title and artist captured from a track after stripping, before saving.
#[derive(Debug, Clone, Default)]
pub struct StrippedTrack {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tag error: {0}")]
    Tag(#[from] lofty::error::LoftyError),

    #[error("文件不包含任何标签: {}", .0.display())]
    NoTag(PathBuf),

    #[error("非法路径: {}", .0.display())]
    IllegalPath(PathBuf),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
