//! Per-file workflow and batch orchestration

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::rename::rename_to_title;
use crate::tags::strip_file;
use crate::{ProcessMode, Result};

// Mora names downloaded files by numeric store ID. The empty string
// matches as well; such files are retained.
static NUMERIC_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new("^[0-9]*$").unwrap());

/// Settings threaded through every processing call.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    pub skip_rename: bool,
    pub stop_on_error: bool,
    pub extra_strip_keys: Vec<String>,
}

#[must_use]
pub fn is_numeric_name(name: &str) -> bool {
    NUMERIC_NAME.is_match(name)
}

fn has_numeric_stem(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(is_numeric_name)
}

/// List the immediate files of `dir` (no recursion into subdirectories),
/// keeping only all-digit basenames unless `skip_filtering` is set.
pub fn collect_files(dir: &Path, skip_filtering: bool) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    debug!("文件夹有 {} 个文件：", files.len());

    let selected: Vec<PathBuf> = if skip_filtering {
        files
    } else {
        files
            .into_iter()
            .filter(|p| {
                if let Some(name) = p.file_name() {
                    debug!("{}", name.to_string_lossy());
                }
                has_numeric_stem(p)
            })
            .collect()
    };

    debug!("待处理 {} 个文件：", selected.len());
    selected
}

/// Process one file: strip its tags, then rename it unless renaming is
/// skipped.
pub fn process_one(path: &Path, mode: ProcessMode, ctx: &ProcessContext) -> Result<()> {
    let track = strip_file(path, mode, &ctx.extra_strip_keys)?;

    if !ctx.skip_rename {
        rename_to_title(path, &track)?;
    }

    println!();
    Ok(())
}

/// Process every file on the shared worker pool and join.
///
/// With `stop_on_error` unset every unit runs to completion and the first
/// recorded failure is surfaced afterwards; with it set, no new units are
/// launched once one has failed.
pub fn run_batch(files: &[PathBuf], ctx: &ProcessContext) -> Result<()> {
    if ctx.stop_on_error {
        files
            .par_iter()
            .try_for_each(|file| process_one(file, ProcessMode::Batch, ctx))
    } else {
        let failures: Vec<crate::Error> = files
            .par_iter()
            .map(|file| process_one(file, ProcessMode::Batch, ctx))
            .filter_map(std::result::Result::err)
            .collect();
        failures.into_iter().next().map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_name_accepts_digits_and_empty() {
        assert!(is_numeric_name("00123"));
        assert!(is_numeric_name("0"));
        assert!(is_numeric_name(""));
    }

    #[test]
    fn test_numeric_name_rejects_non_digits() {
        assert!(!is_numeric_name("track1"));
        assert!(!is_numeric_name("abc"));
        assert!(!is_numeric_name("12 3"));
        assert!(!is_numeric_name("１２３")); // fullwidth digits are not [0-9]
    }

    #[test]
    fn test_collect_files_filters_to_numeric_stems() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["123.mp3", "00456.flac", "abc.mp3", "track1.mp3"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let mut names: Vec<String> = collect_files(dir.path(), false)
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();

        assert_eq!(names, ["00456.flac", "123.mp3"]);
    }

    #[test]
    fn test_collect_files_skip_filtering_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["123.mp3", "abc.mp3"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        assert_eq!(collect_files(dir.path(), true).len(), 2);
    }

    #[test]
    fn test_collect_files_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("123.mp3"), b"x").unwrap();
        let sub = dir.path().join("999");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("777.mp3"), b"x").unwrap();

        let files = collect_files(dir.path(), false);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("123.mp3"));
    }
}
