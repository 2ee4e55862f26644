use std::path::{Path, PathBuf};

use tracing::info;

use crate::{Result, StrippedTrack};

/// Rename `path` in place to `{title}.{ext}`, keeping the original
/// extension. The artist is announced alongside the title but is not part
/// of the target name. An existing file at the destination is replaced.
///
/// # Errors
/// Returns an error if the filesystem rejects the rename, e.g. when the
/// title contains characters invalid in a filename.
pub fn rename_to_title(path: &Path, track: &StrippedTrack) -> Result<PathBuf> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let original = path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());

    info!(
        "将文件 {original} 重命名为 {}-{}.{ext}",
        track.title, track.artist
    );

    let target = if ext.is_empty() {
        track.title.clone()
    } else {
        format!("{}.{ext}", track.title)
    };
    let dest = path.with_file_name(target);
    std::fs::rename(path, &dest)?;

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(title: &str, artist: &str) -> StrippedTrack {
        StrippedTrack {
            title: title.into(),
            artist: artist.into(),
        }
    }

    #[test]
    fn test_rename_uses_title_and_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("123.mp3");
        std::fs::write(&path, b"audio").unwrap();

        let dest = rename_to_title(&path, &track("Song A", "Artist A")).unwrap();

        assert_eq!(dest, dir.path().join("Song A.mp3"));
        assert!(dest.exists());
        assert!(!path.exists());
    }

    #[test]
    fn test_rename_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("456.flac");
        std::fs::write(&path, b"new").unwrap();
        std::fs::write(dir.path().join("Song B.flac"), b"old").unwrap();

        let dest = rename_to_title(&path, &track("Song B", "Artist B")).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
        assert!(!path.exists());
    }

    #[test]
    fn test_rename_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("789");
        std::fs::write(&path, b"audio").unwrap();

        let dest = rename_to_title(&path, &track("Song C", "Artist C")).unwrap();

        assert_eq!(dest, dir.path().join("Song C"));
        assert!(dest.exists());
    }

    #[test]
    fn test_rename_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("123.mp3");

        assert!(rename_to_title(&path, &track("Song D", "Artist D")).is_err());
    }
}
