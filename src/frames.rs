use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SheetError};

/// Count regular files directly inside `dir`.
///
/// Subdirectories and other non-file entries are ignored.
pub fn count_frames(dir: &Path) -> Result<usize> {
    Ok(frame_paths(dir)?.len())
}

/// Regular files directly inside `dir`, sorted by file name.
///
/// Frame names are zero-padded so name order is frame order.
pub fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SheetError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SheetError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| SheetError::io(entry.path(), e))?;
        if file_type.is_file() {
            paths.push(entry.path());
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}
