//! Input file discovery for directory runs

use crate::constants::WORKBOOK_EXTENSIONS;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Discover the workbook files contributing to a run
///
/// A file path yields just that file; a directory is walked recursively for
/// files with a recognized workbook extension. Results are sorted so runs
/// are deterministic. Excel lock files (`~$...`) are skipped.
pub fn discover_input_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    if !input_path.exists() {
        return Err(Error::configuration(format!(
            "input path '{}' does not exist",
            input_path.display()
        )));
    }

    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input_path).follow_links(true) {
        let entry =
            entry.map_err(|e| Error::io("failed to walk input directory", e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_workbook(path) {
            files.push(path.to_path_buf());
        } else {
            debug!("Skipping non-workbook file: {}", path.display());
        }
    }

    files.sort();
    Ok(files)
}

fn is_workbook(path: &Path) -> bool {
    let locked = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("~$"));
    if locked {
        return false;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| WORKBOOK_EXTENSIONS.contains(&ext.as_str()))
}
