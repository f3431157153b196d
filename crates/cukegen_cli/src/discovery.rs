use std::fs;
use std::path::Path;

use cukegen_core::SourceFile;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::GenerateError;

/// Directories that never hold hand-written step handlers.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// Loads every text file under `root` except `destination`.
///
/// A missing `root` means nothing has been generated yet and yields no
/// files; a `root` whose existence cannot be checked is an error. Hidden entries and dependency directories are not descended into;
/// files that are not UTF-8 are ignored.
pub fn list_handler_files(root: &Path, destination: &Path) -> Result<Vec<SourceFile>, GenerateError> {
    let exists = root.try_exists().map_err(|source| GenerateError::ScanRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !exists {
        debug!("{} does not exist; no existing steps", root.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e));

    for entry in walker {
        let entry = entry.map_err(|source| GenerateError::Scan {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || entry.path() == destination {
            continue;
        }

        let bytes = fs::read(entry.path()).map_err(|source| GenerateError::ReadHandler {
            path: entry.path().to_path_buf(),
            source,
        })?;
        match String::from_utf8(bytes) {
            Ok(text) => files.push(SourceFile {
                path: entry.path().to_string_lossy().into_owned(),
                text,
            }),
            Err(_) => debug!("skipping non UTF-8 file {}", entry.path().display()),
        }
    }

    debug!("loaded {} files from {}", files.len(), root.display());
    Ok(files)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&&*name))
}
