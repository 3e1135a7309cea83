use crate::squash;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Bundled third-party source lives here by convention; never descended into.
const VENDOR_DIR: &str = "vendor";

const GO_EXT: &str = "go";

fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GO_EXT)
}

/// Processes one input path. A file must be a Go source file; a directory
/// is traversed recursively, visiting every regular `.go` file outside
/// `vendor` directories. The first error aborts.
pub fn process_path(path: &Path) -> Result<()> {
    let metadata =
        fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;

    if !metadata.is_dir() {
        if !is_go_file(path) {
            bail!("{}: not a Go file", path.display());
        }
        return squash::squash_file(path);
    }

    let walker = WalkDir::new(path)
        .into_iter()
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == VENDOR_DIR));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_go_file(entry.path()) {
            tracing::trace!("skipping {}", entry.path().display());
            continue;
        }
        squash::squash_file(entry.path())?;
    }

    Ok(())
}
