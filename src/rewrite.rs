use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Removes the temporary file on drop unless a successful rename already
/// moved it onto the original path.
struct TempGuard {
    path: Option<PathBuf>,
}

impl TempGuard {
    fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take()
            && let Err(err) = fs::remove_file(&path)
        {
            tracing::warn!("failed to remove temp file {}: {}", path.display(), err);
        }
    }
}

/// Atomically replaces `path` with `contents`, preserving the original
/// file's permissions. The new contents are staged in an adjacent
/// `<path>.tmp` file and renamed into place, so a partial write is never
/// visible at the original path.
pub fn replace_file(path: &Path, contents: &str) -> Result<()> {
    println!("Rewriting {}...", path.display());

    let permissions = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .permissions();

    let temp_path = temp_path_for(path);
    let file = fs::File::create(&temp_path)
        .with_context(|| format!("failed to create {}", temp_path.display()))?;
    let mut guard = TempGuard {
        path: Some(temp_path.clone()),
    };

    fs::set_permissions(&temp_path, permissions)
        .with_context(|| format!("failed to set permissions on {}", temp_path.display()))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", temp_path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", temp_path.display()))?;
    // close the handle before the rename
    drop(writer);

    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    guard.disarm();

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
