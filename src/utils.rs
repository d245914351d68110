use crate::errors::ToolkitError;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{info, warn};

/// Returns the files under `root` with the given extension, sorted.
///
/// `root` may be a directory (walked recursively), a single file, or a glob
/// pattern such as `intended/configs/*.cfg`.
pub fn collect_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, ToolkitError> {
    let mut files = Vec::new();

    if root.is_dir() {
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else if root.is_file() {
        files.push(root.to_path_buf());
    } else {
        let pattern = root.to_string_lossy().replace('\\', "/");
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() && has_extension(&path, extension) => files.push(path),
                Err(e) => warn!("Error processing pattern {}: {:?}", pattern, e),
                _ => {}
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_glob_meta(c: char) -> bool {
    matches!(c, '*' | '?' | '[')
}

pub fn is_glob(path: &Path) -> bool {
    path.to_string_lossy().contains(is_glob_meta)
}

/// Leading components of a glob pattern up to the first wildcard, e.g.
/// `intended` for `intended/*/*.cfg`. Matches are relative to this base.
pub fn glob_base(pattern: &Path) -> PathBuf {
    pattern
        .components()
        .take_while(|c| !c.as_os_str().to_string_lossy().contains(is_glob_meta))
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(extension))
}

pub async fn read_file_content(path: &Path) -> Result<String, ToolkitError> {
    async_fs::read_to_string(path)
        .await
        .map_err(|e| ToolkitError::FileReadError(path.display().to_string(), e.to_string()))
}

pub async fn write_file_content(path: &Path, content: &str) -> Result<(), ToolkitError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        async_fs::create_dir_all(parent).await.map_err(|e| {
            ToolkitError::FileWriteError(parent.display().to_string(), e.to_string())
        })?;
    }
    async_fs::write(path, content)
        .await
        .map_err(|e| ToolkitError::FileWriteError(path.display().to_string(), e.to_string()))
}

pub fn print_diff(file: &str, old: &str, new: &str) {
    let patch = diffy::create_patch(old, new);
    let f = diffy::PatchFormatter::new().with_color();
    info!("Diff for file: {}\n{}", file, f.fmt_patch(&patch));
}
