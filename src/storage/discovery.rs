use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::domain::CONFIG_PATH;

/// Finds snapshot files under `root`.
///
/// A file is a snapshot if its file name ends with `.<extension>`. Paths
/// (relative to `root`) matching `omit` are skipped, as is anything inside
/// the configuration directory. Without `recursive` only the immediate
/// children of `root` are considered.
///
/// Unreadable entries are skipped. The result is sorted so that loading is
/// deterministic.
#[must_use]
pub fn collect_snapshot_paths(
    root: &Path,
    extension: &str,
    omit: Option<&Regex>,
    recursive: bool,
) -> Vec<PathBuf> {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let config_dir = Path::new(CONFIG_PATH)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&suffix) && name.len() > suffix.len())
        })
        .filter(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if relative.starts_with(&config_dir) {
                return false;
            }
            let skip = omit.is_some_and(|pattern| pattern.is_match(&relative.to_string_lossy()));
            if skip {
                tracing::debug!(path = %relative.display(), "omitted by pattern");
            }
            !skip
        })
        .map(walkdir::DirEntry::into_path)
        .collect();

    paths.sort();
    paths
}
