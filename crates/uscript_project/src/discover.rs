//! Source file discovery.

use std::path::{Path, PathBuf};
use tracing::trace;
use uscript_options::ProjectConfig;

/// Collect the source files named by `config.include`, relative to `root`.
///
/// Included directories are walked recursively; hidden directories and
/// excluded paths are skipped. The result is sorted and free of duplicates.
pub fn discover_source_files(root: &Path, config: &ProjectConfig) -> Vec<PathBuf> {
    let mut result = Vec::new();

    for include in &config.include {
        let path = match include.as_str() {
            "" | "." => root.to_path_buf(),
            _ => root.join(include),
        };
        if path.is_file() {
            if config.is_source_file(&path) && !config.is_excluded(&path) {
                result.push(path);
            }
        } else if path.is_dir() {
            walk_directory(&path, config, &mut result);
        } else {
            trace!(path = %path.display(), "include does not exist");
        }
    }

    result.sort();
    result.dedup();
    result
}

fn walk_directory(dir: &Path, config: &ProjectConfig, result: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            trace!(dir = %dir.display(), %err, "cannot read directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if config.is_excluded(&path) {
            continue;
        }
        if path.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if !hidden {
                walk_directory(&path, config, result);
            }
        } else if config.is_source_file(&path) {
            result.push(path);
        }
    }
}
