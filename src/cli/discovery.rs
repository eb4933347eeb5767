use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use log::{debug, warn};
use std::path::{Path, PathBuf};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expand inputs into files; exclude globs only apply to walked directories
pub fn collect_files(inputs: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let patterns = exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {}", p)))
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkBuilder::new(input).build() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        warn!("Skipping unreadable entry: {}", err);
                        continue;
                    }
                };
                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                let path = entry.into_path();
                if is_excluded(&path, &patterns) {
                    debug!("Excluded {}", path.display());
                    continue;
                }
                files.push(path);
            }
        } else if input.exists() {
            files.push(input.clone());
        } else {
            warn!("File not found: {}", input.display());
        }
    }

    Ok(files)
}

fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    let relative = path.strip_prefix(".").unwrap_or(path);
    patterns
        .iter()
        .any(|p| p.matches_path_with(relative, MATCH_OPTIONS))
}
