//! Project-host surface: directory listing and the current project dir.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

/// Host collaborator the expansion step depends on. The real language
/// service host supplies these; tests use fixed in-memory listings.
pub trait ProjectHost {
    /// Current directory of the project being edited.
    fn current_directory(&self) -> String;

    /// List files under `root` with one of `extensions`, honoring exclude
    /// names/globs and, when present, include globs. Globs are relative
    /// to `root`.
    fn read_directory(
        &self,
        root: &Path,
        extensions: &[&str],
        exclude: &[String],
        include: Option<&[String]>,
    ) -> Result<Vec<String>>;
}

/// [`ProjectHost`] over the real filesystem.
#[derive(Debug, Clone)]
pub struct FsProjectHost {
    current_directory: PathBuf,
}

impl FsProjectHost {
    pub fn new(current_directory: impl Into<PathBuf>) -> Self {
        FsProjectHost {
            current_directory: current_directory.into(),
        }
    }
}

impl ProjectHost for FsProjectHost {
    fn current_directory(&self) -> String {
        self.current_directory.to_string_lossy().into_owned()
    }

    fn read_directory(
        &self,
        root: &Path,
        extensions: &[&str],
        exclude: &[String],
        include: Option<&[String]>,
    ) -> Result<Vec<String>> {
        if !root.is_dir() {
            bail!("not a readable directory: {}", root.display());
        }

        let exclude_set = build_globset(exclude)
            .with_context(|| format!("invalid exclude patterns for {}", root.display()))?;
        let include_set = match include.filter(|globs| !globs.is_empty()) {
            Some(globs) => Some(
                build_globset(globs)
                    .with_context(|| format!("invalid include patterns for {}", root.display()))?,
            ),
            None => None,
        };

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // Prune excluded directories instead of descending.
                if !entry.file_type().is_dir() {
                    return true;
                }
                match entry.path().strip_prefix(root) {
                    Ok(relative) if relative.as_os_str().is_empty() => true,
                    Ok(relative) => !exclude_set.is_match(relative),
                    Err(_) => true,
                }
            });

        for entry in walker {
            // Unreadable subtrees are skipped, not fatal.
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !extensions.iter().any(|ext| name.ends_with(ext)) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if exclude_set.is_match(relative) {
                continue;
            }
            if let Some(include_set) = &include_set {
                if !include_set.is_match(relative) {
                    continue;
                }
            }
            files.push(entry.path().to_string_lossy().into_owned());
        }

        Ok(files)
    }
}

/// Compile tsconfig-style patterns. A bare name like `node_modules` or
/// `fixtures` excludes the directory wherever it appears; anything with a
/// separator or glob metacharacter is taken as-is, with a `/**` variant so
/// a directory pattern also covers the files beneath it.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim_end_matches('/');
        if pattern.is_empty() {
            continue;
        }
        if is_bare_name(pattern) {
            builder.add(Glob::new(&format!("{pattern}/**"))?);
            builder.add(Glob::new(&format!("**/{pattern}/**"))?);
            builder.add(Glob::new(&format!("**/{pattern}"))?);
            builder.add(Glob::new(pattern)?);
        } else {
            builder.add(Glob::new(pattern)?);
            builder.add(Glob::new(&format!("{pattern}/**"))?);
        }
    }
    Ok(builder.build()?)
}

fn is_bare_name(pattern: &str) -> bool {
    !pattern
        .chars()
        .any(|ch| matches!(ch, '/' | '*' | '?' | '[' | ']' | '{' | '}'))
}
