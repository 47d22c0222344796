//! tsconfig discovery and parsing for monorepo-aware auto-import.
//!
//! This crate answers one question: given an arbitrary directory inside a
//! monorepo, which build configuration owns it, and what are its `outDir`,
//! `rootDir`, `include`, and `exclude` settings? Lookups are memoized in
//! [`ConfigCache`] so each distinct tsconfig.json is read and parsed at most
//! once per session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use serde::Deserialize;

pub mod jsonc;

mod cache;
pub use cache::ConfigCache;

/// File name probed when walking up from a query directory.
pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// Filesystem surface the config loader depends on. Kept minimal so tests
/// can substitute an in-memory tree and count reads.
pub trait ConfigHost {
    fn file_exists(&self, path: &Path) -> bool;
    fn read_file(&self, path: &Path) -> Option<String>;
}

/// [`ConfigHost`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl ConfigHost for OsFs {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_file(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(path).ok()
    }
}

/// Raw tsconfig.json shape, limited to the fields this system consumes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfigFile {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default)]
    pub root_dir: Option<String>,
}

/// Resolved configuration for one package. Immutable once produced;
/// shared between cache keys via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    /// Compiled-output root, joined onto the project directory.
    pub out_dir: Option<PathBuf>,
    /// Source root, joined onto the project directory.
    pub root_dir: Option<PathBuf>,
    /// Raw include globs, relative to the project directory.
    pub include: Option<Vec<String>>,
    /// Raw exclude globs, relative to the project directory.
    pub exclude: Option<Vec<String>>,
}

impl ProjectConfig {
    /// Resolve a parsed tsconfig against the directory that owns it.
    pub fn from_file(file: TsConfigFile, project_dir: &Path) -> Self {
        let options = file.compiler_options.unwrap_or_default();
        ProjectConfig {
            out_dir: options
                .out_dir
                .as_deref()
                .map(|dir| resolve_against(project_dir, dir)),
            root_dir: options
                .root_dir
                .as_deref()
                .map(|dir| resolve_against(project_dir, dir)),
            include: file.include,
            exclude: file.exclude,
        }
    }
}

fn resolve_against(project_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

/// Walk from `directory` toward the filesystem root and return the first
/// tsconfig.json found, mirroring tsserver's config file search.
pub fn find_nearest_config(host: &dyn ConfigHost, directory: &Path) -> Option<PathBuf> {
    let mut current = Some(directory);
    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if host.file_exists(&candidate) {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Parse a single tsconfig source, tolerating JSONC comments and trailing
/// commas. Does not resolve `extends`.
pub fn parse_tsconfig(source: &str) -> Result<TsConfigFile> {
    let normalized = jsonc::strip_trailing_commas(&jsonc::strip_comments(source));
    let config = serde_json::from_str(&normalized).context("failed to parse tsconfig JSON")?;
    Ok(config)
}

/// Load a tsconfig and flatten its `extends` chain, child settings winning
/// over base settings.
pub fn load_tsconfig(host: &dyn ConfigHost, path: &Path) -> Result<TsConfigFile> {
    let mut visited = FxHashSet::default();
    load_tsconfig_inner(host, path, &mut visited)
}

fn load_tsconfig_inner(
    host: &dyn ConfigHost,
    path: &Path,
    visited: &mut FxHashSet<PathBuf>,
) -> Result<TsConfigFile> {
    if !visited.insert(path.to_path_buf()) {
        bail!("tsconfig extends cycle detected at {}", path.display());
    }

    let source = host
        .read_file(path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;
    let mut config = parse_tsconfig(&source)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_tsconfig_inner(host, &base_path, visited)?;
        config = merge_configs(base, config);
    }

    visited.remove(path);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .with_context(|| format!("tsconfig has no parent directory: {}", current_path.display()))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }

    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: TsConfigFile, child: TsConfigFile) -> TsConfigFile {
    let compiler_options = match (base.compiler_options, child.compiler_options) {
        (Some(base_opts), Some(child_opts)) => Some(CompilerOptions {
            out_dir: child_opts.out_dir.or(base_opts.out_dir),
            root_dir: child_opts.root_dir.or(base_opts.root_dir),
        }),
        (base_opts, child_opts) => child_opts.or(base_opts),
    };

    TsConfigFile {
        extends: None,
        compiler_options,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
    }
}
