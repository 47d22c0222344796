//! Per-analysis-session state shared by expansion, filtering, and rewriting.

use std::path::Path;

use rustc_hash::FxHashSet;
use tsmono_config::ConfigCache;

/// Build-output segment stripped from generated imports when no package
/// has declared an `outDir` yet.
pub const DEFAULT_DIST_SEGMENT: &str = "dist";

/// Directory name holding installed third-party packages; paths under it
/// are exempt from all monorepo-specific logic.
pub const VENDOR_DIR_NAME: &str = "node_modules";

/// State owned for the lifetime of one analysis session.
///
/// The config cache and the monorepo root registry are growth-only: a
/// later request never observes a smaller registry than an earlier one.
#[derive(Debug, Default)]
pub struct PluginSession {
    pub config_cache: ConfigCache,
    monorepo_roots: FxHashSet<String>,
    dist_segment: Option<String>,
}

impl PluginSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dependency package's source root. Append-only.
    pub fn add_monorepo_root(&mut self, root: impl Into<String>) {
        let root = root.into();
        if self.monorepo_roots.insert(root.clone()) {
            tracing::debug!(root = %root, "registered monorepo root");
        }
    }

    pub fn monorepo_roots(&self) -> &FxHashSet<String> {
        &self.monorepo_roots
    }

    /// Record a declared `outDir` as the build-output segment candidate.
    /// The first discovery wins for the rest of the session.
    pub fn note_out_dir(&mut self, out_dir: &Path) {
        if self.dist_segment.is_some() {
            return;
        }
        if let Some(name) = out_dir.file_name().and_then(|n| n.to_str()) {
            tracing::debug!(segment = name, "detected build-output segment");
            self.dist_segment = Some(name.to_string());
        }
    }

    /// Segment name stripped from generated import specifiers.
    pub fn dist_segment(&self) -> &str {
        self.dist_segment.as_deref().unwrap_or(DEFAULT_DIST_SEGMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_out_dir_basename_wins() {
        let mut session = PluginSession::new();
        assert_eq!(session.dist_segment(), "dist");

        session.note_out_dir(Path::new("/repo/a/build"));
        session.note_out_dir(Path::new("/repo/b/out"));
        assert_eq!(session.dist_segment(), "build");
    }

    #[test]
    fn roots_accumulate_without_duplicates() {
        let mut session = PluginSession::new();
        session.add_monorepo_root("/repo/a/src");
        session.add_monorepo_root("/repo/a/src");
        session.add_monorepo_root("/repo/b/src");
        assert_eq!(session.monorepo_roots().len(), 2);
    }
}
