//! Memoized directory-to-configuration lookups.
//!
//! The language service asks "which config owns this directory?" once per
//! dependency root file, and many of those directories share one project.
//! The cache keys results under both the query directory and the owning
//! project directory so a config file is parsed at most once per session,
//! with "no config here" cached just like a successful parse.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{ConfigHost, ProjectConfig, find_nearest_config, load_tsconfig};

/// Process-lifetime memo of [`ProjectConfig`] lookups. Never evicts and
/// never re-checks the filesystem; configuration edits need a fresh session.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: FxHashMap<PathBuf, Option<Arc<ProjectConfig>>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the configuration owning `directory`. `None` means the
    /// lookup ran and found no usable config; that outcome is cached too.
    pub fn resolve(
        &mut self,
        host: &dyn ConfigHost,
        directory: &Path,
    ) -> Option<Arc<ProjectConfig>> {
        if let Some(hit) = self.entries.get(directory) {
            return hit.clone();
        }

        let Some(config_path) = find_nearest_config(host, directory) else {
            self.entries.insert(directory.to_path_buf(), None);
            return None;
        };

        // The config file's parent is the project directory; a sibling
        // query may already have resolved it.
        let project_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| directory.to_path_buf());

        if let Some(hit) = self.entries.get(&project_dir) {
            let value = hit.clone();
            self.entries.insert(directory.to_path_buf(), value.clone());
            return value;
        }

        let value = match load_tsconfig(host, &config_path) {
            Ok(file) => Some(Arc::new(ProjectConfig::from_file(file, &project_dir))),
            Err(error) => {
                tracing::debug!(
                    config = %config_path.display(),
                    %error,
                    "tsconfig failed to load; caching absent"
                );
                None
            }
        };

        self.entries.insert(directory.to_path_buf(), value.clone());
        if project_dir != directory {
            self.entries.insert(project_dir, value.clone());
        }
        value
    }

    /// Number of cached directory keys (both query and project keys).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
