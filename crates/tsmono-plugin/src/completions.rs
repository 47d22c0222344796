//! Completion-entry filtering for manifest-driven auto-import suggestions.
//!
//! The host's auto-import step considers every declared dependency of the
//! nearest package manifest. In a monorepo that over-suggests: workspace
//! siblings that are not dependencies of the edited package show up too.
//! Entries are pass-through records; fields this crate does not understand
//! ride along via `#[serde(flatten)]`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::{PluginSession, VENDOR_DIR_NAME};

/// One completion suggestion from the host, with the two fields the
/// filter inspects lifted out and everything else preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub name: String,
    /// Module path the suggestion would import from; absent for
    /// non-auto-import entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// True when the host resolved this suggestion purely from package
    /// manifest dependency declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_package_json_import: Option<bool>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Completion response wrapper; only `entries` is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInfo {
    pub entries: Vec<CompletionEntry>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions {
    /// Stricter variant: after an entry with a given `source` is emitted,
    /// later entries sharing that exact `source` are dropped.
    pub dedupe_by_source: bool,
}

/// Drop manifest-driven suggestions whose source module is neither inside
/// the current package, nor vendored, nor under a tracked monorepo root.
/// Relative order of kept entries is preserved.
pub fn filter_entries(
    entries: Vec<CompletionEntry>,
    current_project_dir: &str,
    session: &PluginSession,
    options: FilterOptions,
) -> Vec<CompletionEntry> {
    let mut seen_sources: FxHashSet<String> = FxHashSet::default();
    let before = entries.len();

    let kept: Vec<CompletionEntry> = entries
        .into_iter()
        .filter(|entry| {
            if !should_keep(entry, current_project_dir, session) {
                return false;
            }
            if options.dedupe_by_source {
                if let Some(source) = &entry.source {
                    return seen_sources.insert(source.clone());
                }
            }
            true
        })
        .collect();

    if kept.len() != before {
        tracing::trace!(before, after = kept.len(), "filtered completion entries");
    }
    kept
}

fn should_keep(entry: &CompletionEntry, current_project_dir: &str, session: &PluginSession) -> bool {
    let Some(source) = entry.source.as_deref() else {
        return true;
    };
    // Only manifest-driven suggestions are suspect; absent or false means
    // the host got here from an already-open file.
    if entry.is_package_json_import != Some(true) {
        return true;
    }
    is_valid_import(source, current_project_dir, session)
}

fn is_valid_import(source: &str, current_project_dir: &str, session: &PluginSession) -> bool {
    if source.contains(VENDOR_DIR_NAME) {
        return true;
    }
    if source.starts_with(current_project_dir) {
        return true;
    }
    session
        .monorepo_roots()
        .iter()
        .any(|root| source.starts_with(root.as_str()))
}
