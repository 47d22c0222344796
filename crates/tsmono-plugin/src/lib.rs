//! Monorepo-aware auto-import augmentation for a TypeScript language service.
//!
//! The host's auto-import provider only indexes modules reachable from a
//! dependency package's declared entry file, so internal modules that are
//! never re-exported stay invisible, generated imports point into build
//! output, and manifest-driven suggestions leak in from unrelated workspace
//! packages. This crate fixes all three:
//!
//! - [`expand_root_files`] synthesizes a shadow declaration entry point for
//!   every source file of a dependency package,
//! - [`filter_entries`] drops suggestions from packages that are not true
//!   monorepo dependencies,
//! - [`rewrite_import_text`] strips the build-output segment from generated
//!   import statements.
//!
//! [`MonorepoImportPlugin`] composes the three over an inner language
//! service; all session state lives in an explicitly owned
//! [`PluginSession`].

mod completions;
mod host;
mod plugin;
mod rewrite;
mod root_files;
mod session;

pub use completions::{CompletionEntry, CompletionInfo, FilterOptions, filter_entries};
pub use host::{FsProjectHost, ProjectHost};
pub use plugin::{LanguageService, MonorepoImportPlugin};
pub use rewrite::{
    CodeAction, CompletionDetails, FileTextChanges, TextChange, rewrite_completion_details,
    rewrite_import_text,
};
pub use root_files::{expand_root_files, shadow_declaration_path};
pub use session::{DEFAULT_DIST_SEGMENT, PluginSession, VENDOR_DIR_NAME};
