//! Decorator composition over the host's language service.
//!
//! The plugin overrides exactly three operations: root-file expansion,
//! completions, and completion-entry details. Everything else forwards to
//! the wrapped service through `Deref`, so the wrapper substitutes
//! transparently wherever the inner service type is expected.

use std::cell::{Ref, RefCell};
use std::ops::Deref;

use tsmono_config::ConfigHost;

use crate::completions::{CompletionInfo, FilterOptions, filter_entries};
use crate::host::ProjectHost;
use crate::rewrite::{CompletionDetails, rewrite_completion_details};
use crate::root_files::expand_root_files;
use crate::session::PluginSession;

/// The host operations this plugin post-processes.
pub trait LanguageService {
    fn get_completions_at_position(
        &self,
        file_name: &str,
        position: u32,
    ) -> Option<CompletionInfo>;

    fn get_completion_entry_details(
        &self,
        file_name: &str,
        position: u32,
        entry_name: &str,
    ) -> Option<CompletionDetails>;
}

/// Wrapper owning the session state and the host collaborators.
pub struct MonorepoImportPlugin<S, H, C> {
    service: S,
    host: H,
    config_host: C,
    current_directory: String,
    filter_options: FilterOptions,
    session: RefCell<PluginSession>,
}

impl<S, H, C> MonorepoImportPlugin<S, H, C>
where
    S: LanguageService,
    H: ProjectHost,
    C: ConfigHost,
{
    pub fn new(service: S, host: H, config_host: C) -> Self {
        let current_directory = host.current_directory();
        MonorepoImportPlugin {
            service,
            host,
            config_host,
            current_directory,
            filter_options: FilterOptions::default(),
            session: RefCell::new(PluginSession::new()),
        }
    }

    pub fn with_filter_options(mut self, filter_options: FilterOptions) -> Self {
        self.filter_options = filter_options;
        self
    }

    /// Drop-in replacement for the provider's root-file-name computation:
    /// takes the original result and appends shadow declaration paths,
    /// registering monorepo roots as a side effect.
    pub fn expanded_root_file_names(&self, original: &[String]) -> Vec<String> {
        let mut session = self.session.borrow_mut();
        expand_root_files(&self.host, &self.config_host, &mut session, original)
    }

    /// The wrapped service, for operations this plugin does not override.
    pub fn inner(&self) -> &S {
        &self.service
    }

    pub fn session(&self) -> Ref<'_, PluginSession> {
        self.session.borrow()
    }
}

impl<S, H, C> LanguageService for MonorepoImportPlugin<S, H, C>
where
    S: LanguageService,
    H: ProjectHost,
    C: ConfigHost,
{
    fn get_completions_at_position(
        &self,
        file_name: &str,
        position: u32,
    ) -> Option<CompletionInfo> {
        let mut info = self.service.get_completions_at_position(file_name, position)?;
        let session = self.session.borrow();
        info.entries = filter_entries(
            info.entries,
            &self.current_directory,
            &session,
            self.filter_options,
        );
        Some(info)
    }

    fn get_completion_entry_details(
        &self,
        file_name: &str,
        position: u32,
        entry_name: &str,
    ) -> Option<CompletionDetails> {
        let details = self
            .service
            .get_completion_entry_details(file_name, position, entry_name)?;
        let session = self.session.borrow();
        Some(rewrite_completion_details(details, session.dist_segment()))
    }
}

impl<S, H, C> Deref for MonorepoImportPlugin<S, H, C> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.service
    }
}
