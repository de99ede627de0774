use anyhow::Result;
use folio_core::{AppConfig, ConsoleEvent, Language, PreferenceStore, Translator};
use folio_errors::errors;
use folio_observe::{LogTarget, Observer};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Everything a subcommand needs: workspace, merged config, logging and the
/// active language.
pub(crate) struct AppContext {
    pub workspace: PathBuf,
    pub cfg: AppConfig,
    pub observer: Observer,
    pub json: bool,
    language: Option<Language>,
}

impl AppContext {
    pub fn new(
        workspace: PathBuf,
        json: bool,
        verbose: bool,
        language: Option<&str>,
        interactive: bool,
    ) -> Result<Self> {
        let cfg = AppConfig::load(&workspace)?;
        let mut observer = Observer::new(&workspace)?;
        observer.set_verbose(verbose);
        let target = if interactive {
            LogTarget::FileOnly
        } else {
            LogTarget::FileAndStderr
        };
        observer.init_tracing(&cfg.logging, target)?;

        let language = match language {
            Some(raw) => Some(
                Language::parse(raw).ok_or_else(|| errors::unknown_language(raw).into_error())?,
            ),
            None => None,
        };
        Ok(Self {
            workspace,
            cfg,
            observer,
            json,
            language,
        })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn preferences(&self) -> PreferenceStore {
        PreferenceStore::load(&self.workspace, self.cfg.preferences)
    }

    pub fn language_override(&self) -> Option<Language> {
        self.language
    }

    /// `--lang` wins over the saved preference.
    pub fn language(&self) -> Language {
        self.language
            .unwrap_or_else(|| self.preferences().language())
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.language())
    }

    pub fn record(&self, event: &ConsoleEvent) {
        if let Err(err) = self.observer.record_event(event) {
            warn!(error = %err, "failed to record event");
        }
    }
}
