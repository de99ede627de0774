//! Theme and language context with explicit lifecycle.
//!
//! The store is created once at startup (from the persisted file or the
//! configured defaults), handed to every view that needs it, and notifies
//! subscribers whenever a value actually changes.

use crate::{Language, ThemeMode, runtime_dir};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemeMode,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Preferences) + Send>;

pub struct PreferenceStore {
    current: Preferences,
    path: Option<PathBuf>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("current", &self.current)
            .field("path", &self.path)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PreferenceStore {
    /// In-memory store; changes are never written to disk.
    pub fn in_memory(initial: Preferences) -> Self {
        Self {
            current: initial,
            path: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn preferences_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("preferences.json")
    }

    /// Load the persisted preferences, falling back to `defaults` when the
    /// file is missing or unreadable.
    pub fn load(workspace: &Path, defaults: Preferences) -> Self {
        let path = Self::preferences_path(workspace);
        let current = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Preferences>(&raw) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "ignoring corrupt preferences file");
                    defaults
                }
            },
            Err(_) => defaults,
        };
        Self {
            current,
            path: Some(path),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> Preferences {
        self.current
    }

    pub fn theme(&self) -> ThemeMode {
        self.current.theme
    }

    pub fn language(&self) -> Language {
        self.current.language
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Preferences) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn set_theme(&mut self, theme: ThemeMode) -> Result<bool> {
        self.update(Preferences {
            theme,
            ..self.current
        })
    }

    pub fn set_language(&mut self, language: Language) -> Result<bool> {
        self.update(Preferences {
            language,
            ..self.current
        })
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        let next = self.current.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    pub fn toggle_language(&mut self) -> Result<Language> {
        let next = self.current.language.toggled();
        self.set_language(next)?;
        Ok(next)
    }

    /// Returns `Ok(false)` when `next` equals the current value; listeners are
    /// only notified on an actual change.
    pub fn update(&mut self, next: Preferences) -> Result<bool> {
        if next == self.current {
            return Ok(false);
        }
        self.current = next;
        debug!(theme = ?next.theme, language = ?next.language, "preferences changed");
        for (_, listener) in &mut self.listeners {
            listener(&next);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(&self.current)?)?;
        Ok(())
    }
}
