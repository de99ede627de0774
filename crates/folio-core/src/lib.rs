use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod content;
pub mod i18n;
pub mod prefs;
pub mod seo;

pub use content::{ContentError, PageLine, PageLineKind, Portfolio, ProjectCategory, render_page};
pub use i18n::Translator;
pub use prefs::{PreferenceStore, Preferences, SubscriptionId};
pub use seo::{SeoMetadata, SiteConfig};

pub fn runtime_dir(workspace: &Path) -> PathBuf {
    workspace.join(".folio")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from)
}

/// Expand a leading `~/` against the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

// ── Context values ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "de" | "deutsch" | "german" => Some(Self::De),
            "en" | "english" | "englisch" => Some(Self::En),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Label used in the suggested CV filename.
    pub fn cv_label(self) -> &'static str {
        match self {
            Self::De => "Deutsch",
            Self::En => "English",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::De => Self::En,
            Self::En => Self::De,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" | "hell" => Some(Self::Light),
            "dark" | "dunkel" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// ── Routes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    Projects,
    Certificates,
    Skills,
    About,
    Contact,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Projects,
        Page::Certificates,
        Page::Skills,
        Page::About,
        Page::Contact,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Projects => "/projects",
            Self::Certificates => "/certificates",
            Self::Skills => "/skills",
            Self::About => "/about",
            Self::Contact => "/contact",
        }
    }

    /// Translation key of the navigation label.
    pub fn nav_key(self) -> &'static str {
        match self {
            Self::Home => "nav.home",
            Self::Projects => "nav.projects",
            Self::Certificates => "nav.certificates",
            Self::Skills => "nav.skills",
            Self::About => "nav.about",
            Self::Contact => "nav.contact",
        }
    }

    /// Accepts either a route path (`/projects`) or a bare name (`projects`).
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim().to_ascii_lowercase();
        let name = trimmed.trim_matches('/');
        match name {
            "" | "home" => Some(Self::Home),
            "projects" => Some(Self::Projects),
            "certificates" => Some(Self::Certificates),
            "skills" => Some(Self::Skills),
            "about" => Some(Self::About),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageViewed,
    CommandSubmitted,
    ChatMessage,
    ChatReply,
    CvDownloaded,
    CvFailed,
    ContactSubmitted,
    PreferencesChanged,
}

/// A single user-visible action, recorded by the observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleEvent {
    pub at: DateTime<Utc>,
    pub kind: EventKind,
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ConsoleEvent {
    pub fn new(kind: EventKind, detail: serde_json::Value) -> Self {
        Self {
            at: Utc::now(),
            kind,
            detail,
        }
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub theme: ThemeConfig,
    pub chat: ChatConfig,
    pub cv: CvConfig,
    pub contact: ContactConfig,
    pub site: SiteConfig,
    pub preferences: Preferences,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event-loop tick in milliseconds; timers resolve at this granularity.
    pub tick_ms: u64,
    pub keybindings_path: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            keybindings_path: "~/.folio/keybindings.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary: String,
    pub secondary: String,
    pub error: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "Cyan".to_string(),
            secondary: "Yellow".to_string(),
            error: "Red".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub reply_delay_ms: u64,
    /// Drop replies that are still pending when the chat panel is closed.
    pub cancel_on_close: bool,
    /// Overrides the built-in canned replies when non-empty.
    pub replies: Vec<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            cancel_on_close: false,
            replies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CvConfig {
    /// Static asset that gets "downloaded"; relative paths resolve against the workspace.
    pub asset_path: String,
    /// Target directory; empty means `~/Downloads` when it exists, else the workspace.
    pub download_dir: String,
    pub file_stem: String,
    pub prepare_delay_ms: u64,
    pub reset_delay_ms: u64,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            asset_path: "public/cv-ali-hassan.pdf".to_string(),
            download_dir: String::new(),
            file_stem: "CV-Ali-Hassan".to_string(),
            prepare_delay_ms: 1000,
            reset_delay_ms: 3000,
        }
    }
}

impl CvConfig {
    pub fn resolve_asset_path(&self, workspace: &Path) -> PathBuf {
        let path = expand_home(&self.asset_path);
        if path.is_absolute() {
            path
        } else {
            workspace.join(path)
        }
    }

    pub fn resolve_download_dir(&self, workspace: &Path) -> PathBuf {
        if !self.download_dir.trim().is_empty() {
            let dir = expand_home(self.download_dir.trim());
            return if dir.is_absolute() {
                dir
            } else {
                workspace.join(dir)
            };
        }
        home_dir()
            .map(|home| home.join("Downloads"))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| workspace.to_path_buf())
    }

    pub fn file_name(&self, language: Language) -> String {
        format!("{}-{}.pdf", self.file_stem, language.cv_label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub submit_delay_ms: u64,
    pub banner_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1000,
            banner_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `FOLIO_LOG` takes precedence.
    pub filter: String,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "folio=info".to_string(),
            file_name: "folio.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn user_settings_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".folio/settings.json"))
    }

    pub fn project_settings_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("settings.json")
    }

    pub fn project_local_settings_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("settings.local.json")
    }

    pub fn legacy_toml_path(workspace: &Path) -> PathBuf {
        runtime_dir(workspace).join("config.toml")
    }

    pub fn load(workspace: &Path) -> Result<Self> {
        Self::load_with_user_settings(workspace, Self::user_settings_path().as_deref())
    }

    /// Same layering as [`AppConfig::load`] with an explicit user settings file.
    pub fn load_with_user_settings(workspace: &Path, user_settings: Option<&Path>) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;

        let legacy = Self::legacy_toml_path(workspace);
        if legacy.exists() {
            let raw = fs::read_to_string(legacy)?;
            let legacy_cfg: AppConfig = toml::from_str(&raw)?;
            merge_json_value(&mut merged, &serde_json::to_value(legacy_cfg)?);
        }

        let mut paths = Vec::new();
        if let Some(user) = user_settings {
            paths.push(user.to_path_buf());
        }
        paths.push(Self::project_settings_path(workspace));
        paths.push(Self::project_local_settings_path(workspace));

        for path in paths {
            if !path.exists() {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid configuration in {}: {e}", path.display()))?;
            merge_json_value(&mut merged, &value);
        }

        Ok(serde_json::from_value(merged)?)
    }
}

fn merge_json_value(base: &mut serde_json::Value, overlay: &serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(overlay_obj)) => {
            for (key, overlay_value) in overlay_obj {
                if let Some(base_value) = base_obj.get_mut(key) {
                    merge_json_value(base_value, overlay_value);
                } else {
                    base_obj.insert(key.clone(), overlay_value.clone());
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn load_isolated(workspace: &Path) -> Result<AppConfig> {
        AppConfig::load_with_user_settings(workspace, None)
    }

    #[test]
    fn load_without_settings_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_isolated(dir.path()).expect("load");
        assert_eq!(cfg.chat.reply_delay_ms, 1000);
        assert_eq!(cfg.cv.prepare_delay_ms, 1000);
        assert_eq!(cfg.cv.reset_delay_ms, 3000);
        assert_eq!(cfg.contact.banner_ms, 5000);
        assert!(!cfg.chat.cancel_on_close);
    }

    #[test]
    fn local_settings_override_project_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rt = runtime_dir(dir.path());
        fs::create_dir_all(&rt).expect("runtime dir");
        fs::write(
            rt.join("settings.json"),
            r#"{"chat":{"reply_delay_ms":250},"cv":{"file_stem":"CV-Test"}}"#,
        )
        .expect("project settings");
        fs::write(
            rt.join("settings.local.json"),
            r#"{"chat":{"reply_delay_ms":10}}"#,
        )
        .expect("local settings");

        let cfg = load_isolated(dir.path()).expect("load");
        assert_eq!(cfg.chat.reply_delay_ms, 10);
        assert_eq!(cfg.cv.file_stem, "CV-Test");
        // untouched keys keep their defaults
        assert_eq!(cfg.cv.prepare_delay_ms, 1000);
    }

    #[test]
    fn user_settings_sit_below_project_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let user = dir.path().join("home-settings.json");
        fs::write(
            &user,
            r#"{"chat":{"reply_delay_ms":700},"contact":{"banner_ms":900}}"#,
        )
        .expect("user settings");
        let rt = runtime_dir(dir.path());
        fs::create_dir_all(&rt).expect("runtime dir");
        fs::write(rt.join("settings.json"), r#"{"chat":{"reply_delay_ms":300}}"#)
            .expect("project settings");

        let cfg = AppConfig::load_with_user_settings(dir.path(), Some(&user)).expect("load");
        assert_eq!(cfg.chat.reply_delay_ms, 300);
        assert_eq!(cfg.contact.banner_ms, 900);
    }

    #[test]
    fn legacy_toml_is_merged_before_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rt = runtime_dir(dir.path());
        fs::create_dir_all(&rt).expect("runtime dir");
        fs::write(
            rt.join("config.toml"),
            "[preferences]\nlanguage = \"en\"\ntheme = \"light\"\n",
        )
        .expect("legacy config");
        let cfg = load_isolated(dir.path()).expect("load");
        assert_eq!(cfg.preferences.language, Language::En);
        assert_eq!(cfg.preferences.theme, ThemeMode::Light);
    }

    #[test]
    fn malformed_settings_report_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let rt = runtime_dir(dir.path());
        fs::create_dir_all(&rt).expect("runtime dir");
        fs::write(rt.join("settings.json"), "{ not json").expect("settings");
        let err = load_isolated(dir.path()).expect_err("should fail");
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn cv_file_name_follows_language() {
        let cv = CvConfig::default();
        assert_eq!(cv.file_name(Language::De), "CV-Ali-Hassan-Deutsch.pdf");
        assert_eq!(cv.file_name(Language::En), "CV-Ali-Hassan-English.pdf");
    }

    #[test]
    fn relative_cv_paths_resolve_against_workspace() {
        let cv = CvConfig {
            download_dir: "out".to_string(),
            ..CvConfig::default()
        };
        let ws = Path::new("/srv/site");
        assert_eq!(
            cv.resolve_asset_path(ws),
            PathBuf::from("/srv/site/public/cv-ali-hassan.pdf")
        );
        assert_eq!(cv.resolve_download_dir(ws), PathBuf::from("/srv/site/out"));
    }

    #[test]
    fn page_navigation_wraps() {
        assert_eq!(Page::Contact.next(), Page::Home);
        assert_eq!(Page::Home.prev(), Page::Contact);
        assert_eq!(Page::parse("/certificates"), Some(Page::Certificates));
        assert_eq!(Page::parse("Skills"), Some(Page::Skills));
        assert_eq!(Page::parse("/"), Some(Page::Home));
        assert_eq!(Page::parse("/blog"), None);
    }

    #[test]
    fn language_and_theme_toggle() {
        assert_eq!(Language::De.toggled(), Language::En);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(Language::parse("English"), Some(Language::En));
        assert_eq!(ThemeMode::parse("dunkel"), Some(ThemeMode::Dark));
    }

    #[test]
    fn merge_json_value_replaces_scalars_and_recurses_objects() {
        let mut base = json!({"a": {"b": 1, "c": 2}, "d": [1, 2]});
        merge_json_value(&mut base, &json!({"a": {"b": 5}, "d": [3]}));
        assert_eq!(base, json!({"a": {"b": 5, "c": 2}, "d": [3]}));
    }

    proptest! {
        #[test]
        fn merge_json_value_is_idempotent_for_flat_objects(
            base in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12),
            overlay in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12),
        ) {
            let mut base_value = json!(base);
            let overlay_value = json!(overlay);
            merge_json_value(&mut base_value, &overlay_value);
            let once = base_value.clone();
            merge_json_value(&mut base_value, &overlay_value);
            prop_assert_eq!(base_value, once);
        }
    }
}
