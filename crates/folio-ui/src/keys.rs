use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyBindingError {
    #[error("unsupported keybinding token: {0}")]
    UnsupportedToken(String),
    #[error("missing key code in keybinding '{0}'")]
    MissingKeyCode(String),
    #[error("failed to read keybindings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid keybindings file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub exit: KeyEvent,
    pub open_cli: KeyEvent,
    pub toggle_chat: KeyEvent,
    pub toggle_theme: KeyEvent,
    pub toggle_language: KeyEvent,
    pub download_cv: KeyEvent,
    pub next_page: KeyEvent,
    pub prev_page: KeyEvent,
    pub close: KeyEvent,
    pub submit: KeyEvent,
    pub cycle_filter: KeyEvent,
    pub quick_contact: KeyEvent,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct KeyBindingsFile {
    exit: Option<String>,
    open_cli: Option<String>,
    toggle_chat: Option<String>,
    toggle_theme: Option<String>,
    toggle_language: Option<String>,
    download_cv: Option<String>,
    next_page: Option<String>,
    prev_page: Option<String>,
    close: Option<String>,
    submit: Option<String>,
    cycle_filter: Option<String>,
    quick_contact: Option<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            exit: KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            open_cli: KeyEvent::new(KeyCode::Char('~'), KeyModifiers::NONE),
            toggle_chat: KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL),
            toggle_theme: KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE),
            toggle_language: KeyEvent::new(KeyCode::F(3), KeyModifiers::NONE),
            download_cv: KeyEvent::new(KeyCode::F(4), KeyModifiers::NONE),
            next_page: KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE),
            prev_page: KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            close: KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            submit: KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            cycle_filter: KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE),
            quick_contact: KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE),
        }
    }
}

impl KeyBindings {
    fn apply_overrides(mut self, raw: KeyBindingsFile) -> Result<Self, KeyBindingError> {
        let slots = [
            (raw.exit, &mut self.exit),
            (raw.open_cli, &mut self.open_cli),
            (raw.toggle_chat, &mut self.toggle_chat),
            (raw.toggle_theme, &mut self.toggle_theme),
            (raw.toggle_language, &mut self.toggle_language),
            (raw.download_cv, &mut self.download_cv),
            (raw.next_page, &mut self.next_page),
            (raw.prev_page, &mut self.prev_page),
            (raw.close, &mut self.close),
            (raw.submit, &mut self.submit),
            (raw.cycle_filter, &mut self.cycle_filter),
            (raw.quick_contact, &mut self.quick_contact),
        ];
        for (value, slot) in slots {
            if let Some(value) = value {
                *slot = parse_key_event(&value)?;
            }
        }
        Ok(self)
    }
}

pub fn load_keybindings(path: &Path) -> Result<KeyBindings, KeyBindingError> {
    let raw = fs::read_to_string(path)?;
    let parsed: KeyBindingsFile = serde_json::from_str(&raw)?;
    KeyBindings::default().apply_overrides(parsed)
}

/// Compare a received key against a binding. Character keys ignore SHIFT,
/// since terminals disagree on whether `~` or `A` carry it.
pub fn key_matches(binding: &KeyEvent, event: &KeyEvent) -> bool {
    if binding.code != event.code {
        return false;
    }
    match binding.code {
        KeyCode::Char(_) | KeyCode::BackTab => {
            binding.modifiers.difference(KeyModifiers::SHIFT)
                == event.modifiers.difference(KeyModifiers::SHIFT)
        }
        _ => binding.modifiers == event.modifiers,
    }
}

pub fn parse_key_event(value: &str) -> Result<KeyEvent, KeyBindingError> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_code: Option<KeyCode> = None;
    for token in value
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
    {
        let normalized = token.to_ascii_lowercase();
        match normalized.as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" | "option" => modifiers |= KeyModifiers::ALT,
            other => {
                key_code = Some(
                    parse_key_code(other)
                        .ok_or_else(|| KeyBindingError::UnsupportedToken(token.to_string()))?,
                );
            }
        }
    }
    let code = key_code.ok_or_else(|| KeyBindingError::MissingKeyCode(value.to_string()))?;
    // Terminals report shift+tab as BackTab.
    if code == KeyCode::Tab && modifiers.contains(KeyModifiers::SHIFT) {
        return Ok(KeyEvent::new(KeyCode::BackTab, modifiers));
    }
    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(value: &str) -> Option<KeyCode> {
    match value {
        "enter" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "space" => Some(KeyCode::Char(' ')),
        "tilde" => Some(KeyCode::Char('~')),
        value if value.len() > 1 && value.starts_with('f') => value[1..]
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
        value if value.chars().count() == 1 => value.chars().next().map(KeyCode::Char),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_site_shortcuts() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.open_cli.code, KeyCode::Char('~'));
        assert_eq!(bindings.toggle_chat.modifiers, KeyModifiers::CONTROL);
        assert_eq!(bindings.download_cv.code, KeyCode::F(4));
        assert_eq!(bindings.exit.code, KeyCode::Char('c'));
    }

    #[test]
    fn parses_function_keys_and_modifiers() {
        let event = parse_key_event("ctrl+F5").expect("parse");
        assert_eq!(event.code, KeyCode::F(5));
        assert_eq!(event.modifiers, KeyModifiers::CONTROL);
        assert_eq!(parse_key_event("shift+tab").expect("parse").code, KeyCode::BackTab);
        assert!(matches!(
            parse_key_event("f13"),
            Err(KeyBindingError::UnsupportedToken(_))
        ));
        assert!(matches!(
            parse_key_event("ctrl+"),
            Err(KeyBindingError::MissingKeyCode(_))
        ));
    }

    #[test]
    fn overrides_replace_only_named_bindings() {
        let raw = KeyBindingsFile {
            open_cli: Some("ctrl+k".to_string()),
            ..Default::default()
        };
        let bindings = KeyBindings::default().apply_overrides(raw).expect("apply");
        assert_eq!(bindings.open_cli.code, KeyCode::Char('k'));
        assert_eq!(bindings.open_cli.modifiers, KeyModifiers::CONTROL);
        assert_eq!(bindings.toggle_theme.code, KeyCode::F(2));
    }

    #[test]
    fn load_keybindings_reads_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("keybindings.json");
        fs::write(&path, r#"{"toggle_theme": "f6", "close": "ctrl+q"}"#).expect("write");
        let bindings = load_keybindings(&path).expect("load");
        assert_eq!(bindings.toggle_theme.code, KeyCode::F(6));
        assert_eq!(bindings.close.code, KeyCode::Char('q'));

        fs::write(&path, "{not json").expect("write");
        assert!(matches!(load_keybindings(&path), Err(KeyBindingError::Json(_))));
    }

    #[test]
    fn character_bindings_ignore_shift() {
        let bindings = KeyBindings::default();
        let shifted = KeyEvent::new(KeyCode::Char('~'), KeyModifiers::SHIFT);
        assert!(key_matches(&bindings.open_cli, &shifted));
        let plain_tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert!(key_matches(&bindings.next_page, &plain_tab));
        let ctrl_tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::CONTROL);
        assert!(!key_matches(&bindings.next_page, &ctrl_tab));
        let back_tab = KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE);
        assert!(key_matches(&bindings.prev_page, &back_tab));
    }
}
