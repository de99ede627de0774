//! Application state behind the full-screen shell.
//!
//! Everything here is driven by [`PortfolioShell::handle_key`] and
//! [`PortfolioShell::tick`], both of which take the current instant so the
//! timed parts can be exercised without a terminal or a real clock.

use crate::chat::{ChatPanel, ReplySource};
use crate::contact::{ContactForm, SubmitResult};
use crate::cv::{CvDownload, CvOutcome, Downloader};
use crate::keys::{KeyBindings, key_matches};
use crate::terminal_panel::{SubmitOutcome, TerminalPanel};
use crate::theme::Palette;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_core::{
    AppConfig, ConsoleEvent, EventKind, Page, PageLine, Portfolio, PreferenceStore,
    ProjectCategory, ThemeConfig, Translator, render_page,
};
use serde_json::json;
use std::time::Instant;
use tracing::{debug, warn};

/// Rows the page must be scrolled before the quick-contact entry appears.
pub const QUICK_CONTACT_SCROLL: u16 = 10;

/// Which component receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    Cli,
    Chat,
    ContactForm,
}

pub struct PortfolioShell {
    page: Page,
    scroll: u16,
    filter: Option<ProjectCategory>,
    portfolio: Portfolio,
    prefs: PreferenceStore,
    theme_cfg: ThemeConfig,
    bindings: KeyBindings,
    pub cli: TerminalPanel,
    pub chat: ChatPanel,
    pub cv: CvDownload,
    pub contact: ContactForm,
    editing_contact: bool,
    quick_contact_open: bool,
    should_quit: bool,
    events: Vec<ConsoleEvent>,
}

impl PortfolioShell {
    pub fn new(
        cfg: &AppConfig,
        mut prefs: PreferenceStore,
        portfolio: Portfolio,
        bindings: KeyBindings,
        downloader: Box<dyn Downloader>,
        replies: Box<dyn ReplySource>,
    ) -> Self {
        prefs.subscribe(|p| {
            debug!(theme = ?p.theme, language = ?p.language, "preferences changed");
        });
        let t = Translator::new(prefs.language());
        Self {
            page: Page::Home,
            scroll: 0,
            filter: None,
            portfolio,
            theme_cfg: cfg.theme.clone(),
            bindings,
            cli: TerminalPanel::new(&t),
            chat: ChatPanel::new(&cfg.chat, &t, replies),
            cv: CvDownload::new(&cfg.cv, downloader),
            contact: ContactForm::new(&cfg.contact),
            prefs,
            editing_contact: false,
            quick_contact_open: false,
            should_quit: false,
            events: Vec::new(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn filter(&self) -> Option<ProjectCategory> {
        self.filter
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.prefs.language())
    }

    pub fn palette(&self) -> Palette {
        Palette::new(&self.theme_cfg, self.prefs.theme())
    }

    pub fn page_lines(&self) -> Vec<PageLine> {
        render_page(self.page, &self.portfolio, &self.translator(), self.filter)
    }

    pub fn is_editing_contact(&self) -> bool {
        self.editing_contact
    }

    pub fn quick_contact_visible(&self) -> bool {
        self.scroll >= QUICK_CONTACT_SCROLL
    }

    pub fn is_quick_contact_open(&self) -> bool {
        self.quick_contact_open
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn drain_events(&mut self) -> Vec<ConsoleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn focus(&self) -> Focus {
        if self.cli.state.is_open() {
            Focus::Cli
        } else if self.chat.state.is_open() {
            Focus::Chat
        } else if self.editing_contact {
            Focus::ContactForm
        } else {
            Focus::Page
        }
    }

    pub fn navigate(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        self.page = page;
        self.scroll = 0;
        self.filter = None;
        self.editing_contact = false;
        self.quick_contact_open = false;
        self.emit(EventKind::PageViewed, json!({ "page": page.path() }));
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key_matches(&self.bindings.exit, &key) {
            self.should_quit = true;
            return;
        }

        let typing = self.focus() != Focus::Page;
        let b = &self.bindings;
        let global = |binding: &KeyEvent| {
            key_matches(binding, &key) && (!typing || !is_text_binding(binding))
        };
        if global(&b.toggle_theme) {
            self.toggle_theme();
            return;
        }
        if global(&b.toggle_language) {
            self.toggle_language();
            return;
        }
        if global(&b.download_cv) {
            self.start_cv_download(now);
            return;
        }

        match self.focus() {
            Focus::Cli => self.handle_cli_key(key),
            Focus::Chat => self.handle_chat_key(key, now),
            Focus::ContactForm => self.handle_contact_key(key, now),
            Focus::Page => self.handle_page_key(key),
        }
    }

    pub fn paste(&mut self, text: &str) {
        let clean: String = text.chars().filter(|ch| !ch.is_control()).collect();
        match self.focus() {
            Focus::Cli => self.cli.state.insert_str(&clean),
            Focus::Chat => self.chat.state.insert_str(&clean),
            Focus::ContactForm => clean.chars().for_each(|ch| self.contact.insert_char(ch)),
            Focus::Page => {}
        }
    }

    /// Advance every timer to `now`.
    pub fn tick(&mut self, now: Instant) {
        for reply in self.chat.poll(now) {
            self.emit(EventKind::ChatReply, json!({ "text": reply }));
        }
        match self.cv.poll(now) {
            Some(CvOutcome::Saved(path)) => {
                self.emit(EventKind::CvDownloaded, json!({ "path": path.display().to_string() }));
            }
            Some(CvOutcome::Failed(error)) => {
                self.emit(EventKind::CvFailed, json!({ "error": error }));
            }
            None => {}
        }
        if let Some(draft) = self.contact.poll(now) {
            self.editing_contact = false;
            self.emit(
                EventKind::ContactSubmitted,
                serde_json::to_value(&draft).unwrap_or_default(),
            );
        }
    }

    /// Cancel pending work before the shell exits.
    pub fn teardown(&mut self) {
        self.chat.teardown();
    }

    pub fn start_cv_download(&mut self, now: Instant) -> bool {
        self.cv.start(now, self.prefs.language())
    }

    fn toggle_theme(&mut self) {
        match self.prefs.toggle_theme() {
            Ok(theme) => self.emit(EventKind::PreferencesChanged, json!({ "theme": theme })),
            Err(err) => warn!(error = %err, "failed to persist theme"),
        }
    }

    fn toggle_language(&mut self) {
        match self.prefs.toggle_language() {
            Ok(language) => {
                self.emit(EventKind::PreferencesChanged, json!({ "language": language }))
            }
            Err(err) => warn!(error = %err, "failed to persist language"),
        }
    }

    fn handle_cli_key(&mut self, key: KeyEvent) {
        if key_matches(&self.bindings.close, &key) {
            self.cli.state.close();
            return;
        }
        if key_matches(&self.bindings.submit, &key) {
            let t = self.translator();
            match self.cli.submit_input(&t) {
                SubmitOutcome::Ignored => {}
                SubmitOutcome::Appended { command, lines } => {
                    self.emit(
                        EventKind::CommandSubmitted,
                        json!({ "command": command, "lines": lines }),
                    );
                }
                SubmitOutcome::Cleared => {
                    self.emit(EventKind::CommandSubmitted, json!({ "command": "clear" }));
                }
                SubmitOutcome::Closed => {
                    self.emit(EventKind::CommandSubmitted, json!({ "command": "exit" }));
                }
            }
            return;
        }
        edit_input(&mut self.cli.state, key);
    }

    fn handle_chat_key(&mut self, key: KeyEvent, now: Instant) {
        if key_matches(&self.bindings.close, &key) || key_matches(&self.bindings.toggle_chat, &key)
        {
            self.chat.close();
            return;
        }
        if key_matches(&self.bindings.submit, &key) {
            let text = self.chat.state.input().to_string();
            if self.chat.send_input(now).is_some() {
                self.emit(EventKind::ChatMessage, json!({ "text": text }));
            }
            return;
        }
        edit_input(&mut self.chat.state, key);
    }

    fn handle_contact_key(&mut self, key: KeyEvent, now: Instant) {
        if key_matches(&self.bindings.close, &key) {
            self.editing_contact = false;
            return;
        }
        if key_matches(&self.bindings.submit, &key) {
            match self.contact.submit(now) {
                SubmitResult::Rejected(errors) => {
                    debug!(count = errors.len(), "contact form rejected");
                }
                SubmitResult::Dropped => self.editing_contact = false,
                SubmitResult::Busy | SubmitResult::Submitting => {}
            }
            return;
        }
        match key.code {
            KeyCode::Tab => self.contact.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.contact.focus_prev(),
            KeyCode::Down => self.contact.focus_next(),
            KeyCode::Backspace => self.contact.backspace(),
            KeyCode::Char(ch) if !has_command_modifier(&key) => self.contact.insert_char(ch),
            _ => {}
        }
    }

    fn handle_page_key(&mut self, key: KeyEvent) {
        let b = &self.bindings;
        if self.quick_contact_open && key_matches(&b.submit, &key) {
            self.quick_contact_open = false;
            self.navigate(Page::Contact);
            self.scroll = 0;
        } else if self.quick_contact_open && key_matches(&b.close, &key) {
            self.quick_contact_open = false;
        } else if self.quick_contact_visible() && key_matches(&b.quick_contact, &key) {
            self.quick_contact_open = !self.quick_contact_open;
        } else if key_matches(&b.open_cli, &key) {
            self.cli.state.open();
        } else if key_matches(&b.toggle_chat, &key) {
            self.chat.toggle();
        } else if key_matches(&b.next_page, &key) {
            self.navigate(self.page.next());
        } else if key_matches(&b.prev_page, &key) {
            self.navigate(self.page.prev());
        } else if self.page == Page::Projects && key_matches(&b.cycle_filter, &key) {
            self.filter = ProjectCategory::cycle(self.filter);
            self.scroll = 0;
        } else if self.page == Page::Contact && key_matches(&b.submit, &key) {
            self.editing_contact = true;
        } else {
            match key.code {
                KeyCode::Char(ch @ '1'..='6') if !has_command_modifier(&key) => {
                    let idx = ch as usize - '1' as usize;
                    self.navigate(Page::ALL[idx]);
                }
                KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
                KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
                KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
                KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
                KeyCode::Home => self.scroll = 0,
                _ => {}
            }
        }
        if !self.quick_contact_visible() {
            self.quick_contact_open = false;
        }
    }

    fn emit(&mut self, kind: EventKind, detail: serde_json::Value) {
        self.events.push(ConsoleEvent::new(kind, detail));
    }
}

fn has_command_modifier(key: &KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn is_text_binding(binding: &KeyEvent) -> bool {
    matches!(binding.code, KeyCode::Char(_)) && !has_command_modifier(binding)
}

fn edit_input(state: &mut crate::console::PanelState, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => state.backspace(),
        KeyCode::Delete => state.delete(),
        KeyCode::Left => state.move_left(),
        KeyCode::Right => state.move_right(),
        KeyCode::Home => state.move_home(),
        KeyCode::End => state.move_end(),
        KeyCode::Char(ch) if !has_command_modifier(&key) => state.insert_char(ch),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::SequenceSource;
    use crate::cv::CvState;
    use anyhow::Result;
    use folio_core::{Language, Preferences, ThemeMode};
    use std::path::PathBuf;
    use std::time::Duration;

    struct NullDownloader;

    impl Downloader for NullDownloader {
        fn save(&mut self, language: Language) -> Result<PathBuf> {
            Ok(PathBuf::from(format!("/tmp/CV-Ali-Hassan-{}.pdf", language.cv_label())))
        }
    }

    fn shell() -> PortfolioShell {
        PortfolioShell::new(
            &AppConfig::default(),
            PreferenceStore::in_memory(Preferences::default()),
            Portfolio::embedded().expect("content"),
            KeyBindings::default(),
            Box::new(NullDownloader),
            Box::new(SequenceSource::new(vec![0])),
        )
    }

    fn press(shell: &mut PortfolioShell, code: KeyCode, now: Instant) {
        shell.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn type_text(shell: &mut PortfolioShell, text: &str, now: Instant) {
        for ch in text.chars() {
            press(shell, KeyCode::Char(ch), now);
        }
    }

    #[test]
    fn tilde_opens_cli_and_commands_run() {
        let mut shell = shell();
        let now = Instant::now();
        press(&mut shell, KeyCode::Char('~'), now);
        assert_eq!(shell.focus(), Focus::Cli);

        type_text(&mut shell, "skills", now);
        press(&mut shell, KeyCode::Enter, now);
        let entries = shell.cli.transcript().entries();
        assert!(entries.iter().any(|e| e.text == "$ skills"));
        let events = shell.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::CommandSubmitted);

        type_text(&mut shell, "exit", now);
        press(&mut shell, KeyCode::Enter, now);
        assert_eq!(shell.focus(), Focus::Page);
    }

    #[test]
    fn typed_tilde_inside_cli_is_input() {
        let mut shell = shell();
        let now = Instant::now();
        press(&mut shell, KeyCode::Char('~'), now);
        press(&mut shell, KeyCode::Char('~'), now);
        assert_eq!(shell.cli.state.input(), "~");
        press(&mut shell, KeyCode::Esc, now);
        assert!(!shell.cli.state.is_open());
    }

    #[test]
    fn chat_reply_lands_after_tick() {
        let mut shell = shell();
        let t0 = Instant::now();
        shell.handle_key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL), t0);
        assert_eq!(shell.focus(), Focus::Chat);
        type_text(&mut shell, "Hallo", t0);
        press(&mut shell, KeyCode::Enter, t0);
        assert_eq!(shell.chat.transcript().len(), 2);

        shell.tick(t0 + Duration::from_millis(1000));
        assert_eq!(shell.chat.transcript().len(), 3);
        let kinds: Vec<_> = shell.drain_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::ChatMessage, EventKind::ChatReply]);
    }

    #[test]
    fn function_keys_toggle_preferences_even_while_typing() {
        let mut shell = shell();
        let now = Instant::now();
        press(&mut shell, KeyCode::Char('~'), now);
        press(&mut shell, KeyCode::F(2), now);
        press(&mut shell, KeyCode::F(3), now);
        assert_eq!(shell.prefs().theme(), ThemeMode::Light);
        assert_eq!(shell.prefs().language(), Language::En);
        assert_eq!(shell.cli.state.input(), "");
    }

    #[test]
    fn cv_download_follows_language() {
        let mut shell = shell();
        let t0 = Instant::now();
        press(&mut shell, KeyCode::F(3), t0);
        press(&mut shell, KeyCode::F(4), t0);
        assert_eq!(shell.cv.state(), CvState::Downloading);
        shell.tick(t0 + Duration::from_secs(1));
        let events = shell.drain_events();
        let saved = events
            .iter()
            .find(|e| e.kind == EventKind::CvDownloaded)
            .expect("download event");
        assert!(saved.detail["path"].as_str().is_some_and(|p| p.ends_with("English.pdf")));
        shell.tick(t0 + Duration::from_secs(4));
        assert_eq!(shell.cv.state(), CvState::Idle);
    }

    #[test]
    fn navigation_resets_scroll_and_filter() {
        let mut shell = shell();
        let now = Instant::now();
        press(&mut shell, KeyCode::Char('2'), now);
        assert_eq!(shell.page(), Page::Projects);
        press(&mut shell, KeyCode::Char('f'), now);
        assert!(shell.filter().is_some());
        press(&mut shell, KeyCode::Down, now);
        assert_eq!(shell.scroll(), 1);

        press(&mut shell, KeyCode::Tab, now);
        assert_eq!(shell.page(), Page::Certificates);
        assert_eq!(shell.scroll(), 0);
        assert!(shell.filter().is_none());
        shell.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), now);
        assert_eq!(shell.page(), Page::Projects);
    }

    #[test]
    fn contact_form_submits_through_keys() {
        let mut shell = shell();
        let t0 = Instant::now();
        press(&mut shell, KeyCode::Char('6'), t0);
        press(&mut shell, KeyCode::Enter, t0);
        assert_eq!(shell.focus(), Focus::ContactForm);

        type_text(&mut shell, "Erika", t0);
        press(&mut shell, KeyCode::Tab, t0);
        type_text(&mut shell, "erika@example.de", t0);
        press(&mut shell, KeyCode::Tab, t0);
        press(&mut shell, KeyCode::Tab, t0);
        press(&mut shell, KeyCode::Tab, t0);
        type_text(&mut shell, "Hallo Ali", t0);
        press(&mut shell, KeyCode::Enter, t0);
        assert!(shell.contact.is_submitting());

        shell.tick(t0 + Duration::from_secs(1));
        assert!(shell.contact.banner_visible());
        assert_eq!(shell.focus(), Focus::Page);
        assert!(
            shell
                .drain_events()
                .iter()
                .any(|e| e.kind == EventKind::ContactSubmitted)
        );
    }

    #[test]
    fn quick_contact_appears_after_scrolling() {
        let mut shell = shell();
        let now = Instant::now();
        press(&mut shell, KeyCode::Char('c'), now);
        assert!(!shell.is_quick_contact_open());

        press(&mut shell, KeyCode::PageDown, now);
        assert!(shell.quick_contact_visible());
        press(&mut shell, KeyCode::Char('c'), now);
        assert!(shell.is_quick_contact_open());

        press(&mut shell, KeyCode::Home, now);
        assert!(!shell.quick_contact_visible());
        assert!(!shell.is_quick_contact_open());

        press(&mut shell, KeyCode::PageDown, now);
        press(&mut shell, KeyCode::Char('c'), now);
        press(&mut shell, KeyCode::Enter, now);
        assert_eq!(shell.page(), Page::Contact);
        assert!(!shell.is_quick_contact_open());
        assert!(!shell.is_editing_contact());
    }

    #[test]
    fn paste_goes_to_focused_input() {
        let mut shell = shell();
        let now = Instant::now();
        shell.paste("ignored");
        press(&mut shell, KeyCode::Char('~'), now);
        shell.paste("about\n");
        assert_eq!(shell.cli.state.input(), "about");
    }

    #[test]
    fn ctrl_c_quits_from_any_focus() {
        let mut shell = shell();
        let now = Instant::now();
        press(&mut shell, KeyCode::Char('~'), now);
        shell.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now);
        assert!(shell.should_quit());
    }
}
