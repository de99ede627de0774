use crate::console::{Sender, Transcript};
use crate::contact::Field;
use crate::shell::PortfolioShell;
use crate::theme::Palette;
use chrono::{Datelike, Local};
use folio_core::{Page, PageLine, PageLineKind, Translator};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

const PROMPT: &str = "ali@ausbildung-portfolio:~$";

pub fn draw(frame: &mut Frame, shell: &PortfolioShell) {
    let area = frame.area();
    if area.width < 20 || area.height < 8 {
        return;
    }
    let palette = shell.palette();
    let t = shell.translator();
    frame.render_widget(Block::default().style(palette.base()), area);

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(area);

    draw_header(frame, header, shell, &palette, &t);
    if shell.page() == Page::Contact {
        let [info, form] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
        draw_page(frame, info, shell, &palette);
        draw_contact_form(frame, form, shell, &palette, &t);
    } else {
        draw_page(frame, body, shell, &palette);
    }
    draw_footer(frame, footer, shell, &palette, &t);
    if shell.quick_contact_visible() && shell.focus() == crate::shell::Focus::Page {
        draw_quick_contact(frame, body, shell, &palette, &t);
    }

    if shell.chat.state.is_open() {
        draw_chat(frame, chat_area(area), shell, &palette, &t);
    }
    if shell.cli.state.is_open() {
        draw_cli(frame, centered(area, 80, 70), shell, &palette, &t);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, shell: &PortfolioShell, palette: &Palette, t: &Translator) {
    let titles: Vec<Line> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!("{} {}", i + 1, t.t(page.nav_key()))))
        .collect();
    let theme_key = match shell.prefs().theme() {
        folio_core::ThemeMode::Light => "theme.light",
        folio_core::ThemeMode::Dark => "theme.dark",
    };
    let status = format!(
        " {} · {} ",
        shell.prefs().language().code().to_uppercase(),
        t.t(theme_key)
    );
    let tabs = Tabs::new(titles)
        .select(shell.page().index())
        .style(palette.dim())
        .highlight_style(palette.title())
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .title(Span::styled(" Ali Hassan ", palette.title()))
                .title_bottom(Line::from(Span::styled(status, palette.accent())).right_aligned()),
        );
    frame.render_widget(tabs, area);
}

fn styled_line(line: &PageLine, palette: &Palette) -> Line<'static> {
    let style = match line.kind {
        PageLineKind::Title => palette.title().add_modifier(Modifier::UNDERLINED),
        PageLineKind::Heading => Style::default()
            .fg(palette.secondary)
            .add_modifier(Modifier::BOLD),
        PageLineKind::Body => Style::default().fg(palette.text),
        PageLineKind::Item => palette.dim(),
        PageLineKind::Link => Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::UNDERLINED),
        PageLineKind::Blank => Style::default(),
    };
    Line::from(Span::styled(line.text.clone(), style))
}

fn draw_page(frame: &mut Frame, area: Rect, shell: &PortfolioShell, palette: &Palette) {
    let lines: Vec<Line> = shell
        .page_lines()
        .iter()
        .map(|line| styled_line(line, palette))
        .collect();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((shell.scroll(), 0))
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(paragraph, inset(area, 2, 1));
}

fn draw_contact_form(
    frame: &mut Frame,
    area: Rect,
    shell: &PortfolioShell,
    palette: &Palette,
    t: &Translator,
) {
    let form = &shell.contact;
    let editing = shell.is_editing_contact();
    let mut lines = Vec::new();
    for field in Field::ALL {
        let marker = if editing && form.focus() == field { "› " } else { "  " };
        let required = if field.is_required() { " *" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(marker, palette.accent()),
            Span::styled(format!("{}{required}", t.t(field.label_key())), palette.dim()),
        ]));
        let value = form.draft.value(field);
        let value_style = if editing && form.focus() == field {
            Style::default().fg(palette.text).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        lines.push(Line::from(Span::styled(format!("  {value}"), value_style)));
        if let Some(error) = form.error_for(field) {
            lines.push(Line::from(Span::styled(
                format!("  {}", t.t(error.key)),
                Style::default().fg(palette.error),
            )));
        }
    }
    lines.push(Line::default());
    let status = if form.is_submitting() {
        Span::styled(t.t("contact.sending"), palette.accent())
    } else if form.banner_visible() {
        Span::styled(t.t("contact.success"), Style::default().fg(palette.success))
    } else {
        Span::styled(t.t("contact.formHint"), palette.dim())
    };
    lines.push(Line::from(status));

    let border = if editing { palette.title() } else { palette.dim() };
    let block = Block::bordered()
        .border_style(border)
        .title(Span::styled(format!(" {} ", t.t("contact.send")), palette.title()));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, shell: &PortfolioShell, palette: &Palette, t: &Translator) {
    let profile = &shell.portfolio().profile;
    let cv_state = shell.cv.state();
    let cv_style = match cv_state {
        crate::cv::CvState::Success => Style::default().fg(palette.success),
        crate::cv::CvState::Error => Style::default().fg(palette.error),
        _ => palette.accent(),
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("[F4] ", palette.dim()),
            Span::styled(t.t(cv_state.label_key()), cv_style),
            Span::styled("   ", palette.dim()),
            Span::styled(t.t("cli.tipMessage"), palette.dim()),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "© {} Ali Hassan. {}.",
                    Local::now().year(),
                    t.t("footer.allRightsReserved")
                ),
                palette.dim(),
            ),
            Span::styled(format!("   {}: ", t.t("footer.connect")), palette.dim()),
            Span::styled(short_url(&profile.github), palette.accent()),
            Span::styled(" · ", palette.dim()),
            Span::styled(short_url(&profile.linkedin), palette.accent()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inset(area, 1, 0));
}

/// Bottom-left badge; expands to e-mail, phone and a jump to the contact page.
fn draw_quick_contact(
    frame: &mut Frame,
    body: Rect,
    shell: &PortfolioShell,
    palette: &Palette,
    t: &Translator,
) {
    let key = shell.bindings().quick_contact;
    let title = format!(" [{}] {} ", key_label(&key), t.t("contact.quickContact"));
    if !shell.is_quick_contact_open() {
        let width = (title.chars().count() as u16).min(body.width);
        let badge = Rect {
            x: body.x,
            y: body.y + body.height.saturating_sub(1),
            width,
            height: body.height.min(1),
        };
        frame.render_widget(Clear, badge);
        frame.render_widget(Paragraph::new(Span::styled(title, palette.title())), badge);
        return;
    }

    let profile = &shell.portfolio().profile;
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("✉ {}  ", t.t("contact.email")), palette.dim()),
            Span::styled(profile.email.clone(), palette.accent()),
        ]),
        Line::from(vec![
            Span::styled(format!("☎ {}  ", t.t("contact.call")), palette.dim()),
            Span::styled(profile.phone.clone(), palette.accent()),
        ]),
        Line::from(Span::styled(
            format!("↵ {}", t.t("contact.openForm")),
            Style::default().fg(palette.success),
        )),
    ];
    let height = body.height.min(5);
    let area = Rect {
        x: body.x,
        y: body.y + body.height - height,
        width: body.width.min(44),
        height,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .border_style(palette.title())
                .style(palette.base())
                .title(Span::styled(title, palette.title())),
        ),
        area,
    );
}

fn key_label(key: &crossterm::event::KeyEvent) -> String {
    use crossterm::event::KeyCode;
    match key.code {
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

fn short_url(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .to_string()
}

fn transcript_lines(transcript: &Transcript, palette: &Palette) -> Vec<Line<'static>> {
    transcript
        .entries()
        .iter()
        .map(|entry| {
            let style = match entry.sender {
                Sender::User => Style::default().fg(palette.success),
                Sender::Bot => Style::default().fg(palette.primary),
                Sender::System => Style::default().fg(palette.text),
            };
            Line::from(Span::styled(entry.text.clone(), style))
        })
        .collect()
}

/// Rows to skip so the tail of a wrapped transcript stays visible.
fn tail_scroll(lines: &[Line], width: u16, height: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    rows.saturating_sub(height as usize).min(u16::MAX as usize) as u16
}

fn draw_cli(frame: &mut Frame, area: Rect, shell: &PortfolioShell, palette: &Palette, t: &Translator) {
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .border_style(Style::default().fg(palette.success))
        .style(palette.base())
        .title(Span::styled(format!(" {PROMPT} "), palette.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [log, input, tip] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let lines = transcript_lines(shell.cli.transcript(), palette);
    let scroll = tail_scroll(&lines, log.width, log.height);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        log,
    );

    let state = &shell.cli.state;
    let (visible, col) = input_window(state.input(), state.cursor(), input.width.saturating_sub(2));
    let input_line = if state.input().is_empty() {
        Line::from(vec![
            Span::styled("$ ", Style::default().fg(palette.success)),
            Span::styled(t.t("cli.placeholder"), palette.dim()),
        ])
    } else {
        Line::from(vec![
            Span::styled("$ ", Style::default().fg(palette.success)),
            Span::raw(visible),
        ])
    };
    frame.render_widget(Paragraph::new(input_line), input);
    frame.set_cursor_position((input.x.saturating_add(2).saturating_add(col), input.y));
    frame.render_widget(
        Paragraph::new(Span::styled(t.t("cli.tipMessage"), palette.dim())),
        tip,
    );
}

fn draw_chat(frame: &mut Frame, area: Rect, shell: &PortfolioShell, palette: &Palette, t: &Translator) {
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .border_style(palette.title())
        .style(palette.base())
        .title(Span::styled(format!(" {} ", t.t("chat.title")), palette.title()))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", t.t("chat.subtitle")),
            palette.dim(),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [log, input, notice] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let lines: Vec<Line> = transcript_lines(shell.chat.transcript(), palette)
        .into_iter()
        .flat_map(|line| [line, Line::default()])
        .collect();
    let scroll = tail_scroll(&lines, log.width, log.height);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        log,
    );

    let state = &shell.chat.state;
    let (visible, col) = input_window(state.input(), state.cursor(), input.width);
    let input_line = if state.input().is_empty() {
        Line::from(Span::styled(t.t("chat.placeholder"), palette.dim()))
    } else {
        Line::from(visible)
    };
    frame.render_widget(Paragraph::new(input_line), input);
    if !shell.cli.state.is_open() {
        frame.set_cursor_position((input.x.saturating_add(col), input.y));
    }
    frame.render_widget(
        Paragraph::new(Span::styled(t.t("chat.demoMode"), palette.dim())),
        notice,
    );
}

/// Slice of `input` that fits in `width` columns with the cursor inside it,
/// plus the cursor column relative to the slice.
fn input_window(input: &str, cursor: usize, width: u16) -> (String, u16) {
    let width = usize::from(width.max(1));
    let start = (cursor + 1).saturating_sub(width);
    let visible: String = input.chars().skip(start).take(width).collect();
    let col = (cursor - start).min(width - 1);
    (visible, u16::try_from(col).unwrap_or(u16::MAX))
}

fn inset(area: Rect, x: u16, y: u16) -> Rect {
    Rect {
        x: area.x + x.min(area.width / 2),
        y: area.y + y.min(area.height / 2),
        width: area.width.saturating_sub(x * 2),
        height: area.height.saturating_sub(y * 2),
    }
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Bottom-right corner, like the floating widget it stands in for.
fn chat_area(area: Rect) -> Rect {
    let width = (area.width / 2).clamp(20, 60).min(area.width);
    let height = (area.height * 2 / 3).clamp(8, 24).min(area.height);
    Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - height,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::SequenceSource;
    use crate::cv::Downloader;
    use crate::keys::KeyBindings;
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use folio_core::{AppConfig, Language, Portfolio, PreferenceStore, Preferences};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;
    use std::time::Instant;

    struct NoDownload;

    impl Downloader for NoDownload {
        fn save(&mut self, _language: Language) -> Result<PathBuf> {
            bail!("offline")
        }
    }

    fn shell() -> PortfolioShell {
        PortfolioShell::new(
            &AppConfig::default(),
            PreferenceStore::in_memory(Preferences::default()),
            Portfolio::embedded().expect("content"),
            KeyBindings::default(),
            Box::new(NoDownload),
            Box::new(SequenceSource::new(vec![0])),
        )
    }

    fn screen(shell: &PortfolioShell) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).expect("terminal");
        terminal.draw(|frame| draw(frame, shell)).expect("draw");
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn home_page_renders_navigation_and_footer() {
        let out = screen(&shell());
        assert!(out.contains("1 Start"));
        assert!(out.contains("6 Kontakt"));
        assert!(out.contains("Ali Hassan"));
        assert!(out.contains("Lebenslauf herunterladen"));
        assert!(out.contains("Vernetzen: github.com/ElSalvatore-sys"));
    }

    #[test]
    fn cli_overlay_shows_prompt_and_banner() {
        let mut shell = shell();
        shell.cli.state.open();
        let out = screen(&shell);
        assert!(out.contains(PROMPT));
        assert!(out.contains("Willkommen"));
        assert!(out.contains("Befehl eingeben..."));
    }

    #[test]
    fn chat_overlay_shows_greeting() {
        let mut shell = shell();
        shell.chat.state.open();
        shell.chat.send("Hallo", Instant::now());
        let out = screen(&shell);
        assert!(out.contains("Portfolio-Assistent"));
        assert!(out.contains("Hallo"));
    }

    #[test]
    fn contact_page_renders_form() {
        let mut shell = shell();
        shell.navigate(Page::Contact);
        let out = screen(&shell);
        assert!(out.contains("Name *"));
        assert!(out.contains("Unternehmen"));
    }

    #[test]
    fn quick_contact_expands_after_scroll() {
        let mut shell = shell();
        let now = Instant::now();
        assert!(!screen(&shell).contains("Schnellkontakt"));

        shell.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE), now);
        let out = screen(&shell);
        assert!(out.contains("[c] Schnellkontakt"));
        assert!(!out.contains("Zum Kontaktformular"));

        shell.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE), now);
        let out = screen(&shell);
        assert!(out.contains("Anrufen"));
        assert!(out.contains("Zum Kontaktformular"));
    }

    #[test]
    fn tiny_terminal_draws_nothing() {
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).expect("terminal");
        let shell = shell();
        terminal.draw(|frame| draw(frame, &shell)).expect("draw");
    }

    #[test]
    fn long_paste_keeps_cursor_inside_input() {
        let mut shell = shell();
        shell.cli.state.open();
        shell.paste(&"a".repeat(65_530));
        let out = screen(&shell);
        assert!(out.contains("$ aaaa"));

        shell.cli.state.close();
        shell.chat.state.open();
        shell.paste(&"b".repeat(70_000));
        let out = screen(&shell);
        assert!(out.contains("bbbb"));
    }

    #[test]
    fn input_window_scrolls_with_cursor() {
        assert_eq!(input_window("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(input_window("abcdefgh", 8, 4), ("fgh".to_string(), 3));
        assert_eq!(input_window("abcdefgh", 2, 4), ("abcd".to_string(), 2));
        assert_eq!(input_window("äöü", 3, 2), ("ü".to_string(), 1));
    }

    #[test]
    fn tail_scroll_keeps_last_rows_visible() {
        let lines: Vec<Line> = (0..10).map(|i| Line::from(format!("line {i}"))).collect();
        assert_eq!(tail_scroll(&lines, 40, 4), 6);
        assert_eq!(tail_scroll(&lines, 40, 20), 0);
    }
}
