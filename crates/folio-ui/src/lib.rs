pub mod chat;
pub mod command;
pub mod console;
pub mod contact;
pub mod cv;
pub mod keys;
pub mod render;
pub mod shell;
pub mod terminal_panel;
pub mod theme;

pub use chat::{ChatPanel, RandomSource, ReplySource, ReplyTicket, SequenceSource};
pub use command::{COMMAND_CATALOG, ConsoleCommand, Resolution, resolve};
pub use console::{PanelState, Sender, Transcript, TranscriptEntry};
pub use contact::{ContactDraft, ContactForm, Field, FieldError, SubmitResult};
pub use cv::{CvDownload, CvOutcome, CvState, Downloader, FileDownloader};
pub use keys::{KeyBindingError, KeyBindings, load_keybindings};
pub use shell::{Focus, PortfolioShell};
pub use terminal_panel::{SubmitOutcome, TerminalPanel};
pub use theme::Palette;

use anyhow::Result;
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use folio_core::ConsoleEvent;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::panic::PanicHookInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// RAII guard that restores the terminal on drop (including panics).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(
            io::stdout(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );
    }
}

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static;

/// Panic hook that runs `restore` before the previous hook. Dropping the
/// guard reinstates the previous hook.
struct TerminalPanicHook {
    previous: Arc<PanicHook>,
}

impl TerminalPanicHook {
    fn install<R>(restore: R) -> Self
    where
        R: Fn() + Send + Sync + 'static,
    {
        let previous: Arc<PanicHook> = Arc::from(std::panic::take_hook());
        let chained = Arc::clone(&previous);
        std::panic::set_hook(Box::new(move |info| {
            restore();
            chained(info);
        }));
        Self { previous }
    }
}

impl Drop for TerminalPanicHook {
    fn drop(&mut self) {
        // The hook cannot be swapped while unwinding.
        if std::thread::panicking() {
            return;
        }
        let previous = Arc::clone(&self.previous);
        drop(std::panic::take_hook());
        std::panic::set_hook(Box::new(move |info| previous(info)));
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

/// Run the full-screen shell until the user quits. `on_event` receives every
/// [`ConsoleEvent`] the shell produces, in order.
pub fn run_portfolio_shell<F>(shell: &mut PortfolioShell, tick: Duration, mut on_event: F) -> Result<()>
where
    F: FnMut(&ConsoleEvent),
{
    // SIGINT sets a flag instead of killing the process, so the guard runs.
    let sigint_flag = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        let flag = Arc::clone(&sigint_flag);
        signal_hook::flag::register(signal_hook::consts::SIGINT, flag)?;
    }

    let _panic_hook = TerminalPanicHook::install(restore_terminal);

    enable_raw_mode()?;
    let guard = TerminalGuard;
    crossterm::execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    info!("shell started");

    let tick = tick.max(Duration::from_millis(10));
    loop {
        if sigint_flag.swap(false, Ordering::Relaxed) {
            shell.request_quit();
        }
        let now = Instant::now();
        shell.tick(now);
        for event in shell.drain_events() {
            on_event(&event);
        }
        if shell.should_quit() {
            break;
        }

        terminal.draw(|frame| render::draw(frame, shell))?;

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                shell.handle_key(key, Instant::now());
            }
            Event::Paste(text) => shell.paste(&text),
            Event::Resize(width, height) => debug!(width, height, "terminal resized"),
            _ => {}
        }
    }

    shell.teardown();
    for event in shell.drain_events() {
        on_event(&event);
    }
    terminal.show_cursor()?;
    drop(guard);
    info!("shell stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    static RESTORES: AtomicUsize = AtomicUsize::new(0);
    static OUTER: AtomicUsize = AtomicUsize::new(0);

    #[test]
    fn panic_hook_is_reinstated_after_shell() {
        std::panic::set_hook(Box::new(|_| {
            OUTER.fetch_add(1, Ordering::SeqCst);
        }));

        let guard = TerminalPanicHook::install(|| {
            RESTORES.fetch_add(1, Ordering::SeqCst);
        });
        assert!(std::panic::catch_unwind(|| panic!("inside shell")).is_err());
        assert_eq!(RESTORES.load(Ordering::SeqCst), 1);
        assert_eq!(OUTER.load(Ordering::SeqCst), 1);

        drop(guard);
        assert!(std::panic::catch_unwind(|| panic!("after shell")).is_err());
        assert_eq!(RESTORES.load(Ordering::SeqCst), 1);
        assert_eq!(OUTER.load(Ordering::SeqCst), 2);

        drop(std::panic::take_hook());
    }
}
