use crate::command::{Resolution, resolve};
use crate::console::{PanelState, Sender, Transcript, TranscriptEntry};
use folio_core::Translator;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Whitespace-only input; nothing changed.
    Ignored,
    /// Echo, output lines and separator were appended.
    Appended { command: String, lines: usize },
    Cleared,
    Closed,
}

/// The CLI overlay: a [`PanelState`] driven by the command resolver.
#[derive(Debug, Clone)]
pub struct TerminalPanel {
    pub state: PanelState,
}

impl TerminalPanel {
    pub fn new(t: &Translator) -> Self {
        Self {
            state: PanelState::new(Transcript::with_entries(welcome_banner(t))),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn submit_input(&mut self, t: &Translator) -> SubmitOutcome {
        let raw = self.state.input().to_string();
        self.submit(&raw, t)
    }

    pub fn submit(&mut self, raw: &str, t: &Translator) -> SubmitOutcome {
        if raw.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        debug!(command = raw, "cli submit");
        let outcome = match resolve(raw, t) {
            Resolution::Clear => {
                self.state.transcript.reset(vec![
                    TranscriptEntry::new(Sender::System, t.t("cli.terminalCleared")),
                    TranscriptEntry::new(Sender::System, ""),
                ]);
                SubmitOutcome::Cleared
            }
            Resolution::Exit => {
                self.state.close();
                SubmitOutcome::Closed
            }
            Resolution::Lines(lines) => {
                let count = lines.len();
                self.state.transcript.push(Sender::User, format!("$ {raw}"));
                for line in lines {
                    self.state.transcript.push(Sender::System, line);
                }
                self.state.transcript.push(Sender::System, "");
                SubmitOutcome::Appended {
                    command: raw.trim().to_lowercase(),
                    lines: count,
                }
            }
        };
        self.state.clear_input();
        outcome
    }
}

fn welcome_banner(t: &Translator) -> Vec<TranscriptEntry> {
    vec![
        TranscriptEntry::new(Sender::System, t.t("cli.welcome")),
        TranscriptEntry::new(Sender::System, t.t("cli.helpPrompt")),
        TranscriptEntry::new(Sender::System, ""),
    ]
}
