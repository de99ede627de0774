//! Floating chat widget with simulated replies.
//!
//! Every message schedules one canned reply a fixed delay later. Scheduled
//! replies are explicit pending tasks: the shell calls [`ChatPanel::poll`]
//! on each tick and due replies are appended to the transcript.

use crate::console::{PanelState, Sender, Transcript, TranscriptEntry};
use folio_core::{ChatConfig, Translator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_REPLIES: &[&str] = &[
    "Vielen Dank für Ihr Interesse! Ali ist hochmotiviert und bereit für eine Ausbildung zum Fachinformatiker.",
    "Ali bringt bereits praktische Erfahrungen mit und ist bereit, diese in einer strukturierten Ausbildung zu vertiefen.",
    "Möchten Sie mehr über Ali's Projekte oder seine Motivation für eine Ausbildung erfahren?",
    "Ali ist flexibel, lernbereit und kann deutschlandweit für eine Ausbildung zur Verfügung stehen.",
    "Seine Zertifizierungen und Projekte zeigen seine Leidenschaft für Technologie und kontinuierliches Lernen.",
];

/// Chooses which canned reply to send.
pub trait ReplySource: Send {
    /// Index in `0..len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplySource for RandomSource {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of indices, wrapping around.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    indices: Vec<usize>,
    pos: usize,
}

impl SequenceSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, pos: 0 }
    }
}

impl ReplySource for SequenceSource {
    fn pick(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let idx = self.indices[self.pos % self.indices.len()];
        self.pos += 1;
        idx % len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

#[derive(Debug, Clone, Copy)]
struct PendingReply {
    ticket: ReplyTicket,
    due: Instant,
}

pub struct ChatPanel {
    pub state: PanelState,
    replies: Vec<String>,
    delay: Duration,
    cancel_on_close: bool,
    pending: Vec<PendingReply>,
    next_ticket: u64,
    source: Box<dyn ReplySource>,
}

impl std::fmt::Debug for ChatPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatPanel")
            .field("state", &self.state)
            .field("replies", &self.replies.len())
            .field("delay", &self.delay)
            .field("pending", &self.pending)
            .finish()
    }
}

impl ChatPanel {
    pub fn new(cfg: &ChatConfig, t: &Translator, source: Box<dyn ReplySource>) -> Self {
        let replies = if cfg.replies.iter().any(|r| !r.trim().is_empty()) {
            cfg.replies
                .iter()
                .filter(|r| !r.trim().is_empty())
                .cloned()
                .collect()
        } else {
            DEFAULT_REPLIES.iter().map(|r| r.to_string()).collect()
        };
        Self {
            state: PanelState::new(Transcript::with_entries(vec![TranscriptEntry::new(
                Sender::Bot,
                t.t("chat.greeting"),
            )])),
            replies,
            delay: Duration::from_millis(cfg.reply_delay_ms),
            cancel_on_close: cfg.cancel_on_close,
            pending: Vec::new(),
            next_ticket: 0,
            source,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.state.transcript
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Send whatever is in the input buffer. The buffer is left untouched
    /// when it holds only whitespace.
    pub fn send_input(&mut self, now: Instant) -> Option<ReplyTicket> {
        if self.state.input().trim().is_empty() {
            return None;
        }
        let text = self.state.take_input();
        self.send(&text, now)
    }

    pub fn send(&mut self, text: &str, now: Instant) -> Option<ReplyTicket> {
        if text.trim().is_empty() {
            return None;
        }
        self.state.transcript.push(Sender::User, text);
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(PendingReply {
            ticket,
            due: now + self.delay,
        });
        debug!(ticket = ticket.0, "chat reply scheduled");
        Some(ticket)
    }

    pub fn cancel(&mut self, ticket: ReplyTicket) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.ticket != ticket);
        before != self.pending.len()
    }

    /// Deliver every reply that is due at `now`, in scheduling order, and
    /// return their texts.
    pub fn poll(&mut self, now: Instant) -> Vec<String> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        let mut delivered = Vec::with_capacity(due.len());
        for _ in due {
            let idx = self.source.pick(self.replies.len());
            let reply = self.replies[idx.min(self.replies.len() - 1)].clone();
            self.state.transcript.push(Sender::Bot, reply.clone());
            delivered.push(reply);
        }
        delivered
    }

    pub fn toggle(&mut self) -> bool {
        if self.state.is_open() {
            self.close();
            false
        } else {
            self.state.open();
            true
        }
    }

    pub fn close(&mut self) {
        self.state.close();
        if self.cancel_on_close {
            self.teardown();
        }
    }

    /// Cancel every pending reply; returns how many were dropped.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            debug!(dropped, "chat replies cancelled");
        }
        dropped
    }
}
