//! The shape shared by the CLI overlay and the chat widget: a toggleable
//! panel with an input buffer and an append-only transcript.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    System,
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// Entries are never edited or removed individually; the only way to shrink
/// the log is [`Transcript::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn with_entries(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::new(sender, text));
    }

    pub fn reset(&mut self, entries: Vec<TranscriptEntry>) {
        self.entries = entries;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PanelState {
    is_open: bool,
    input: String,
    cursor: usize,
    pub transcript: Transcript,
}

impl PanelState {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cursor = self.input.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = byte_index(&self.input, self.cursor);
        self.input.insert(at, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = byte_index(&self.input, self.cursor);
        self.input.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = byte_index(&self.input, self.cursor - 1);
        self.input.remove(at);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = byte_index(&self.input, self.cursor);
            self.input.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Take the buffer contents, leaving it empty.
    pub fn take_input(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }
}

fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
