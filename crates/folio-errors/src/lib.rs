//! User-facing error rendering for the folio binary.
//!
//! Failures travel as `anyhow::Error`; at the edge they are turned into an
//! [`EnhancedError`] with a category and recovery suggestions.

use anyhow::Error;
use folio_core::ContentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// A failure rendered for the user: category, message and what to try next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedError {
    pub title: String,
    pub message: String,
    pub suggestions: Vec<String>,
    pub error_type: ErrorType,
    pub context: Option<String>,
}

/// Broad category, shown as the prefix of the rendered message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorType {
    /// Settings or key-binding files that do not parse.
    Configuration,
    /// Embedded portfolio content that does not load.
    Content,
    /// Missing assets, unwritable download directories.
    Filesystem,
    /// User input rejected by validation (contact form, page names).
    Validation,
    /// Terminal setup or rendering failures.
    Terminal,
    /// Anything the classifier cannot place.
    Unknown,
}

impl EnhancedError {
    /// Create an error with no suggestions or context.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        error_type: ErrorType,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            suggestions: Vec::new(),
            error_type,
            context: None,
        }
    }

    /// Add a recovery suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add several recovery suggestions, in order.
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions.extend(suggestions);
        self
    }

    /// Attach the underlying error chain; shown in verbose mode.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Wrap as `anyhow::Error` so it can travel through `?`.
    pub fn into_error(self) -> Error {
        Error::new(self)
    }

    /// Render for stderr, with numbered suggestions.
    pub fn format(&self, verbose: bool) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}: {}\n", self.error_type.label(), self.title));
        output.push_str(&format!("  {}\n", self.message));

        if verbose && let Some(context) = &self.context {
            output.push_str(&format!("\n  Context: {context}\n"));
        }

        if !self.suggestions.is_empty() {
            output.push_str("\n  Suggestions:\n");
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("    {}. {}\n", i + 1, suggestion));
            }
        }
        output
    }
}

impl ErrorType {
    /// Short prefix such as `input` or `config`.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorType::Configuration => "config",
            ErrorType::Content => "content",
            ErrorType::Filesystem => "file",
            ErrorType::Validation => "input",
            ErrorType::Terminal => "terminal",
            ErrorType::Unknown => "error",
        }
    }
}

impl fmt::Display for EnhancedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

impl std::error::Error for EnhancedError {}

/// Turns `anyhow::Error`s into rendered [`EnhancedError`] text.
pub struct ErrorHandler {
    verbose: bool,
    show_suggestions: bool,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorHandler {
    /// Create a handler that shows suggestions and hides context.
    pub fn new() -> Self {
        Self {
            verbose: false,
            show_suggestions: true,
        }
    }

    /// Include the error chain in the output.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Toggle the suggestion list.
    pub fn show_suggestions(mut self, show: bool) -> Self {
        self.show_suggestions = show;
        self
    }

    /// Classify `error` and render it.
    pub fn handle(&self, error: &Error) -> String {
        let mut enhanced = self.enhance(error);
        if !self.show_suggestions {
            enhanced.suggestions.clear();
        }
        enhanced.format(self.verbose)
    }

    /// Turn any error into an [`EnhancedError`], preferring typed causes in the
    /// chain over message heuristics.
    pub fn enhance(&self, error: &Error) -> EnhancedError {
        if let Some(enhanced) = error.downcast_ref::<EnhancedError>() {
            return enhanced.clone();
        }

        let message = error.to_string();
        let chain = format!("{error:#}");

        for cause in error.chain() {
            if let Some(content) = cause.downcast_ref::<ContentError>() {
                return EnhancedError::new("Portfolio content", content.to_string(), ErrorType::Content)
                    .with_context(chain)
                    .with_suggestion("Check crates/folio-core/content/portfolio.toml");
            }
            if let Some(io_err) = cause.downcast_ref::<io::Error>() {
                return classify_io(io_err, &message).with_context(chain);
            }
            if cause.downcast_ref::<serde_json::Error>().is_some() {
                return EnhancedError::new("Invalid settings", message, ErrorType::Configuration)
                    .with_context(chain)
                    .with_suggestions(config_suggestions());
            }
        }

        classify_message(&message).with_context(chain)
    }
}

fn config_suggestions() -> Vec<String> {
    vec![
        "Check .folio/settings.json and .folio/settings.local.json".to_string(),
        "Run `folio config` to see the merged configuration".to_string(),
    ]
}

fn classify_io(err: &io::Error, message: &str) -> EnhancedError {
    match err.kind() {
        io::ErrorKind::NotFound => EnhancedError::new("File not found", message, ErrorType::Filesystem)
            .with_suggestions(vec![
                "Check `cv.asset_path` in .folio/settings.json".to_string(),
                "Relative paths resolve against the --workspace directory".to_string(),
            ]),
        io::ErrorKind::PermissionDenied => {
            EnhancedError::new("Permission denied", message, ErrorType::Filesystem)
                .with_suggestions(vec![
                    "Check permissions of the download directory".to_string(),
                    "Pass --dest to write somewhere else".to_string(),
                ])
        }
        _ => EnhancedError::new("I/O error", message, ErrorType::Filesystem),
    }
}

fn classify_message(message: &str) -> EnhancedError {
    let lower = message.to_lowercase();

    if lower.contains("configuration") || lower.contains("settings") || lower.contains("keybinding")
    {
        return EnhancedError::new("Configuration error", message, ErrorType::Configuration)
            .with_suggestions(config_suggestions());
    }

    if lower.contains("terminal") || lower.contains("raw mode") {
        return EnhancedError::new("Terminal error", message, ErrorType::Terminal)
            .with_suggestion("Run inside an interactive terminal, or use a subcommand such as `folio page home`");
    }

    EnhancedError::new("Error", message, ErrorType::Unknown)
        .with_suggestion("Re-run with -v and check .folio/logs/folio.log")
}

/// Constructors for failures the binary reports directly.
pub mod errors {
    use super::*;

    /// A page name that is not one of the six routes.
    pub fn unknown_page(name: &str) -> EnhancedError {
        EnhancedError::new(
            "Unknown page",
            format!("'{name}' is not a page."),
            ErrorType::Validation,
        )
        .with_suggestion("Use one of: home, projects, certificates, skills, about, contact")
    }

    /// A `--lang`/`--language` value other than de or en.
    pub fn unknown_language(value: &str) -> EnhancedError {
        EnhancedError::new(
            "Unknown language",
            format!("'{value}' is not a supported language."),
            ErrorType::Validation,
        )
        .with_suggestion("Use `de` or `en`")
    }

    /// A `--category` value that matches no project category.
    pub fn unknown_category(value: &str) -> EnhancedError {
        EnhancedError::new(
            "Unknown project category",
            format!("'{value}' is not a project category."),
            ErrorType::Validation,
        )
        .with_suggestion(
            "Use one of: system-integration, web-development, management, ai-development, automation",
        )
    }

    /// Contact form validation failed; `messages` are the per-field errors.
    pub fn contact_rejected(messages: Vec<String>) -> EnhancedError {
        EnhancedError::new(
            "Contact form incomplete",
            "The message was not sent.",
            ErrorType::Validation,
        )
        .with_suggestions(messages)
    }
}
