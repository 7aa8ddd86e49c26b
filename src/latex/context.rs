//! Mutable state threaded through one conversion run.

use std::fmt;

/// Where the walk currently is with respect to the sentinel markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Between `<abstract>` and `</abstract>`.
    Abstract,
    /// Between `<references>` and `</references>`.
    References,
}

impl Mode {
    /// Closing sentinel that leaves this mode.
    pub fn end_tag(self) -> Option<&'static str> {
        match self {
            Mode::Normal => None,
            Mode::Abstract => Some("</abstract>"),
            Mode::References => Some("</references>"),
        }
    }
}

/// A recoverable problem noticed during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An element the converter has no rule for; its children were kept.
    UnhandledElement { tag: String },
    /// A sentinel that does not fit the current mode; it was ignored.
    UnexpectedSentinel { sentinel: String, mode: Mode },
    /// The document ended inside a sentinel block.
    MissingEndTag { tag: &'static str },
    /// An `<img>` without a usable `src`.
    ImageWithoutSource,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnhandledElement { tag } => write!(f, "unhandled node type {tag}"),
            Diagnostic::UnexpectedSentinel { sentinel, mode } => {
                write!(f, "ignored {sentinel} in {mode:?} mode")
            }
            Diagnostic::MissingEndTag { tag } => write!(f, "missing end tag {tag}"),
            Diagnostic::ImageWithoutSource => write!(f, "image without src"),
        }
    }
}

/// Per-run state mutated by the transducer during its single walk.
#[derive(Debug, Default)]
pub struct ConversionState {
    pub mode: Mode,
    /// Set by a `[image_caption:..]` marker, consumed by the next figure.
    pub pending_image_caption: Option<String>,
    pub document_title: Option<String>,
    pub document_subtitle: Option<String>,
    /// File-system friendly name of the document, fixed before the walk.
    pub base_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConversionState {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            ..Self::default()
        }
    }

    /// Log a diagnostic and keep it for the caller.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
