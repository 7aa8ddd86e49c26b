//! Marker rewriting applied to assembled paragraph and heading text.
//!
//! Authors type small markers into the document (`{cite:key}`,
//! `[ref:fig1]`, `[label:intro]`, ...). Each [`RewriteRule`] turns one
//! kind of marker into LaTeX or lifts it out of the text, and the rules of
//! a block are applied in order by [`apply_rules`].

use std::sync::LazyLock;

use regex_lite::Regex;

static CITE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\{cite:(.+?)\}").unwrap());
static REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\[ref:(.+?)\]").unwrap());
static CAPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[image_caption:(.+?)\]").unwrap());
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[label:([^\]]+)\]").unwrap());
static NONUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[nonumber\]").unwrap());

/// One text rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteRule {
    /// Curly and straight double quotes to ``` `` ``` / `''`.
    Quotes,
    /// `{cite:key}` to `~\cite{key}`.
    Citation,
    /// `[ref:label]` to `~\ref{label}`.
    CrossReference,
    /// `[image_caption:text]` removed, text captured.
    ImageCaption,
    /// `[label:name]` removed, name captured.
    Label,
    /// `[nonumber]` removed, captured as an empty string when present.
    NoNumber,
}

/// Rules run over every ordinary paragraph.
pub const PARAGRAPH_RULES: [RewriteRule; 4] = [
    RewriteRule::Quotes,
    RewriteRule::Citation,
    RewriteRule::CrossReference,
    RewriteRule::ImageCaption,
];

/// Rules run over heading text.
pub const HEADING_RULES: [RewriteRule; 2] = [RewriteRule::Label, RewriteRule::NoNumber];

/// Output of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    /// Value lifted out of the text, if the rule captures one.
    pub captured: Option<String>,
}

impl RewriteRule {
    pub fn apply(self, text: &str) -> Rewrite {
        match self {
            RewriteRule::Quotes => unchanged(normalize_quotes(text)),
            RewriteRule::Citation => {
                unchanged(CITE_RE.replace_all(text, "~\\cite{${1}}").into_owned())
            }
            RewriteRule::CrossReference => {
                unchanged(REF_RE.replace_all(text, "~\\ref{${1}}").into_owned())
            }
            RewriteRule::ImageCaption => extract(&CAPTION_RE, text),
            RewriteRule::Label => extract(&LABEL_RE, text),
            RewriteRule::NoNumber => {
                let found = NONUMBER_RE.is_match(text);
                Rewrite {
                    text: NONUMBER_RE.replace_all(text, "").into_owned(),
                    captured: found.then(String::new),
                }
            }
        }
    }
}

fn unchanged(text: String) -> Rewrite {
    Rewrite {
        text,
        captured: None,
    }
}

/// Remove every match of `re`, capturing group 1 of the last one.
fn extract(re: &Regex, text: &str) -> Rewrite {
    let captured = re
        .captures_iter(text)
        .last()
        .map(|c| c[1].trim().to_string());
    Rewrite {
        text: re.replace_all(text, "").into_owned(),
        captured,
    }
}

fn normalize_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut open = true;
    for c in text.chars() {
        match c {
            '\u{201c}' => out.push_str("``"),
            '\u{201d}' => out.push_str("''"),
            '"' => {
                out.push_str(if open { "``" } else { "''" });
                open = !open;
            }
            _ => out.push(c),
        }
    }
    out
}

/// Result of a rule pipeline.
#[derive(Debug, Clone, Default)]
pub struct Applied {
    pub text: String,
    pub captures: Vec<(RewriteRule, String)>,
}

impl Applied {
    /// Value captured by `rule`, if it fired.
    pub fn captured(&self, rule: RewriteRule) -> Option<&str> {
        self.captures
            .iter()
            .rev()
            .find(|(r, _)| *r == rule)
            .map(|(_, v)| v.as_str())
    }
}

/// Apply `rules` to `text` in order.
///
/// ```
/// use gdoc2tex::latex::{apply_rules, RewriteRule, HEADING_RULES};
///
/// let applied = apply_rules(&HEADING_RULES, "Results [label:res][nonumber]");
/// assert_eq!(applied.text, "Results ");
/// assert_eq!(applied.captured(RewriteRule::Label), Some("res"));
/// assert_eq!(applied.captured(RewriteRule::NoNumber), Some(""));
/// ```
pub fn apply_rules(rules: &[RewriteRule], text: &str) -> Applied {
    let mut applied = Applied {
        text: text.to_string(),
        captures: Vec::new(),
    };
    for &rule in rules {
        let Rewrite { text, captured } = rule.apply(&applied.text);
        applied.text = text;
        if let Some(value) = captured {
            applied.captures.push((rule, value));
        }
    }
    applied
}
