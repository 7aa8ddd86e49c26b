//! CSS class to LaTeX emphasis resolution.
//!
//! Docs exports style text runs with generated classes (`c1`, `c7`, ...)
//! declared in a `<style>` block in the head. [`StyleResolver`] maps each
//! class to the emphasis commands it implies and remembers the answer.
//!
//! ```
//! use gdoc2tex::css::StyleResolver;
//!
//! let mut styles = StyleResolver::new(".c1{font-weight:700} .c2{color:#ff0000}");
//! assert_eq!(styles.resolve("c1").unwrap().open(), "\\textbf{");
//! assert!(styles.resolve("c2").is_none());
//! ```

mod stylesheet;

pub use stylesheet::{ClassIndex, Declaration};

use std::collections::HashMap;

/// An emphasis the LaTeX output can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
    Underline,
}

impl Emphasis {
    /// Opening command, including its brace.
    pub fn command(self) -> &'static str {
        match self {
            Emphasis::Bold => "\\textbf{",
            Emphasis::Italic => "\\textit{",
            Emphasis::Underline => "\\underline{",
        }
    }
}

/// Wrapping implied by one class: a non-empty, ordered list of emphases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapDirective {
    emphases: Vec<Emphasis>,
}

impl WrapDirective {
    pub fn emphases(&self) -> &[Emphasis] {
        &self.emphases
    }

    /// Opening commands, outermost first.
    pub fn open(&self) -> String {
        self.emphases.iter().map(|e| e.command()).collect()
    }

    /// One closing brace per opened command.
    pub fn close(&self) -> String {
        "}".repeat(self.emphases.len())
    }
}

/// What a single declaration means for emphasis.
#[derive(Debug, PartialEq, Eq)]
enum Effect {
    Apply(Emphasis),
    Neutral,
    Unknown,
}

fn classify(decl: &Declaration) -> Effect {
    match decl.property.as_str() {
        "font-weight" => match decl.value.as_str() {
            "bold" | "bolder" => Effect::Apply(Emphasis::Bold),
            "normal" | "lighter" | "inherit" | "initial" | "unset" => Effect::Neutral,
            v => match v.parse::<u16>() {
                Ok(w) if w >= 600 => Effect::Apply(Emphasis::Bold),
                Ok(_) => Effect::Neutral,
                Err(_) => Effect::Unknown,
            },
        },
        "font-style" => match decl.value.as_str() {
            "italic" | "oblique" => Effect::Apply(Emphasis::Italic),
            "normal" | "inherit" | "initial" | "unset" => Effect::Neutral,
            _ => Effect::Unknown,
        },
        "text-decoration" | "text-decoration-line" => {
            if decl.value.split_whitespace().any(|k| k == "underline") {
                Effect::Apply(Emphasis::Underline)
            } else {
                Effect::Neutral
            }
        }
        _ => Effect::Unknown,
    }
}

/// Memoizing class resolver, built once per conversion run.
#[derive(Debug, Default)]
pub struct StyleResolver {
    index: ClassIndex,
    memo: HashMap<String, Option<WrapDirective>>,
}

impl StyleResolver {
    /// Build a resolver over the concatenated `<style>` text of a document.
    pub fn new(stylesheet: &str) -> Self {
        Self {
            index: ClassIndex::parse(stylesheet),
            memo: HashMap::new(),
        }
    }

    /// Emphasis implied by `class`, or `None` when the class adds none.
    pub fn resolve(&mut self, class: &str) -> Option<WrapDirective> {
        if let Some(cached) = self.memo.get(class) {
            return cached.clone();
        }

        let directive = self.compute(class);
        self.memo.insert(class.to_string(), directive.clone());
        directive
    }

    /// Number of distinct classes resolved so far.
    pub fn cached(&self) -> usize {
        self.memo.len()
    }

    fn compute(&self, class: &str) -> Option<WrapDirective> {
        let declarations = self.index.declarations(class)?;

        let mut emphases = Vec::new();
        for decl in declarations {
            match classify(decl) {
                Effect::Apply(e) if !emphases.contains(&e) => emphases.push(e),
                Effect::Apply(_) | Effect::Neutral => {}
                Effect::Unknown => log::debug!(
                    "unknown declaration `{}: {}` in class .{class}",
                    decl.property,
                    decl.value
                ),
            }
        }

        if emphases.is_empty() {
            None
        } else {
            Some(WrapDirective { emphases })
        }
    }
}
