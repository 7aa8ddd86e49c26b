//! Conversion options.

use std::path::{Path, PathBuf};

/// Options fixed before a conversion run starts.
///
/// ```
/// use gdoc2tex::ConvertOptions;
///
/// let options = ConvertOptions::new()
///     .with_chapters(false)
///     .with_numbered_equations(true)
///     .with_output_dir("build");
///
/// assert!(!options.use_chapters);
/// assert_eq!(options.output_dir.to_str(), Some("build"));
/// ```
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Map `h1` to `\chapter` and shift the other headings down one level.
    pub use_chapters: bool,
    /// Render display formulas as numbered `equation` environments.
    pub numbered_equations: bool,
    /// Rewrite the `\backslash` token in decoded formulas to a plain `\`.
    pub replace_backslash_in_formulas: bool,
    /// Directory receiving the `.tex` output, downloaded images and the `.bib` file.
    pub output_dir: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            use_chapters: true,
            numbered_equations: false,
            replace_backslash_in_formulas: true,
            output_dir: PathBuf::from("latex"),
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chapters(mut self, use_chapters: bool) -> Self {
        self.use_chapters = use_chapters;
        self
    }

    pub fn with_numbered_equations(mut self, numbered: bool) -> Self {
        self.numbered_equations = numbered;
        self
    }

    pub fn with_backslash_replacement(mut self, replace: bool) -> Self {
        self.replace_backslash_in_formulas = replace;
        self
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Path of the bibliography file for a document base name.
    pub fn bibliography_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(format!("{base_name}.bib"))
    }

    /// Path of the generated LaTeX file for a document base name.
    pub fn output_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(format!("{base_name}.tex"))
    }
}
