//! # gdoc2tex
//!
//! Converts HTML exported from Google Docs into LaTeX.
//!
//! ## Features
//!
//! - Headings to `\chapter`/`\section` commands, with labels and unnumbered variants
//! - Bold, italic and underline recovered from the export's CSS classes
//! - Lists, tables, links and downloaded figures with captions
//! - Chart-service formula images decoded back into TeX
//! - Abstract and reference list blocks, the latter harvested into a `.bib` file
//! - `#{name}` templates for the surrounding document
//!
//! ## Quick Start
//!
//! ```no_run
//! use gdoc2tex::remote::HttpFetcher;
//! use gdoc2tex::template::render_template;
//! use gdoc2tex::{ConvertOptions, SourceDocument, convert_document};
//!
//! let source = SourceDocument::from_file("paper.html").unwrap();
//! let fetcher = HttpFetcher::new(None).unwrap();
//! let doc = convert_document(&source, &ConvertOptions::default(), &fetcher).unwrap();
//!
//! let tex = render_template("\\title{#{title}}\n#{yield}", &doc.placeholders());
//! println!("{tex}");
//! ```
//!
//! ## Pieces
//!
//! The conversion is a single depth-first walk; its parts are usable alone:
//!
//! ```
//! use gdoc2tex::css::StyleResolver;
//! use gdoc2tex::latex::section_command;
//!
//! let mut styles = StyleResolver::new(".c3{font-weight:700;font-style:italic}");
//! let wrap = styles.resolve("c3").unwrap();
//! assert_eq!(wrap.open(), "\\textbf{\\textit{");
//!
//! assert_eq!(section_command(3, true, false), "\\subsection");
//! assert_eq!(section_command(3, false, true), "\\subsubsection*");
//! ```

pub mod config;
pub mod css;
pub mod document;
pub mod dom;
pub mod error;
pub mod formula;
pub mod latex;
pub mod references;
pub mod remote;
pub mod template;
pub mod util;

pub use config::ConvertOptions;
pub use document::{ConvertedDocument, SourceDocument, convert_document};
pub use error::{Error, Result};
pub use latex::Diagnostic;
pub use references::ReferenceStore;
