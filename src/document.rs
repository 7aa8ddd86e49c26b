//! Whole-document conversion.
//!
//! [`convert_document`] parses the HTML, walks the top-level children of
//! `<body>` with a [`Transducer`] and sorts what each one emits into the
//! abstract or the main content, depending on the mode the walk was in.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::ConvertOptions;
use crate::dom::parse_html;
use crate::error::Result;
use crate::latex::{Diagnostic, Mode, Transducer};
use crate::remote::Fetch;
use crate::util::{base_name, decode_text, normalize_whitespace};

/// A document ready to be converted.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    /// Title as known to the store; also names the output files.
    pub title: String,
    pub author: String,
    pub html: String,
}

impl SourceDocument {
    /// Read an exported HTML file; the title is the file stem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            title,
            author: String::new(),
            html: decode_text(&bytes, None).into_owned(),
        })
    }
}

/// Result of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertedDocument {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub abstract_text: String,
    pub content: String,
    /// Stem of the `.tex` and `.bib` files.
    pub base_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConvertedDocument {
    /// Values for the template placeholders.
    pub fn placeholders(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("title", self.title.clone()),
            ("subtitle", self.subtitle.clone()),
            ("author", self.author.clone()),
            ("abstract", self.abstract_text.clone()),
            ("yield", self.content.clone()),
        ])
    }
}

/// Where one top-level emission ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Content,
    Abstract,
    Discard,
}

impl Destination {
    /// Route by the mode before and after the node was converted, so that
    /// the paragraphs holding the sentinels themselves land inside their block.
    fn route(before: Mode, after: Mode) -> Self {
        match (before, after) {
            (Mode::Abstract, _) | (_, Mode::Abstract) => Destination::Abstract,
            (Mode::References, Mode::References) => Destination::Discard,
            _ => Destination::Content,
        }
    }
}

/// Convert `source` to LaTeX.
///
/// Images are downloaded through `fetcher` into `options.output_dir`;
/// reference list entries are appended to the bibliography there.
pub fn convert_document(
    source: &SourceDocument,
    options: &ConvertOptions,
    fetcher: &dyn Fetch,
) -> Result<ConvertedDocument> {
    let base_name = base_name(&source.title);
    log::info!("Converting \"{}\" as {base_name}", source.title);

    let dom = parse_html(&source.html);
    let mut transducer = Transducer::new(&dom, options, fetcher, &base_name);

    let mut content = String::new();
    let mut abstract_text = String::new();
    if let Some(body) = dom.body() {
        for child in dom.children(body) {
            let before = transducer.state().mode;
            let emitted = transducer.convert(child, false)?;
            let after = transducer.state().mode;

            let buffer = match Destination::route(before, after) {
                Destination::Content => &mut content,
                Destination::Abstract => &mut abstract_text,
                Destination::Discard => continue,
            };
            buffer.push_str(&emitted);
            buffer.push('\n');
        }
    } else {
        log::warn!("document has no body");
    }

    let mut state = transducer.into_state();
    if let Some(tag) = state.mode.end_tag() {
        state.report(Diagnostic::MissingEndTag { tag });
    }

    Ok(ConvertedDocument {
        title: state
            .document_title
            .take()
            .unwrap_or_else(|| source.title.clone()),
        subtitle: state.document_subtitle.take().unwrap_or_default(),
        author: source.author.clone(),
        abstract_text: normalize_whitespace(&abstract_text),
        content: normalize_whitespace(&content),
        base_name,
        diagnostics: state.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::Error;
    use crate::remote::Fetched;

    struct NoNetwork;

    impl Fetch for NoNetwork {
        fn fetch(&self, url: &str) -> Result<Fetched> {
            Err(Error::Remote {
                url: url.to_string(),
                status: 599,
                message: "offline".to_string(),
            })
        }
    }

    fn convert(title: &str, html: &str) -> (TempDir, ConvertedDocument) {
        let dir = TempDir::new().unwrap();
        let options = ConvertOptions::new().with_output_dir(dir.path());
        let source = SourceDocument {
            title: title.to_string(),
            author: "Ada".to_string(),
            html: html.to_string(),
        };
        let doc = convert_document(&source, &options, &NoNetwork).unwrap();
        (dir, doc)
    }

    #[test]
    fn test_route() {
        use Mode::*;
        assert_eq!(Destination::route(Normal, Normal), Destination::Content);
        assert_eq!(Destination::route(Normal, Abstract), Destination::Abstract);
        assert_eq!(Destination::route(Abstract, Normal), Destination::Abstract);
        assert_eq!(Destination::route(Normal, References), Destination::Content);
        assert_eq!(Destination::route(References, References), Destination::Discard);
        assert_eq!(Destination::route(References, Normal), Destination::Content);
    }

    #[test]
    fn test_full_document() {
        let (_dir, doc) = convert(
            "Draft Paper",
            "<html><head><style>.c1{font-weight:700}</style></head><body>\n\
             <p class=\"title\"><span>My Paper</span></p>\n\
             <p class=\"subtitle\"><span>A study</span></p>\n\
             <p>&lt;abstract&gt;</p>\n<p>Short summary.</p>\n<p>&lt;/abstract&gt;</p>\n\
             <h1>Intro</h1>\n<p>Text <span class=\"c1\">bold</span> here.</p>\n\
             </body></html>",
        );

        assert_eq!(doc.title, "My Paper");
        assert_eq!(doc.subtitle, "A study");
        assert_eq!(doc.author, "Ada");
        assert_eq!(doc.base_name, "draft_paper");
        assert_eq!(doc.abstract_text, "Short summary.");
        assert_eq!(doc.content, "\\chapter{Intro}\n\nText \\textbf{bold} here.");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_title_falls_back_to_source() {
        let (_dir, doc) = convert("Notes", "<p>Body</p>");
        assert_eq!(doc.title, "Notes");
        assert_eq!(doc.subtitle, "");
        assert_eq!(doc.content, "Body");
    }

    #[test]
    fn test_unclosed_abstract() {
        let (_dir, doc) = convert("x", "<p>&lt;abstract&gt;</p><p>Hello</p>");

        assert_eq!(doc.abstract_text, "Hello");
        assert_eq!(doc.content, "");
        assert_eq!(
            doc.diagnostics,
            vec![Diagnostic::MissingEndTag { tag: "</abstract>" }]
        );
    }

    #[test]
    fn test_references_block() {
        let (dir, doc) = convert(
            "Refs",
            "<p>Before {cite:k1}.</p>\
             <p>&lt;references&gt;</p>\
             <ol><li>k1: author={Knuth}</li></ol>\
             <p>&lt;/references&gt;</p>",
        );

        assert_eq!(doc.content, "Before~\\cite{k1}.\n\n\\bibliography{refs}");
        let bib = fs::read_to_string(dir.path().join("refs.bib")).unwrap();
        assert_eq!(bib, "@article{k1, author={Knuth}}\n");
    }

    #[test]
    fn test_placeholders() {
        let doc = ConvertedDocument {
            title: "T".into(),
            content: "C".into(),
            ..Default::default()
        };
        let values = doc.placeholders();
        assert_eq!(values["title"], "T");
        assert_eq!(values["yield"], "C");
        assert_eq!(values["abstract"], "");
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_from_file_uses_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Field Notes.html");
        fs::write(&path, "<p>x</p>").unwrap();

        let source = SourceDocument::from_file(&path).unwrap();
        assert_eq!(source.title, "Field Notes");
        assert_eq!(source.html, "<p>x</p>");
    }
}
