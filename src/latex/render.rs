//! The recursive HTML to LaTeX walk.
//!
//! [`Transducer::convert`] renders one node and, through recursion, its
//! subtree. Every node yields exactly one string; children are concatenated
//! in document order, trimmed, then wrapped with the node's start and end
//! markup. Side channels (title, subtitle, pending caption, mode, references,
//! downloaded images) are updated on the way.

use std::fs;

use crate::config::ConvertOptions;
use crate::css::StyleResolver;
use crate::dom::{Dom, NodeId, NodeKind};
use crate::error::Result;
use crate::formula;
use crate::references::ReferenceStore;
use crate::remote::Fetch;

use super::context::{ConversionState, Diagnostic, Mode};
use super::figure::{FormulaPlacement, figure_block, image_file_name};
use super::rewrite::{HEADING_RULES, PARAGRAPH_RULES, RewriteRule, apply_rules};
use super::sectioning::section_command;

const ABSTRACT_START: &str = "<abstract>";
const ABSTRACT_END: &str = "</abstract>";
const REFERENCES_START: &str = "<references>";
const REFERENCES_END: &str = "</references>";

/// Walks a parsed document and emits LaTeX.
pub struct Transducer<'a> {
    dom: &'a Dom,
    options: &'a ConvertOptions,
    fetcher: &'a dyn Fetch,
    styles: StyleResolver,
    references: ReferenceStore,
    state: ConversionState,
}

impl<'a> Transducer<'a> {
    /// Create a transducer for `dom`.
    ///
    /// `base_name` names the bibliography file and the `\bibliography`
    /// command; the style resolver is built from the document's head styles.
    pub fn new(
        dom: &'a Dom,
        options: &'a ConvertOptions,
        fetcher: &'a dyn Fetch,
        base_name: &str,
    ) -> Self {
        Self {
            dom,
            options,
            fetcher,
            styles: StyleResolver::new(&dom.head_style_text()),
            references: ReferenceStore::new(options.bibliography_path(base_name)),
            state: ConversionState::new(base_name),
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConversionState {
        &mut self.state
    }

    pub fn references(&self) -> &ReferenceStore {
        &self.references
    }

    /// Consume the transducer, returning the final state.
    pub fn into_state(self) -> ConversionState {
        self.state
    }

    /// Render `id`. `sole_child` is set only for an image that is the single
    /// child of a paragraph.
    pub fn convert(&mut self, id: NodeId, sole_child: bool) -> Result<String> {
        match NodeKind::of(self.dom, id) {
            NodeKind::Heading(level) => self.convert_heading(id, level),
            NodeKind::Paragraph => self.convert_paragraph(id),
            NodeKind::Span => self.convert_span(id),
            NodeKind::Text => self.convert_text(id),
            NodeKind::Anchor => self.convert_anchor(id),
            NodeKind::Image => self.convert_image(id, sole_child),
            NodeKind::Table => self.convert_table(id),
            NodeKind::TableBody => self.wrap(id, "", ""),
            NodeKind::TableRow => self.convert_row(id),
            NodeKind::TableCell => self.wrap(id, " ", " &"),
            NodeKind::UnorderedList => self.wrap(id, "\\begin{itemize}\n", "\n\\end{itemize}\n"),
            NodeKind::OrderedList => {
                self.wrap(id, "\\begin{enumerate}\n", "\n\\end{enumerate}\n")
            }
            NodeKind::ListItem => self.convert_list_item(id),
            NodeKind::Comment => Ok(String::new()),
            NodeKind::Other(tag) => {
                self.state.report(Diagnostic::UnhandledElement { tag });
                self.wrap(id, "", "")
            }
        }
    }

    /// Children of `id` rendered, concatenated and trimmed.
    fn children_text(&mut self, id: NodeId) -> Result<String> {
        let mut text = String::new();
        let children: Vec<NodeId> = self.dom.children(id).collect();
        for child in children {
            text.push_str(&self.convert(child, false)?);
        }
        Ok(text.trim().to_string())
    }

    fn wrap(&mut self, id: NodeId, start: &str, end: &str) -> Result<String> {
        let inner = self.children_text(id)?;
        Ok(format!("{start}{inner}{end}"))
    }

    fn convert_heading(&mut self, id: NodeId, level: u8) -> Result<String> {
        let inner = self.children_text(id)?;
        let applied = apply_rules(&HEADING_RULES, &inner);

        let starred = applied.captured(RewriteRule::NoNumber).is_some();
        let command = section_command(level, self.options.use_chapters, starred);
        let label = applied
            .captured(RewriteRule::Label)
            .map(|l| format!("\\label{{{l}}}"))
            .unwrap_or_default();

        Ok(format!("{command}{{{}}}{label}\n", applied.text.trim()))
    }

    fn convert_paragraph(&mut self, id: NodeId) -> Result<String> {
        if let Some(image) = self.sole_image_child(id) {
            return self.convert(image, true);
        }

        let dom = self.dom;
        if let Some(class) = dom.get_attr(id, "class")
            && class.contains("title")
        {
            let is_subtitle = class.contains("subtitle");
            let mut text = String::new();
            let children: Vec<NodeId> = dom.children(id).collect();
            for child in children {
                text.push_str(self.convert(child, false)?.trim());
            }
            let text = text.trim().to_string();
            if is_subtitle {
                self.state.document_subtitle = Some(text);
            } else {
                self.state.document_title = Some(text);
            }
            return Ok(String::new());
        }

        let inner = self.children_text(id)?;
        let applied = apply_rules(&PARAGRAPH_RULES, &format!("{inner}\n"));
        if let Some(caption) = applied.captured(RewriteRule::ImageCaption) {
            self.state.pending_image_caption = Some(caption.to_string());
        }
        Ok(applied.text)
    }

    /// The image a paragraph consists of, if it holds nothing else.
    ///
    /// Blank text is ignored and spans wrapping only the image are looked
    /// through, since Docs exports put every image inside a span.
    fn sole_image_child(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let mut significant = self
                .dom
                .children(current)
                .filter(|&c| !self.is_blank_text(c));
            let only = significant.next()?;
            if significant.next().is_some() {
                return None;
            }
            match NodeKind::of(self.dom, only) {
                NodeKind::Image => return Some(only),
                NodeKind::Span => current = only,
                _ => return None,
            }
        }
    }

    fn is_blank_text(&self, id: NodeId) -> bool {
        self.dom
            .text_content(id)
            .is_some_and(|t| t.trim().is_empty())
    }

    fn convert_span(&mut self, id: NodeId) -> Result<String> {
        let inner = self.children_text(id)?;
        if inner.is_empty() {
            return Ok(" ".to_string());
        }

        let mut open = String::new();
        let mut close = String::new();
        let dom = self.dom;
        for class in dom.element_classes(id) {
            if let Some(directive) = self.styles.resolve(class) {
                open.push_str(&directive.open());
                close.push_str(&directive.close());
            }
        }

        Ok(format!(" {open}{inner}{close} "))
    }

    fn convert_text(&mut self, id: NodeId) -> Result<String> {
        let dom = self.dom;
        let text = dom.text_content(id).unwrap_or_default().trim();
        match text {
            ABSTRACT_START => {
                self.enter(Mode::Abstract, text);
                Ok(String::new())
            }
            ABSTRACT_END => {
                self.leave(Mode::Abstract, text);
                Ok(String::new())
            }
            REFERENCES_START => {
                if self.enter(Mode::References, text) {
                    self.references.seed()?;
                }
                Ok(String::new())
            }
            REFERENCES_END => {
                if self.leave(Mode::References, text) {
                    Ok(format!("\\bibliography{{{}}}", self.state.base_name))
                } else {
                    Ok(String::new())
                }
            }
            _ => Ok(text.to_string()),
        }
    }

    /// Switch from Normal to `mode`; modes never nest.
    fn enter(&mut self, mode: Mode, sentinel: &str) -> bool {
        if self.state.mode != Mode::Normal {
            self.state.report(Diagnostic::UnexpectedSentinel {
                sentinel: sentinel.to_string(),
                mode: self.state.mode,
            });
            return false;
        }
        self.state.mode = mode;
        true
    }

    /// Switch from `mode` back to Normal.
    fn leave(&mut self, mode: Mode, sentinel: &str) -> bool {
        if self.state.mode != mode {
            self.state.report(Diagnostic::UnexpectedSentinel {
                sentinel: sentinel.to_string(),
                mode: self.state.mode,
            });
            return false;
        }
        self.state.mode = Mode::Normal;
        true
    }

    fn convert_anchor(&mut self, id: NodeId) -> Result<String> {
        match self.dom.get_attr(id, "href") {
            Some(href) if !href.is_empty() && href != "#" => Ok(format!("\\url{{{href}}}")),
            _ => self.wrap(id, "", ""),
        }
    }

    fn convert_image(&mut self, id: NodeId, sole_child: bool) -> Result<String> {
        let dom = self.dom;
        let Some(src) = dom.get_attr(id, "src").filter(|s| !s.is_empty()) else {
            self.state.report(Diagnostic::ImageWithoutSource);
            return Ok(String::new());
        };

        if let Some(encoded) = formula::chart_formula(src) {
            let tex = formula::decode(encoded, self.options.replace_backslash_in_formulas);
            let placement = FormulaPlacement::choose(sole_child, self.options.numbered_equations);
            return Ok(placement.render(&tex));
        }

        let fetched = self.fetcher.fetch(src)?;
        let file_name = image_file_name(src, fetched.content_type.as_deref());
        fs::create_dir_all(&self.options.output_dir)?;
        fs::write(self.options.output_dir.join(&file_name), &fetched.body)?;
        log::debug!("saved {src} as {file_name}");

        let caption = self.state.pending_image_caption.take();
        Ok(figure_block(&file_name, caption.as_deref()))
    }

    fn convert_table(&mut self, id: NodeId) -> Result<String> {
        let columns = self.column_count(id);
        if columns == 0 {
            log::warn!("table without cells in its first row");
        }
        let start = format!("\\begin{{tabular}}{{{}}}\n", "l".repeat(columns));
        self.wrap(id, &start, "\n\\end{tabular}\n")
    }

    /// Cells of the first row found under the table.
    fn column_count(&self, table: NodeId) -> usize {
        let Some(row) = self.dom.find_descendant(table, "tr") else {
            return 0;
        };
        self.dom
            .descendants(row)
            .into_iter()
            .filter(|&d| NodeKind::of(self.dom, d) == NodeKind::TableCell)
            .count()
    }

    fn convert_row(&mut self, id: NodeId) -> Result<String> {
        let mut inner = self.children_text(id)?;
        if let Some(pos) = inner.rfind('&') {
            inner.remove(pos);
        }
        Ok(format!("{} \\\\\n", inner.trim()))
    }

    fn convert_list_item(&mut self, id: NodeId) -> Result<String> {
        let inner = self.children_text(id)?;
        if self.state.mode != Mode::References {
            return Ok(format!("\\item {inner}\n"));
        }

        let (title, body) = match inner.split_once(':') {
            Some((title, body)) => (title.trim(), body.trim()),
            None => (inner.as_str(), ""),
        };
        if !title.is_empty() {
            self.references.add_reference(title, body)?;
        }
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use tempfile::TempDir;

    use super::*;
    use crate::dom::parse_html;
    use crate::error::Error;
    use crate::remote::Fetched;

    #[derive(Default)]
    struct StubFetcher {
        images: HashMap<String, Fetched>,
        requested: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn with_png(url: &str) -> Self {
            let mut images = HashMap::new();
            images.insert(
                url.to_string(),
                Fetched {
                    body: vec![0x89, b'P', b'N', b'G'],
                    content_type: Some("image/png".to_string()),
                },
            );
            Self {
                images,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for StubFetcher {
        fn fetch(&self, url: &str) -> Result<Fetched> {
            self.requested.borrow_mut().push(url.to_string());
            self.images.get(url).cloned().ok_or_else(|| Error::Remote {
                url: url.to_string(),
                status: 403,
                message: "forbidden".to_string(),
            })
        }
    }

    struct Harness {
        dir: TempDir,
        options: ConvertOptions,
        fetcher: StubFetcher,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_fetcher(StubFetcher::default())
        }

        fn with_fetcher(fetcher: StubFetcher) -> Self {
            let dir = TempDir::new().unwrap();
            let options = ConvertOptions::new().with_output_dir(dir.path());
            Self {
                dir,
                options,
                fetcher,
            }
        }

        /// Render the first child of `<body>`.
        fn render(&self, html: &str) -> String {
            self.render_with_state(html).0
        }

        fn render_with_state(&self, html: &str) -> (String, ConversionState) {
            let dom = parse_html(html);
            let body = dom.body().unwrap();
            let mut transducer = Transducer::new(&dom, &self.options, &self.fetcher, "doc");
            let mut out = String::new();
            let children: Vec<_> = dom.children(body).collect();
            for child in children {
                out.push_str(&transducer.convert(child, false).unwrap());
            }
            (out, transducer.into_state())
        }
    }

    #[test]
    fn test_heading_chapter_and_section() {
        let h = Harness::new();
        assert_eq!(h.render("<h1>Intro</h1>"), "\\chapter{Intro}\n");
        assert_eq!(h.render("<h3><span>Deep</span></h3>"), "\\subsection{Deep}\n");
    }

    #[test]
    fn test_heading_without_chapters() {
        let mut h = Harness::new();
        h.options.use_chapters = false;
        assert_eq!(h.render("<h1>Intro</h1>"), "\\section{Intro}\n");
    }

    #[test]
    fn test_heading_label_and_nonumber() {
        let h = Harness::new();
        assert_eq!(
            h.render("<h2>Results [label:res]</h2>"),
            "\\section{Results}\\label{res}\n"
        );
        assert_eq!(
            h.render("<h2>Thanks [nonumber]</h2>"),
            "\\section*{Thanks}\n"
        );
        assert_eq!(
            h.render("<h2>[nonumber]Both[label:b]</h2>"),
            "\\section*{Both}\\label{b}\n"
        );
    }

    #[test]
    fn test_paragraph_rewrites() {
        let h = Harness::new();
        assert_eq!(
            h.render("<p>See [ref:fig1] and {cite:knuth84}.</p>"),
            "See~\\ref{fig1} and~\\cite{knuth84}.\n"
        );
        assert_eq!(
            h.render("<p>\u{201c}Hi\u{201d}</p>"),
            "``Hi''\n"
        );
    }

    #[test]
    fn test_title_and_subtitle_paragraphs() {
        let h = Harness::new();
        let (out, state) = h.render_with_state(
            "<p class=\"c2 title\"><span>Grand</span><span>Title</span></p>\
             <p class=\"subtitle c1\"><span> Sub </span></p>",
        );
        assert_eq!(out, "");
        assert_eq!(state.document_title.as_deref(), Some("GrandTitle"));
        assert_eq!(state.document_subtitle.as_deref(), Some("Sub"));
    }

    #[test]
    fn test_span_styles_compose_in_class_order() {
        let h = Harness::new();
        let html = "<html><head><style>.b{font-weight:700}.i{font-style:italic}</style></head>\
                    <body><p><span class=\"i b\">x</span></p></body></html>";
        assert_eq!(h.render(html), "\\textit{\\textbf{x}}\n");
    }

    #[test]
    fn test_span_without_styles_is_padded() {
        let h = Harness::new();
        assert_eq!(
            h.render("<p><span>a</span><span class=\"c9\">b</span></p>"),
            "a  b\n"
        );
    }

    #[test]
    fn test_empty_span_never_wraps() {
        let h = Harness::new();
        let html = "<html><head><style>.b{font-weight:700}</style></head>\
                    <body><p>x<span class=\"b\"> </span>y</p></body></html>";
        assert_eq!(h.render(html), "x y\n");
    }

    #[test]
    fn test_anchor_becomes_url() {
        let h = Harness::new();
        assert_eq!(
            h.render("<p><a href=\"https://example.com/x\">click here</a></p>"),
            "\\url{https://example.com/x}\n"
        );
        assert_eq!(h.render("<p><a href=\"#\">kept</a></p>"), "kept\n");
        assert_eq!(h.render("<p><a id=\"t.0\">plain</a></p>"), "plain\n");
    }

    #[test]
    fn test_formula_sole_child_numbered() {
        let mut h = Harness::new();
        h.options.numbered_equations = true;
        let html = "<p><img src=\"https://www.google.com/chart?cht=tx&amp;chl=x%5E2\"></p>";
        assert_eq!(h.render(html), "\\begin{equation}\nx^2\n\\end{equation}");
    }

    #[test]
    fn test_formula_sole_child_through_span() {
        let h = Harness::new();
        let html = "<p><span style=\"overflow:hidden\"><img src=\"https://www.google.com/chart?cht=tx&amp;chl=a%2Bb\"></span></p>";
        assert_eq!(h.render(html), "\\[ a+b \\]");
    }

    #[test]
    fn test_formula_inline() {
        let mut h = Harness::new();
        h.options.numbered_equations = true;
        let html = "<p>so <img src=\"https://www.google.com/chart?cht=tx&amp;chl=y\"> holds</p>";
        assert_eq!(h.render(html), "so $y$ holds\n");
    }

    #[test]
    fn test_image_downloaded_with_pending_caption() {
        let url = "https://lh3.googleusercontent.com/img1";
        let h = Harness::with_fetcher(StubFetcher::with_png(url));
        let html = format!(
            "<p>[image_caption:A cat]</p><p><span><img src=\"{url}\"></span></p><p><img src=\"{url}\"></p>"
        );

        let (out, state) = h.render_with_state(&html);

        let name = image_file_name(url, Some("image/png"));
        assert!(out.contains("\\caption{\\small{A cat}}"));
        assert_eq!(out.matches("\\caption").count(), 1);
        assert_eq!(out.matches(&format!("\\includegraphics[width=\\textwidth]{{{name}}}")).count(), 2);
        assert!(h.dir.path().join(&name).exists());
        assert_eq!(state.pending_image_caption, None);
        assert_eq!(h.fetcher.requested.borrow().len(), 2);
    }

    #[test]
    fn test_image_download_failure_is_fatal() {
        let h = Harness::new();
        let dom = parse_html("<p><img src=\"https://example.com/missing.png\"></p>");
        let mut transducer = Transducer::new(&dom, &h.options, &h.fetcher, "doc");
        let p = dom.find_by_tag("p").unwrap();

        let err = transducer.convert(p, false).unwrap_err();
        assert!(matches!(err, Error::Remote { status: 403, .. }));
    }

    #[test]
    fn test_table() {
        let h = Harness::new();
        let out = h.render(
            "<table><tbody><tr><td>a</td><td>b</td><td>c</td></tr>\
             <tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>",
        );
        assert_eq!(
            out,
            "\\begin{tabular}{lll}\na & b & c \\\\\n1 & 2 & 3 \\\\\n\\end{tabular}\n"
        );
        for line in out.lines().filter(|l| l.ends_with("\\\\")) {
            assert!(!line.trim_end_matches("\\\\").trim_end().ends_with('&'));
        }
    }

    #[test]
    fn test_lists() {
        let h = Harness::new();
        assert_eq!(
            h.render("<ul><li><span>one</span></li><li>two</li></ul>"),
            "\\begin{itemize}\n\\item one\n\\item two\n\\end{itemize}\n"
        );
        assert_eq!(
            h.render("<ol><li>first</li></ol>"),
            "\\begin{enumerate}\n\\item first\n\\end{enumerate}\n"
        );
    }

    #[test]
    fn test_abstract_sentinels_switch_mode() {
        let h = Harness::new();
        let (out, state) = h.render_with_state("<p>&lt;abstract&gt;</p><p>Hello</p>");
        assert_eq!(out, "\nHello\n");
        assert_eq!(state.mode, Mode::Abstract);
    }

    #[test]
    fn test_references_block_harvests_items() {
        let h = Harness::new();
        let (out, state) = h.render_with_state(
            "<p>&lt;references&gt;</p>\
             <ul><li>knuth84: author={Knuth}, title={Literate Programming}</li>\
             <li>lamport94</li></ul>\
             <p>&lt;/references&gt;</p>",
        );

        assert!(out.ends_with("\\bibliography{doc}\n"));
        assert!(!out.contains("knuth84"));
        assert_eq!(state.mode, Mode::Normal);

        let bib = fs::read_to_string(h.dir.path().join("doc.bib")).unwrap();
        assert_eq!(
            bib,
            "@article{knuth84, author={Knuth}, title={Literate Programming}}\n@article{lamport94, }\n"
        );
    }

    #[test]
    fn test_references_block_skips_keys_from_latin1_bibliography() {
        let h = Harness::new();
        let bib = h.dir.path().join("doc.bib");
        fs::write(&bib, b"@article{knuth84, author={Kn\xfcth}}\n").unwrap();

        h.render("<p>&lt;references&gt;</p><ul><li>knuth84: again</li></ul><p>&lt;/references&gt;</p>");

        assert_eq!(fs::read(&bib).unwrap(), b"@article{knuth84, author={Kn\xfcth}}\n");
    }

    #[test]
    fn test_unreadable_bibliography_is_fatal() {
        let h = Harness::new();
        fs::create_dir(h.dir.path().join("doc.bib")).unwrap();
        let dom = parse_html("<p>&lt;references&gt;</p>");
        let mut transducer = Transducer::new(&dom, &h.options, &h.fetcher, "doc");
        let p = dom.find_by_tag("p").unwrap();

        let err = transducer.convert(p, false).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_nested_sentinel_is_ignored() {
        let h = Harness::new();
        let (_, state) = h.render_with_state(
            "<p>&lt;abstract&gt;</p><p>&lt;references&gt;</p><p>&lt;/references&gt;</p>",
        );
        assert_eq!(state.mode, Mode::Abstract);
        assert_eq!(state.diagnostics.len(), 2);
        assert!(matches!(
            state.diagnostics[0],
            Diagnostic::UnexpectedSentinel { mode: Mode::Abstract, .. }
        ));
    }

    #[test]
    fn test_unhandled_element_keeps_children() {
        let h = Harness::new();
        let (out, state) = h.render_with_state("<div><p>inside</p></div>");
        assert_eq!(out, "inside");
        assert_eq!(
            state.diagnostics,
            vec![Diagnostic::UnhandledElement { tag: "div".to_string() }]
        );
    }
}
