//! HTML parsing into an arena tree.
//!
//! ```
//! use gdoc2tex::dom::{parse_html, NodeKind};
//!
//! let dom = parse_html("<html><body><h2>Intro</h2></body></html>");
//! let body = dom.body().unwrap();
//! let heading = dom.children(body).next().unwrap();
//! assert_eq!(NodeKind::of(&dom, heading), NodeKind::Heading(2));
//! ```

mod arena;
mod kind;
mod tree_sink;

pub use arena::{Attribute, Children, Dom, DomNode, NodeData, NodeId};
pub use kind::NodeKind;
pub use tree_sink::DomSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document.
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

impl Dom {
    /// The `<body>` element.
    pub fn body(&self) -> Option<NodeId> {
        self.find_by_tag("body")
    }

    /// Raw text of every `<style>` element in `<head>`, concatenated.
    pub fn head_style_text(&self) -> String {
        let Some(head) = self.find_by_tag("head") else {
            return String::new();
        };

        let mut css = String::new();
        for id in self.descendants(head) {
            if self.element_name(id).is_some_and(|n| n.as_ref() == "style") {
                css.push_str(&self.collect_text(id));
                css.push('\n');
            }
        }
        css
    }
}
