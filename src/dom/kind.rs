//! Classification of tree nodes into the kinds the converter understands.

use super::arena::{Dom, NodeData, NodeId};

/// What a node is, as far as LaTeX emission is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `h1` through `h9`.
    Heading(u8),
    Paragraph,
    Span,
    Text,
    Anchor,
    Image,
    Table,
    /// `tbody`, `thead`, `tfoot`.
    TableBody,
    TableRow,
    /// `td`, `th`.
    TableCell,
    UnorderedList,
    OrderedList,
    ListItem,
    Comment,
    /// Anything else, carrying the tag name for diagnostics.
    Other(String),
}

impl NodeKind {
    /// Classify the node `id` of `dom`.
    pub fn of(dom: &Dom, id: NodeId) -> NodeKind {
        let Some(node) = dom.get(id) else {
            return NodeKind::Other(String::new());
        };
        match &node.data {
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Document => NodeKind::Other("#document".to_string()),
            NodeData::Element { name, .. } => Self::from_tag(name.local.as_ref()),
        }
    }

    /// Map an element tag name to its kind.
    pub fn from_tag(tag: &str) -> NodeKind {
        match tag {
            "p" => NodeKind::Paragraph,
            "span" => NodeKind::Span,
            "a" => NodeKind::Anchor,
            "img" => NodeKind::Image,
            "table" => NodeKind::Table,
            "tbody" | "thead" | "tfoot" => NodeKind::TableBody,
            "tr" => NodeKind::TableRow,
            "td" | "th" => NodeKind::TableCell,
            "ul" => NodeKind::UnorderedList,
            "ol" => NodeKind::OrderedList,
            "li" => NodeKind::ListItem,
            _ => match heading_level(tag) {
                Some(level) => NodeKind::Heading(level),
                None => NodeKind::Other(tag.to_string()),
            },
        }
    }
}

/// Level of an `h1`..`h9` tag.
fn heading_level(tag: &str) -> Option<u8> {
    let digits = tag.strip_prefix('h')?;
    match digits.as_bytes() {
        [d @ b'1'..=b'9'] => Some(d - b'0'),
        _ => None,
    }
}
