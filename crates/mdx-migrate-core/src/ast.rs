//! Markdown Abstract Syntax Tree
//!
//! This module defines the AST nodes produced by the parser and consumed by
//! the serializer. The shape follows mdast: containers own their children,
//! leaves own their literal value, and nothing is shared.

use std::fmt;

/// A Markdown node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root document container
    Root(Vec<Node>),

    /// Paragraph containing phrasing content
    Paragraph(Vec<Node>),

    /// ATX heading with depth (1-6) and phrasing content
    Heading { depth: u8, children: Vec<Node> },

    /// Block quote containing flow content
    Blockquote(Vec<Node>),

    /// List (ordered or unordered) of `ListItem` nodes
    List {
        ordered: bool,
        start: u32,
        spread: bool,
        children: Vec<Node>,
    },

    /// A list item containing flow content
    ListItem { spread: bool, children: Vec<Node> },

    /// Code block (always written fenced)
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },

    /// Raw markup captured verbatim, either as a block or inline
    Html(String),

    /// Thematic break (horizontal rule)
    ThematicBreak,

    /// Plain text
    Text(String),

    /// Emphasis (italic)
    Emphasis(Vec<Node>),

    /// Strong emphasis (bold)
    Strong(Vec<Node>),

    /// Inline code
    InlineCode(String),

    /// Hard line break
    Break,

    /// Link with content, URL, and optional title
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Node>,
    },

    /// Image with alt text, URL, and optional title
    Image {
        url: String,
        title: Option<String>,
        alt: String,
    },
}

/// The tag of a [`Node`], used to key handlers and to report errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading,
    Blockquote,
    List,
    ListItem,
    Code,
    Html,
    ThematicBreak,
    Text,
    Emphasis,
    Strong,
    InlineCode,
    Break,
    Link,
    Image,
}

impl NodeKind {
    /// The mdast name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Blockquote => "blockquote",
            NodeKind::List => "list",
            NodeKind::ListItem => "listItem",
            NodeKind::Code => "code",
            NodeKind::Html => "html",
            NodeKind::ThematicBreak => "thematicBreak",
            NodeKind::Text => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::InlineCode => "inlineCode",
            NodeKind::Break => "break",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// Create a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Create a raw markup node
    pub fn html(value: impl Into<String>) -> Self {
        Node::Html(value.into())
    }

    /// Get the kind tag of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root(_) => NodeKind::Root,
            Node::Paragraph(_) => NodeKind::Paragraph,
            Node::Heading { .. } => NodeKind::Heading,
            Node::Blockquote(_) => NodeKind::Blockquote,
            Node::List { .. } => NodeKind::List,
            Node::ListItem { .. } => NodeKind::ListItem,
            Node::Code { .. } => NodeKind::Code,
            Node::Html(_) => NodeKind::Html,
            Node::ThematicBreak => NodeKind::ThematicBreak,
            Node::Text(_) => NodeKind::Text,
            Node::Emphasis(_) => NodeKind::Emphasis,
            Node::Strong(_) => NodeKind::Strong,
            Node::InlineCode(_) => NodeKind::InlineCode,
            Node::Break => NodeKind::Break,
            Node::Link { .. } => NodeKind::Link,
            Node::Image { .. } => NodeKind::Image,
        }
    }

    /// Children of a container node, `None` for leaves
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(children)
            | Node::Paragraph(children)
            | Node::Blockquote(children)
            | Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Heading { children, .. }
            | Node::List { children, .. }
            | Node::ListItem { children, .. }
            | Node::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Literal value of a leaf node, `None` for containers
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Text(value)
            | Node::Html(value)
            | Node::InlineCode(value)
            | Node::Code { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Whether this node may appear inside phrasing (inline) content
    pub fn is_phrasing(&self) -> bool {
        matches!(
            self,
            Node::Text(_)
                | Node::Html(_)
                | Node::Emphasis(_)
                | Node::Strong(_)
                | Node::InlineCode(_)
                | Node::Break
                | Node::Link { .. }
                | Node::Image { .. }
        )
    }

    /// Whether this node may appear inside flow (block) content
    pub fn is_flow(&self) -> bool {
        matches!(
            self,
            Node::Paragraph(_)
                | Node::Heading { .. }
                | Node::Blockquote(_)
                | Node::List { .. }
                | Node::Code { .. }
                | Node::Html(_)
                | Node::ThematicBreak
        )
    }
}
