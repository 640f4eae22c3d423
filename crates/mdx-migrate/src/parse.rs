//! Markdown parsing
//!
//! Parses a document body with comrak (CommonMark, no extensions) and
//! converts comrak's arena tree into the owned [`Node`] tree.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};
use mdx_migrate_core::Node;

use crate::{MigrateError, Result};

/// Parse a document body into a root node.
///
/// Parsing is lenient: any text produces a tree. It only fails when comrak
/// yields a construct the tree cannot represent.
///
/// # Example
///
/// ```rust
/// use mdx_migrate::parse;
/// use mdx_migrate_core::Node;
///
/// let root = parse("Hello *world*").unwrap();
/// assert_eq!(
///     root,
///     Node::Root(vec![Node::Paragraph(vec![
///         Node::text("Hello "),
///         Node::Emphasis(vec![Node::text("world")]),
///     ])])
/// );
/// ```
pub fn parse(text: &str) -> Result<Node> {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, text, &options);

    Ok(Node::Root(convert_flow(root)?))
}

fn convert_flow<'a>(parent: &'a AstNode<'a>) -> Result<Vec<Node>> {
    parent.children().map(convert_block).collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>) -> Result<Node> {
    let data = node.data.borrow();

    let block = match &data.value {
        NodeValue::Paragraph => Node::Paragraph(convert_phrasing(node)?),

        NodeValue::Heading(heading) => Node::Heading {
            depth: heading.level,
            children: convert_phrasing(node)?,
        },

        NodeValue::BlockQuote => Node::Blockquote(convert_flow(node)?),

        NodeValue::List(list) => {
            let spread = !list.tight;
            let children = node
                .children()
                .map(|item| convert_item(item, spread))
                .collect::<Result<Vec<_>>>()?;

            Node::List {
                ordered: matches!(list.list_type, ListType::Ordered),
                start: u32::try_from(list.start).unwrap_or(1),
                spread,
                children,
            }
        }

        NodeValue::CodeBlock(code) => {
            let (lang, meta) = split_info(&code.info);
            Node::Code {
                lang,
                meta,
                value: strip_final_line_ending(&code.literal).to_string(),
            }
        }

        NodeValue::HtmlBlock(html) => Node::Html(html.literal.trim_end_matches(['\n', '\r']).to_string()),

        NodeValue::ThematicBreak => Node::ThematicBreak,

        other => return Err(unsupported(other)),
    };

    Ok(block)
}

fn convert_item<'a>(node: &'a AstNode<'a>, spread: bool) -> Result<Node> {
    let data = node.data.borrow();

    match &data.value {
        NodeValue::Item(_) => Ok(Node::ListItem {
            spread,
            children: convert_flow(node)?,
        }),
        other => Err(unsupported(other)),
    }
}

fn convert_phrasing<'a>(parent: &'a AstNode<'a>) -> Result<Vec<Node>> {
    let mut inlines = Vec::new();
    for child in parent.children() {
        convert_inline(child, &mut inlines)?;
    }
    Ok(inlines)
}

fn convert_inline<'a>(node: &'a AstNode<'a>, out: &mut Vec<Node>) -> Result<()> {
    let data = node.data.borrow();

    match &data.value {
        NodeValue::Text(text) => push_text(out, text),

        // Soft breaks stay inside the surrounding text, as line endings
        NodeValue::SoftBreak => push_text(out, "\n"),

        NodeValue::LineBreak => out.push(Node::Break),

        NodeValue::Code(code) => out.push(Node::InlineCode(code.literal.clone())),

        NodeValue::HtmlInline(html) => out.push(Node::Html(html.clone())),

        NodeValue::Emph => out.push(Node::Emphasis(convert_phrasing(node)?)),

        NodeValue::Strong => out.push(Node::Strong(convert_phrasing(node)?)),

        NodeValue::Link(link) => out.push(Node::Link {
            url: link.url.clone(),
            title: non_empty(&link.title),
            children: convert_phrasing(node)?,
        }),

        NodeValue::Image(link) => out.push(Node::Image {
            url: link.url.clone(),
            title: non_empty(&link.title),
            alt: plain_text(node),
        }),

        other => return Err(unsupported(other)),
    }

    Ok(())
}

/// Append text, merging with a preceding text node
fn push_text(out: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(previous)) = out.last_mut() {
        previous.push_str(text);
    } else {
        out.push(Node::text(text));
    }
}

/// Text content of a node's descendants, as used for image alt text
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(value) | NodeValue::HtmlInline(value) => text.push_str(value),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push('\n'),
            _ => text.push_str(&plain_text(child)),
        }
    }
    text
}

/// Split a fenced code info string into language and meta
fn split_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (non_empty(lang), non_empty(meta.trim_start())),
        None => (non_empty(info), None),
    }
}

fn strip_final_line_ending(value: &str) -> &str {
    value
        .strip_suffix("\r\n")
        .or_else(|| value.strip_suffix('\n'))
        .unwrap_or(value)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn unsupported(value: &NodeValue) -> MigrateError {
    MigrateError::Parse(format!(
        "unsupported markdown construct `{}`",
        construct_name(value)
    ))
}

fn construct_name(value: &NodeValue) -> &'static str {
    match value {
        NodeValue::Document => "document",
        NodeValue::BlockQuote => "block_quote",
        NodeValue::List(_) => "list",
        NodeValue::Item(_) => "item",
        NodeValue::CodeBlock(_) => "code_block",
        NodeValue::HtmlBlock(_) => "html_block",
        NodeValue::Paragraph => "paragraph",
        NodeValue::Heading(_) => "heading",
        NodeValue::ThematicBreak => "thematic_break",
        NodeValue::Text(_) => "text",
        NodeValue::SoftBreak => "softbreak",
        NodeValue::LineBreak => "linebreak",
        NodeValue::Code(_) => "code",
        NodeValue::HtmlInline(_) => "html_inline",
        NodeValue::Emph => "emph",
        NodeValue::Strong => "strong",
        NodeValue::Link(_) => "link",
        NodeValue::Image(_) => "image",
        _ => "extension",
    }
}
