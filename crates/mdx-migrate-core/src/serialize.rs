//! Markdown AST serialization
//!
//! Converts AST nodes into Markdown text. Every node goes through
//! [`State::handle`], which consults the registered [`Handlers`] before
//! falling back to the default rendering of that node kind.

use std::fmt;

use indexmap::IndexMap;

use crate::ast::{Node, NodeKind};
use crate::context::{Construct, ContextStack};
use crate::options::{ListItemIndent, Options};
use crate::safe::safe;
use crate::unsafe_rules::{compile_rules, CompiledRule};
use crate::{Result, SerializeError};

/// A node handler: renders a node given the serializer state and the
/// characters surrounding it in the output
pub type Handle = Box<dyn for<'s> Fn(&Node, &mut State<'s>, Info) -> Result<String> + Send + Sync>;

/// Handlers overriding the default rendering of node kinds
#[derive(Default)]
pub struct Handlers {
    handles: IndexMap<NodeKind, Handle>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any previous one for `kind`
    pub fn add<F>(&mut self, kind: NodeKind, handle: F) -> &mut Self
    where
        F: for<'s> Fn(&Node, &mut State<'s>, Info) -> Result<String> + Send + Sync + 'static,
    {
        self.handles.insert(kind, Box::new(handle));
        self
    }

    pub fn get(&self, kind: NodeKind) -> Option<&Handle> {
        self.handles.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.handles.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

/// Characters written right before and right after a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Info {
    pub before: Option<char>,
    pub after: Option<char>,
}

impl Info {
    pub fn new(before: Option<char>, after: Option<char>) -> Self {
        Self { before, after }
    }

    /// A node written on its own lines
    pub fn flow() -> Self {
        Self::new(Some('\n'), Some('\n'))
    }
}

/// A configured serializer: options, compiled unsafe rules and handlers
#[derive(Debug)]
pub struct Serializer {
    options: Options,
    rules: Vec<CompiledRule>,
    handlers: Handlers,
}

impl Serializer {
    /// Create a serializer with the default rendering for every node kind
    pub fn new(options: Options) -> Result<Self> {
        Self::with_handlers(options, Handlers::new())
    }

    pub fn with_handlers(options: Options, handlers: Handlers) -> Result<Self> {
        let rules = compile_rules(&options.unsafe_rules)?;
        Ok(Self {
            options,
            rules,
            handlers,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Serialize a tree. The result ends with a line ending unless empty.
    pub fn serialize(&self, node: &Node) -> Result<String> {
        let mut state = State::new(&self.options, &self.rules, &self.handlers);
        let mut output = state.handle(node, Info::flow())?;

        if !output.is_empty() && !output.ends_with(['\n', '\r']) {
            output.push('\n');
        }
        Ok(output)
    }
}

/// Serialize a tree with `options` and no handler overrides
pub fn serialize(node: &Node, options: &Options) -> Result<String> {
    Serializer::new(options.clone())?.serialize(node)
}

#[derive(Debug, Clone, Copy)]
struct ListContext {
    ordered: bool,
    start: u32,
    spread: bool,
    bullet: char,
    index: usize,
}

/// Per-call serialization state. Created fresh for every
/// [`Serializer::serialize`] call and dropped with it.
pub struct State<'a> {
    options: &'a Options,
    rules: &'a [CompiledRule],
    handlers: &'a Handlers,
    stack: ContextStack,
    list: Option<ListContext>,
    bullet_last_used: Option<char>,
}

impl<'a> State<'a> {
    fn new(options: &'a Options, rules: &'a [CompiledRule], handlers: &'a Handlers) -> Self {
        Self {
            options,
            rules,
            handlers,
            stack: ContextStack::new(),
            list: None,
            bullet_last_used: None,
        }
    }

    pub fn options(&self) -> &Options {
        self.options
    }

    pub fn stack(&self) -> &ContextStack {
        &self.stack
    }

    /// Run `f` with `construct` pushed on the context stack
    pub fn within<T>(&mut self, construct: Construct, f: impl FnOnce(&mut Self) -> T) -> T {
        self.stack.push(construct);
        let result = f(self);
        self.stack.pop();
        result
    }

    /// Escape `value` for the current context
    pub fn safe(&self, value: &str, info: Info) -> String {
        safe(self.rules, &self.stack, value, info.before, info.after, &[])
    }

    fn safe_encoded(&self, value: &str, info: Info, encode: &[char]) -> String {
        safe(self.rules, &self.stack, value, info.before, info.after, encode)
    }

    /// Render a node through its registered handler, or the default one
    pub fn handle(&mut self, node: &Node, info: Info) -> Result<String> {
        let handlers = self.handlers;
        match handlers.get(node.kind()) {
            Some(handle) => handle(node, self, info),
            None => self.handle_default(node, info),
        }
    }

    /// Render a node the way it is rendered without handler overrides
    pub fn handle_default(&mut self, node: &Node, info: Info) -> Result<String> {
        match node {
            Node::Root(children) => self.container_flow(children, None),

            Node::Paragraph(children) => self.within(Construct::Paragraph, |s| {
                s.within(Construct::Phrasing, |s| s.container_phrasing(children, info))
            }),

            Node::Heading { depth, children } => self.heading(*depth, children),

            Node::Blockquote(children) => {
                let value = self.within(Construct::Blockquote, |s| s.container_flow(children, None))?;
                Ok(indent_lines(&value, |line, _, blank| {
                    if blank {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                }))
            }

            Node::List {
                ordered,
                start,
                spread,
                children,
            } => self.list(*ordered, *start, *spread, children),

            Node::ListItem { spread, children } => self.list_item(*spread, children),

            Node::Code { lang, meta, value } => Ok(self.code(lang.as_deref(), meta.as_deref(), value)),

            Node::Html(value) => Ok(value.clone()),

            Node::ThematicBreak => Ok(self.options.thematic_break()),

            Node::Text(value) => Ok(self.safe(value, info)),

            Node::Emphasis(children) => {
                let marker = self.options.emphasis;
                let value = self.within(Construct::Emphasis, |s| {
                    s.container_phrasing(children, Info::new(Some(marker), Some(marker)))
                })?;
                Ok(format!("{marker}{value}{marker}"))
            }

            Node::Strong(children) => {
                let marker = self.options.strong;
                let value = self.within(Construct::Strong, |s| {
                    s.container_phrasing(children, Info::new(Some(marker), Some(marker)))
                })?;
                Ok(format!("{marker}{marker}{value}{marker}{marker}"))
            }

            Node::InlineCode(value) => Ok(inline_code(value)),

            Node::Break => Ok(self.hard_break(info)),

            Node::Link {
                url,
                title,
                children,
            } => self.link(url, title.as_deref(), children),

            Node::Image { url, title, alt } => Ok(self.image(url, title.as_deref(), alt)),
        }
    }

    /// Serialize flow children, separated by blank lines (or single line
    /// endings inside tight lists)
    fn container_flow(&mut self, children: &[Node], spread: Option<bool>) -> Result<String> {
        let mut out = String::new();

        for (index, child) in children.iter().enumerate() {
            if !child.is_flow() {
                return Err(SerializeError::Invariant {
                    kind: child.kind(),
                    context: "flow content",
                });
            }
            if !matches!(child, Node::List { .. }) {
                self.bullet_last_used = None;
            }

            out.push_str(&self.handle(child, Info::flow())?);

            if let Some(next) = children.get(index + 1) {
                out.push_str(join(child, next, spread));
            }
        }

        Ok(out)
    }

    /// Serialize phrasing children, tracking the neighbouring characters so
    /// escapes can take them into account
    fn container_phrasing(&mut self, children: &[Node], info: Info) -> Result<String> {
        let mut results: Vec<String> = Vec::with_capacity(children.len());
        let mut before = info.before;

        for (index, child) in children.iter().enumerate() {
            if !child.is_phrasing() {
                return Err(SerializeError::Invariant {
                    kind: child.kind(),
                    context: "phrasing content",
                });
            }

            let after = match children.get(index + 1) {
                Some(next) => self.peek(next),
                None => info.after,
            };

            // Raw markup right after a line ending would be read as a block;
            // turn that line ending into a space.
            if matches!(child, Node::Html(_)) && matches!(before, Some('\n' | '\r')) {
                if let Some(last) = results.last_mut() {
                    let trimmed = last.trim_end_matches(['\n', '\r']).len();
                    last.truncate(trimmed);
                    last.push(' ');
                    before = Some(' ');
                }
            }

            let value = self.handle(child, Info::new(before, after))?;
            before = value.chars().last();
            results.push(value);
        }

        Ok(results.concat())
    }

    /// First character a phrasing node will produce
    fn peek(&self, node: &Node) -> Option<char> {
        match node {
            Node::Text(value) => value.chars().next(),
            Node::Emphasis(_) => Some(self.options.emphasis),
            Node::Strong(_) => Some(self.options.strong),
            Node::InlineCode(_) => Some('`'),
            Node::Html(_) => Some('<'),
            Node::Break => Some('\\'),
            Node::Image { .. } => Some('!'),
            Node::Link {
                url,
                title,
                children,
            } if self.is_autolink(url, title.as_deref(), children) => Some('<'),
            Node::Link { .. } => Some('['),
            _ => None,
        }
    }

    fn heading(&mut self, depth: u8, children: &[Node]) -> Result<String> {
        let sequence = "#".repeat(usize::from(depth.clamp(1, 6)));

        let mut value = self.within(Construct::HeadingAtx, |s| {
            s.within(Construct::Phrasing, |s| {
                s.container_phrasing(children, Info::new(Some(' '), Some('\n')))
            })
        })?;

        // Leading whitespace would be eaten by the heading sequence
        if let Some(first) = value.chars().next().filter(|c| matches!(c, ' ' | '\t')) {
            value = format!("&#x{:X};{}", u32::from(first), &value[first.len_utf8()..]);
        }

        if value.is_empty() {
            Ok(sequence)
        } else {
            Ok(format!("{sequence} {value}"))
        }
    }

    fn list(&mut self, ordered: bool, start: u32, spread: bool, children: &[Node]) -> Result<String> {
        let mut bullet = if ordered {
            self.options.bullet_ordered
        } else {
            self.options.bullet
        };
        // Two adjacent lists with the same marker would merge into one
        if self.bullet_last_used == Some(bullet) {
            bullet = if ordered {
                self.options.bullet_ordered_other()
            } else {
                self.options.bullet_other
            };
        }

        let previous = self.list;
        let mut out = String::new();

        for (index, item) in children.iter().enumerate() {
            if !matches!(item, Node::ListItem { .. }) {
                return Err(SerializeError::Invariant {
                    kind: item.kind(),
                    context: "a list",
                });
            }

            self.list = Some(ListContext {
                ordered,
                start,
                spread,
                bullet,
                index,
            });
            let value = self.within(Construct::List, |s| s.handle(item, Info::flow()))?;
            out.push_str(&value);

            if index + 1 < children.len() {
                out.push_str(if spread { "\n\n" } else { "\n" });
            }
        }

        self.list = previous;
        self.bullet_last_used = Some(bullet);
        Ok(out)
    }

    fn list_item(&mut self, spread: bool, children: &[Node]) -> Result<String> {
        let context = self.list.ok_or(SerializeError::Invariant {
            kind: NodeKind::ListItem,
            context: "content outside a list",
        })?;

        let bullet = if context.ordered {
            let offset = if self.options.increment_list_marker {
                u32::try_from(context.index).unwrap_or(u32::MAX)
            } else {
                0
            };
            format!("{}{}", context.start.saturating_add(offset), context.bullet)
        } else {
            context.bullet.to_string()
        };

        let mut size = bullet.len() + 1;
        let tab_stop = match self.options.list_item_indent {
            ListItemIndent::One => false,
            ListItemIndent::Tab => true,
            ListItemIndent::Mixed => context.spread || spread,
        };
        if tab_stop {
            size = size.div_ceil(4) * 4;
        }

        // Nested lists read their own context; this item's is done
        self.list = None;
        let value = self.within(Construct::ListItem, |s| s.container_flow(children, Some(spread)));
        self.list = Some(context);
        let value = value?;

        let padding = " ".repeat(size - bullet.len());
        let indent = " ".repeat(size);
        Ok(indent_lines(&value, |line, index, blank| match (index, blank) {
            (0, true) => bullet.clone(),
            (0, false) => format!("{bullet}{padding}{line}"),
            (_, true) => String::new(),
            (_, false) => format!("{indent}{line}"),
        }))
    }

    fn code(&mut self, lang: Option<&str>, meta: Option<&str>, value: &str) -> String {
        let marker = self.options.fence;
        let sequence = marker
            .to_string()
            .repeat((longest_streak(value, marker) + 1).max(3));
        let (lang_construct, meta_construct) = if marker == '`' {
            (
                Construct::CodeFencedLangGraveAccent,
                Construct::CodeFencedMetaGraveAccent,
            )
        } else {
            (Construct::CodeFencedLangTilde, Construct::CodeFencedMetaTilde)
        };

        self.within(Construct::CodeFenced, |s| {
            let mut out = sequence.clone();

            if let Some(lang) = lang.filter(|l| !l.is_empty()) {
                let info = Info::new(Some(marker), Some(' '));
                out.push_str(&s.within(lang_construct, |s| s.safe_encoded(lang, info, &['`'])));

                if let Some(meta) = meta.filter(|m| !m.is_empty()) {
                    let info = Info::new(Some(' '), Some('\n'));
                    out.push(' ');
                    out.push_str(&s.within(meta_construct, |s| s.safe_encoded(meta, info, &['`'])));
                }
            }

            out.push('\n');
            if !value.is_empty() {
                out.push_str(value);
                out.push('\n');
            }
            out.push_str(&sequence);
            out
        })
    }

    fn hard_break(&self, info: Info) -> String {
        let line_ending_unsafe = self
            .rules
            .iter()
            .any(|c| c.rule.character == '\n' && c.rule.in_scope(&self.stack));

        if line_ending_unsafe {
            if matches!(info.before, Some(' ' | '\t')) {
                String::new()
            } else {
                " ".to_string()
            }
        } else {
            "\\\n".to_string()
        }
    }

    fn is_autolink(&self, url: &str, title: Option<&str>, children: &[Node]) -> bool {
        if self.options.resource_link || url.is_empty() || title.is_some() {
            return false;
        }
        let [Node::Text(text)] = children else {
            return false;
        };

        (text == url || format!("mailto:{text}") == url)
            && has_scheme(url)
            && !url.chars().any(|c| c <= ' ' || matches!(c, '<' | '>' | '\u{7f}'))
    }

    fn link(&mut self, url: &str, title: Option<&str>, children: &[Node]) -> Result<String> {
        if self.is_autolink(url, title, children) {
            let value = self.within(Construct::Autolink, |s| {
                s.container_phrasing(children, Info::new(Some('<'), Some('>')))
            })?;
            return Ok(format!("<{value}>"));
        }

        self.within(Construct::Link, |s| {
            let label = s.within(Construct::Label, |s| {
                s.container_phrasing(children, Info::new(Some('['), Some(']')))
            })?;
            let destination = s.destination(url, title);
            Ok(format!("[{label}]({destination})"))
        })
    }

    fn image(&mut self, url: &str, title: Option<&str>, alt: &str) -> String {
        self.within(Construct::Image, |s| {
            let alt = s.within(Construct::Label, |s| s.safe(alt, Info::new(Some('['), Some(']'))));
            let destination = s.destination(url, title);
            format!("![{alt}]({destination})")
        })
    }

    /// The part of a link or image between the parentheses
    fn destination(&mut self, url: &str, title: Option<&str>) -> String {
        let literal = (url.is_empty() && title.is_some())
            || url.chars().any(|c| c <= ' ' || c == '\u{7f}');

        let mut out = if literal {
            self.within(Construct::DestinationLiteral, |s| {
                format!("<{}>", s.safe(url, Info::new(Some('<'), Some('>'))))
            })
        } else {
            let after = if title.is_some() { ' ' } else { ')' };
            self.within(Construct::DestinationRaw, |s| {
                s.safe(url, Info::new(Some('('), Some(after)))
            })
        };

        if let Some(title) = title {
            let title = self.within(Construct::TitleQuote, |s| {
                s.safe(title, Info::new(Some('"'), Some('"')))
            });
            out.push_str(&format!(" \"{title}\""));
        }

        out
    }
}

/// What goes between two adjacent flow nodes
fn join(left: &Node, right: &Node, spread: Option<bool>) -> &'static str {
    match spread {
        Some(_) if matches!((left, right), (Node::Paragraph(_), Node::Paragraph(_))) => "\n\n",
        Some(false) => "\n",
        _ => "\n\n",
    }
}

/// Map every line of `value`; the closure gets the line, its index and
/// whether it is blank
fn indent_lines(value: &str, map: impl Fn(&str, usize, bool) -> String) -> String {
    value
        .split('\n')
        .enumerate()
        .map(|(index, line)| map(line, index, line.is_empty()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Length of the longest run of `marker` in `value`
fn longest_streak(value: &str, marker: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in value.chars() {
        if c == marker {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Whether `value` contains a run of exactly `size` backticks
fn has_backtick_run(value: &str, size: usize) -> bool {
    value
        .split(|c: char| c != '`')
        .any(|run| run.len() == size)
}

fn inline_code(value: &str) -> String {
    let mut size = 1;
    while has_backtick_run(value, size) {
        size += 1;
    }
    let sequence = "`".repeat(size);

    let is_line_space = |c: char| matches!(c, ' ' | '\r' | '\n');
    let pad = value.chars().any(|c| !is_line_space(c))
        && ((value.starts_with(is_line_space) && value.ends_with(is_line_space))
            || value.starts_with('`')
            || value.ends_with('`'));

    if pad {
        format!("{sequence} {value} {sequence}")
    } else {
        format!("{sequence}{value}{sequence}")
    }
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme.len() >= 2
        && chars.all(|c| c.is_ascii_alphabetic() || matches!(c, '+' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_options() -> Options {
        Options::default()
    }

    fn render(node: &Node) -> String {
        serialize(node, &default_options()).unwrap()
    }

    fn paragraph(children: Vec<Node>) -> Node {
        Node::Root(vec![Node::Paragraph(children)])
    }

    #[test]
    fn test_paragraph() {
        let root = paragraph(vec![Node::text("Hello World")]);
        assert_eq!(render(&root), "Hello World\n");
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(render(&Node::Root(vec![])), "");
    }

    #[test]
    fn test_heading_atx() {
        let root = Node::Root(vec![Node::Heading {
            depth: 3,
            children: vec![Node::text("Section")],
        }]);
        assert_eq!(render(&root), "### Section\n");
    }

    #[test]
    fn test_heading_trailing_hash_escaped() {
        let root = Node::Root(vec![Node::Heading {
            depth: 2,
            children: vec![Node::text("C#")],
        }]);
        assert_eq!(render(&root), "## C\\#\n");
    }

    #[test]
    fn test_strong_and_emphasis() {
        let root = paragraph(vec![
            Node::Strong(vec![Node::text("bold")]),
            Node::text(" and "),
            Node::Emphasis(vec![Node::text("italic")]),
        ]);
        assert_eq!(render(&root), "**bold** and *italic*\n");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(inline_code("code"), "`code`");
        assert_eq!(inline_code("a ` b"), "``a ` b``");
        assert_eq!(inline_code("`tick"), "`` `tick ``");
        assert_eq!(inline_code("  "), "`  `");
    }

    #[test]
    fn test_link_and_image() {
        let root = paragraph(vec![
            Node::Link {
                url: "https://example.com".to_string(),
                title: Some("Home".to_string()),
                children: vec![Node::text("Example")],
            },
            Node::text(" "),
            Node::Image {
                url: "image.png".to_string(),
                title: None,
                alt: "Alt text".to_string(),
            },
        ]);
        assert_eq!(
            render(&root),
            "[Example](https://example.com \"Home\") ![Alt text](image.png)\n"
        );
    }

    #[test]
    fn test_autolink_unless_resource_link() {
        let root = paragraph(vec![Node::Link {
            url: "https://example.com".to_string(),
            title: None,
            children: vec![Node::text("https://example.com")],
        }]);
        assert_eq!(render(&root), "<https://example.com>\n");

        let mut options = default_options();
        options.resource_link = true;
        assert_eq!(
            serialize(&root, &options).unwrap(),
            "[https://example.com](https://example.com)\n"
        );
    }

    #[test]
    fn test_destination_with_space_is_literal() {
        let root = paragraph(vec![Node::Link {
            url: "my file.md".to_string(),
            title: None,
            children: vec![Node::text("file")],
        }]);
        assert_eq!(render(&root), "[file](<my file.md>)\n");
    }

    #[test]
    fn test_code_block_fenced() {
        let root = Node::Root(vec![Node::Code {
            lang: Some("rust".to_string()),
            meta: Some("title=main.rs".to_string()),
            value: "let x = 1;".to_string(),
        }]);
        assert_eq!(render(&root), "```rust title=main.rs\nlet x = 1;\n```\n");
    }

    #[test]
    fn test_code_block_longer_fence() {
        let root = Node::Root(vec![Node::Code {
            lang: None,
            meta: None,
            value: "````\nnested\n````".to_string(),
        }]);
        assert_eq!(render(&root), "`````\n````\nnested\n````\n`````\n");
    }

    #[test]
    fn test_blockquote() {
        let root = Node::Root(vec![Node::Blockquote(vec![
            Node::Paragraph(vec![Node::text("Quote")]),
            Node::Paragraph(vec![Node::text("More")]),
        ])]);
        assert_eq!(render(&root), "> Quote\n>\n> More\n");
    }

    fn item(text: &str) -> Node {
        Node::ListItem {
            spread: false,
            children: vec![Node::Paragraph(vec![Node::text(text)])],
        }
    }

    #[test]
    fn test_unordered_list() {
        let root = Node::Root(vec![Node::List {
            ordered: false,
            start: 1,
            spread: false,
            children: vec![item("One"), item("Two")],
        }]);
        assert_eq!(render(&root), "* One\n* Two\n");
    }

    #[test]
    fn test_ordered_list_increment() {
        let root = Node::Root(vec![Node::List {
            ordered: true,
            start: 3,
            spread: false,
            children: vec![item("First"), item("Second")],
        }]);
        assert_eq!(render(&root), "3. First\n4. Second\n");

        let mut options = default_options();
        options.increment_list_marker = false;
        assert_eq!(serialize(&root, &options).unwrap(), "3. First\n3. Second\n");
    }

    #[test]
    fn test_nested_list_indent() {
        let nested = Node::List {
            ordered: false,
            start: 1,
            spread: false,
            children: vec![item("inner")],
        };
        let root = Node::Root(vec![Node::List {
            ordered: false,
            start: 1,
            spread: false,
            children: vec![Node::ListItem {
                spread: false,
                children: vec![Node::Paragraph(vec![Node::text("outer")]), nested],
            }],
        }]);
        assert_eq!(render(&root), "* outer\n  * inner\n");
    }

    #[test]
    fn test_tab_indent() {
        let mut options = default_options();
        options.list_item_indent = ListItemIndent::Tab;
        let root = Node::Root(vec![Node::List {
            ordered: false,
            start: 1,
            spread: false,
            children: vec![item("One")],
        }]);
        assert_eq!(serialize(&root, &options).unwrap(), "*   One\n");
    }

    #[test]
    fn test_adjacent_lists_switch_bullet() {
        let list = Node::List {
            ordered: false,
            start: 1,
            spread: false,
            children: vec![item("a")],
        };
        let root = Node::Root(vec![list.clone(), list]);
        assert_eq!(render(&root), "* a\n\n- a\n");
    }

    #[test]
    fn test_thematic_break() {
        assert_eq!(render(&Node::Root(vec![Node::ThematicBreak])), "***\n");
    }

    #[test]
    fn test_hard_break() {
        let root = paragraph(vec![Node::text("a"), Node::Break, Node::text("b")]);
        assert_eq!(render(&root), "a\\\nb\n");
    }

    #[test]
    fn test_html_after_line_ending_joins_line() {
        let root = paragraph(vec![
            Node::text("a\n"),
            Node::html("<br />"),
            Node::text("\n"),
            Node::html("<b>"),
        ]);
        assert_eq!(render(&root), "a <br /> <b>\n");
    }

    #[test]
    fn test_block_in_phrasing_is_an_error() {
        let root = paragraph(vec![Node::ThematicBreak]);
        let err = serialize(&root, &default_options()).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Invariant {
                kind: NodeKind::ThematicBreak,
                ..
            }
        ));
    }

    #[test]
    fn test_list_item_outside_list_is_an_error() {
        let root = Node::ListItem {
            spread: false,
            children: vec![],
        };
        let err = serialize(&root, &default_options()).unwrap_err();
        assert!(matches!(
            err,
            SerializeError::Invariant {
                kind: NodeKind::ListItem,
                ..
            }
        ));
    }

    #[test]
    fn test_handler_override() {
        let mut handlers = Handlers::new();
        handlers.add(NodeKind::Text, |node, _, _| {
            Ok(node.value().unwrap_or_default().to_uppercase())
        });
        let serializer = Serializer::with_handlers(default_options(), handlers).unwrap();
        let root = paragraph(vec![Node::text("shout")]);
        assert_eq!(serializer.serialize(&root).unwrap(), "SHOUT\n");
    }

    #[test]
    fn test_handler_sees_context_stack() {
        let mut handlers = Handlers::new();
        handlers.add(NodeKind::Text, |_, state, _| {
            Ok(format!("{:?}", state.stack().current()))
        });
        let serializer = Serializer::with_handlers(default_options(), handlers).unwrap();
        let root = paragraph(vec![Node::Strong(vec![Node::text("x")])]);
        assert_eq!(serializer.serialize(&root).unwrap(), "**Some(Strong)**\n");
    }
}
