//! Serializer constructs and the context stack
//!
//! The stack records which constructs enclose the node being written. It is
//! owned by a single serialization pass and never outlives it.

/// A serializer scope that unsafe rules and handlers can be keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    Paragraph,
    Phrasing,
    HeadingAtx,
    Blockquote,
    List,
    ListItem,
    Emphasis,
    Strong,
    Link,
    Autolink,
    Image,
    Label,
    DestinationLiteral,
    DestinationRaw,
    TitleQuote,
    CodeFenced,
    CodeFencedLangGraveAccent,
    CodeFencedLangTilde,
    CodeFencedMetaGraveAccent,
    CodeFencedMetaTilde,
}

/// Constructs whose content is taken literally by a parser, so phrasing
/// escapes do not apply inside them.
pub const FULL_PHRASING_SPANS: &[Construct] = &[
    Construct::Autolink,
    Construct::DestinationLiteral,
    Construct::DestinationRaw,
    Construct::TitleQuote,
];

/// Ancestor constructs of the node currently being serialized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStack {
    entries: Vec<Construct>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, construct: Construct) {
        self.entries.push(construct);
    }

    pub fn pop(&mut self) -> Option<Construct> {
        self.entries.pop()
    }

    /// The nearest enclosing construct
    pub fn current(&self) -> Option<Construct> {
        self.entries.last().copied()
    }

    /// Whether `construct` encloses the current node at any depth
    pub fn contains(&self, construct: Construct) -> bool {
        self.entries.contains(&construct)
    }

    /// Whether any of `constructs` encloses the current node.
    ///
    /// An empty list yields `none`, which lets the same check serve both
    /// "in construct" (empty means everywhere) and "not in construct" (empty
    /// means nowhere).
    pub fn any_of(&self, constructs: &[Construct], none: bool) -> bool {
        if constructs.is_empty() {
            return none;
        }
        constructs.iter().any(|c| self.contains(*c))
    }
}
