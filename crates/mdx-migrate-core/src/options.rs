//! Configuration options for Markdown serialization

use crate::unsafe_rules::{default_unsafe_rules, UnsafeRule};

/// How list item content is indented after the bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListItemIndent {
    /// Bullet width plus one space
    #[default]
    One,
    /// Bullet width plus one, rounded up to the next tab stop (4)
    Tab,
    /// `Tab` for spread lists, `One` for tight lists
    Mixed,
}

/// Options for Markdown serialization
#[derive(Debug, Clone)]
pub struct Options {
    /// Marker for unordered list items
    pub bullet: char,

    /// Marker for an unordered list directly following another one
    pub bullet_other: char,

    /// Delimiter after the number of ordered list items
    pub bullet_ordered: char,

    /// Emphasis delimiter
    pub emphasis: char,

    /// Strong delimiter (written twice)
    pub strong: char,

    /// Indentation of list item content
    pub list_item_indent: ListItemIndent,

    /// Number ordered items incrementally instead of repeating the start
    pub increment_list_marker: bool,

    /// Thematic break marker
    pub rule: char,

    /// How many markers make up a thematic break
    pub rule_repetition: usize,

    /// Separate thematic break markers with spaces
    pub rule_spaces: bool,

    /// Always write `[text](url)`, never the `<url>` autolink form
    pub resource_link: bool,

    /// Fence character for code blocks
    pub fence: char,

    /// Characters the serializer escapes in given contexts
    pub unsafe_rules: Vec<UnsafeRule>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bullet: '*',
            bullet_other: '-',
            bullet_ordered: '.',
            emphasis: '*',
            strong: '*',
            list_item_indent: ListItemIndent::One,
            increment_list_marker: true,
            rule: '*',
            rule_repetition: 3,
            rule_spaces: false,
            resource_link: false,
            fence: '`',
            unsafe_rules: default_unsafe_rules(),
        }
    }
}

impl Options {
    /// The ordered delimiter used for a list directly following another one
    pub fn bullet_ordered_other(&self) -> char {
        if self.bullet_ordered == '.' {
            ')'
        } else {
            '.'
        }
    }

    /// The thematic break string
    pub fn thematic_break(&self) -> String {
        let marker = self.rule.to_string();
        let separator = if self.rule_spaces { " " } else { "" };
        vec![marker; self.rule_repetition.max(3)].join(separator)
    }
}
