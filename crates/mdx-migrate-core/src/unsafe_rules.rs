//! Unsafe-character rules
//!
//! A rule says: when `character` is about to be written literally, preceded
//! by `before` and followed by `after`, inside one of `in_construct`, escape
//! it. Rules are plain data; they are compiled to regexes once per
//! [`Serializer`](crate::Serializer).

use regex::Regex;

use crate::context::{Construct, ContextStack, FULL_PHRASING_SPANS};
use crate::SerializeError;

/// A declarative condition under which a character is escaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsafeRule {
    /// The character to escape
    pub character: char,
    /// Pattern that must match right before the character
    pub before: Option<String>,
    /// Pattern that must match right after the character
    pub after: Option<String>,
    /// The character must start a line (after optional spaces or tabs)
    pub at_break: bool,
    /// Constructs the rule applies in (empty: everywhere)
    pub in_construct: Vec<Construct>,
    /// Constructs the rule never applies in
    pub not_in_construct: Vec<Construct>,
}

impl UnsafeRule {
    pub fn new(character: char) -> Self {
        Self {
            character,
            before: None,
            after: None,
            at_break: false,
            in_construct: Vec::new(),
            not_in_construct: Vec::new(),
        }
    }

    pub fn before(mut self, pattern: &str) -> Self {
        self.before = Some(pattern.to_string());
        self
    }

    pub fn after(mut self, pattern: &str) -> Self {
        self.after = Some(pattern.to_string());
        self
    }

    pub fn at_break(mut self) -> Self {
        self.at_break = true;
        self
    }

    pub fn inside(mut self, constructs: &[Construct]) -> Self {
        self.in_construct = constructs.to_vec();
        self
    }

    pub fn outside(mut self, constructs: &[Construct]) -> Self {
        self.not_in_construct = constructs.to_vec();
        self
    }

    /// Whether the rule applies given the enclosing constructs
    pub fn in_scope(&self, stack: &ContextStack) -> bool {
        stack.any_of(&self.in_construct, true) && !stack.any_of(&self.not_in_construct, false)
    }

    fn has_before(&self) -> bool {
        self.at_break || self.before.is_some()
    }

    /// Compile into `(before)?char(?:after)?`, where the `before` group is
    /// present whenever the rule has a leading condition.
    pub(crate) fn compile(&self) -> Result<CompiledRule, SerializeError> {
        let mut pattern = String::new();

        if self.has_before() {
            pattern.push('(');
            if self.at_break {
                pattern.push_str(r"[\r\n][\t ]*");
            }
            if let Some(before) = &self.before {
                pattern.push_str("(?:");
                pattern.push_str(before);
                pattern.push(')');
            }
            pattern.push(')');
        }

        pattern.push_str(&regex::escape(&self.character.to_string()));

        if let Some(after) = &self.after {
            pattern.push_str("(?:");
            pattern.push_str(after);
            pattern.push(')');
        }

        let regex = Regex::new(&pattern).map_err(|source| SerializeError::InvalidRule {
            character: self.character,
            source,
        })?;

        Ok(CompiledRule {
            rule: self.clone(),
            regex,
        })
    }
}

/// An [`UnsafeRule`] with its regex built
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub(crate) rule: UnsafeRule,
    pub(crate) regex: Regex,
}

impl CompiledRule {
    pub fn rule(&self) -> &UnsafeRule {
        &self.rule
    }

    pub(crate) fn has_before(&self) -> bool {
        self.rule.has_before()
    }

    pub(crate) fn has_after(&self) -> bool {
        self.rule.after.is_some()
    }
}

/// Compile a rule set, failing on the first invalid pattern
pub fn compile_rules(rules: &[UnsafeRule]) -> Result<Vec<CompiledRule>, SerializeError> {
    rules.iter().map(UnsafeRule::compile).collect()
}

/// The escapes needed for serialized CommonMark to parse back to the same tree
pub fn default_unsafe_rules() -> Vec<UnsafeRule> {
    use Construct::*;

    let fenced_lang = [CodeFencedLangGraveAccent, CodeFencedLangTilde];
    let line_ending_sensitive = [
        CodeFencedLangGraveAccent,
        CodeFencedLangTilde,
        CodeFencedMetaGraveAccent,
        CodeFencedMetaTilde,
        DestinationLiteral,
        HeadingAtx,
    ];

    vec![
        UnsafeRule::new('\t').after(r"[\r\n]").inside(&[Phrasing]),
        UnsafeRule::new('\t').before(r"[\r\n]").inside(&[Phrasing]),
        UnsafeRule::new('\t').inside(&fenced_lang),
        UnsafeRule::new('\r').inside(&line_ending_sensitive),
        UnsafeRule::new('\n').inside(&line_ending_sensitive),
        UnsafeRule::new(' ').after(r"[\r\n]").inside(&[Phrasing]),
        UnsafeRule::new(' ').before(r"[\r\n]").inside(&[Phrasing]),
        UnsafeRule::new(' ').inside(&fenced_lang),
        UnsafeRule::new('!')
            .after(r"\[")
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new('"').inside(&[TitleQuote]),
        UnsafeRule::new('#').at_break(),
        UnsafeRule::new('#').after(r"[\r\n]|$").inside(&[HeadingAtx]),
        UnsafeRule::new('&').after("[#A-Za-z]").inside(&[Phrasing]),
        UnsafeRule::new('(').inside(&[DestinationRaw]),
        UnsafeRule::new('(')
            .before(r"\]")
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new(')').at_break().before("[0-9]+"),
        UnsafeRule::new(')').inside(&[DestinationRaw]),
        UnsafeRule::new('*').at_break().after(r"[ \t\r\n*]"),
        UnsafeRule::new('*')
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new('+').at_break().after(r"[ \t\r\n]"),
        UnsafeRule::new('-').at_break().after(r"[ \t\r\n-]"),
        UnsafeRule::new('.')
            .at_break()
            .before("[0-9]+")
            .after(r"[ \t\r\n]|$"),
        UnsafeRule::new('<').at_break().after("[!/?A-Za-z]"),
        UnsafeRule::new('<')
            .after("[!/?A-Za-z]")
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new('<').inside(&[DestinationLiteral]),
        UnsafeRule::new('=').at_break(),
        UnsafeRule::new('>').at_break(),
        UnsafeRule::new('>').inside(&[DestinationLiteral]),
        UnsafeRule::new('[').at_break(),
        UnsafeRule::new('[')
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new('[').inside(&[Label]),
        UnsafeRule::new('\\').after(r"[\r\n]").inside(&[Phrasing]),
        UnsafeRule::new(']').inside(&[Label]),
        UnsafeRule::new('_').at_break(),
        UnsafeRule::new('_')
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new('`').at_break(),
        UnsafeRule::new('`').inside(&[CodeFencedLangGraveAccent, CodeFencedMetaGraveAccent]),
        UnsafeRule::new('`')
            .inside(&[Phrasing])
            .outside(FULL_PHRASING_SPANS),
        UnsafeRule::new('~').at_break(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_compile() {
        let compiled = compile_rules(&default_unsafe_rules()).unwrap();
        assert_eq!(compiled.len(), default_unsafe_rules().len());
    }

    #[test]
    fn test_compiled_pattern_shape() {
        let rule = UnsafeRule::new('{').after("[a-zA-Z0-9]");
        let compiled = rule.compile().unwrap();
        assert!(compiled.regex.is_match("{word"));
        assert!(!compiled.regex.is_match("{ word"));

        let rule = UnsafeRule::new('>').before("<");
        let compiled = rule.compile().unwrap();
        let caps = compiled.regex.captures("a<>").unwrap();
        assert_eq!(caps.get(1).map(|m| m.as_str()), Some("<"));
    }

    #[test]
    fn test_at_break_pattern() {
        let compiled = UnsafeRule::new('#').at_break().compile().unwrap();
        assert!(compiled.regex.is_match("\n  # heading"));
        assert!(!compiled.regex.is_match("C# language"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = UnsafeRule::new('<').after("[unclosed").compile().unwrap_err();
        assert!(matches!(err, SerializeError::InvalidRule { character: '<', .. }));
    }

    #[test]
    fn test_scope() {
        let rule = UnsafeRule::new('*')
            .inside(&[Construct::Phrasing])
            .outside(FULL_PHRASING_SPANS);

        let mut stack = ContextStack::new();
        assert!(!rule.in_scope(&stack));

        stack.push(Construct::Phrasing);
        assert!(rule.in_scope(&stack));

        stack.push(Construct::DestinationRaw);
        assert!(!rule.in_scope(&stack));
    }
}
