//! Context-sensitive escaping
//!
//! Escapes the characters of a value that unsafe rules flag, given the
//! characters that surround it in the output.

use std::collections::BTreeMap;

use crate::context::ContextStack;
use crate::unsafe_rules::CompiledRule;

/// Which conditions flagged a position. When several rules flag the same
/// position, a condition only sticks if every rule had it.
#[derive(Debug, Clone, Copy)]
struct Conditions {
    before: bool,
    after: bool,
}

impl Conditions {
    fn unconditional(&self) -> bool {
        !self.before && !self.after
    }
}

/// Escape `input`, which will be written between `before` and `after`.
///
/// ASCII punctuation is escaped with a backslash, anything else (and any
/// character listed in `encode`) becomes a hexadecimal character reference.
/// Backslashes that would otherwise start an escape are doubled.
pub fn safe(
    rules: &[CompiledRule],
    stack: &ContextStack,
    input: &str,
    before: Option<char>,
    after: Option<char>,
    encode: &[char],
) -> String {
    let mut value = String::with_capacity(input.len() + 2);
    if let Some(c) = before {
        value.push(c);
    }
    value.push_str(input);
    if let Some(c) = after {
        value.push(c);
    }

    let mut flagged: BTreeMap<usize, Conditions> = BTreeMap::new();

    for compiled in rules.iter().filter(|c| c.rule.in_scope(stack)) {
        let has_before = compiled.has_before();
        let has_after = compiled.has_after();

        for caps in compiled.regex.captures_iter(&value) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let offset = if has_before {
                caps.get(1).map_or(0, |m| m.len())
            } else {
                0
            };
            let position = whole.start() + offset;

            flagged
                .entry(position)
                .and_modify(|existing| {
                    existing.before &= has_before;
                    existing.after &= has_after;
                })
                .or_insert(Conditions {
                    before: has_before,
                    after: has_after,
                });
        }
    }

    let positions: Vec<(usize, Conditions)> = flagged.into_iter().collect();
    let mut start = before.map_or(0, char::len_utf8);
    let end = value.len() - after.map_or(0, char::len_utf8);
    let mut result = String::with_capacity(value.len() + positions.len());

    for (index, &(position, conditions)) in positions.iter().enumerate() {
        if position < start || position >= end {
            continue;
        }

        // A character only unsafe because of its neighbour does not need an
        // escape when that neighbour is escaped unconditionally.
        let next_escaped = positions
            .get(index + 1)
            .is_some_and(|&(p, c)| p == position + 1 && c.unconditional());
        let previous_escaped = index > 0
            && positions
                .get(index - 1)
                .is_some_and(|&(p, c)| p + 1 == position && c.unconditional());
        if (position + 1 < end && next_escaped && conditions.after)
            || (previous_escaped && conditions.before)
        {
            continue;
        }

        if start != position {
            result.push_str(&escape_backslashes(&value[start..position], Some('\\')));
        }
        start = position;

        let Some(character) = value[position..].chars().next() else {
            continue;
        };
        if character.is_ascii_punctuation() && !encode.contains(&character) {
            result.push('\\');
        } else {
            result.push_str(&format!("&#x{:X};", u32::from(character)));
            start += character.len_utf8();
        }
    }

    if start < end {
        result.push_str(&escape_backslashes(&value[start..end], after));
    }
    result
}

/// Double every backslash that is followed by ASCII punctuation, looking
/// one character past the end of `value` into `after`.
fn escape_backslashes(value: &str, after: Option<char>) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c == '\\' {
            let next = chars.peek().map(|&(_, n)| n).or(after);
            if next.is_some_and(|n| n.is_ascii_punctuation()) {
                result.push('\\');
            }
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Construct;
    use crate::unsafe_rules::{compile_rules, default_unsafe_rules, UnsafeRule};

    fn phrasing() -> ContextStack {
        let mut stack = ContextStack::new();
        stack.push(Construct::Paragraph);
        stack.push(Construct::Phrasing);
        stack
    }

    fn escape(rules: &[UnsafeRule], input: &str) -> String {
        let compiled = compile_rules(rules).unwrap();
        safe(&compiled, &phrasing(), input, Some('\n'), Some('\n'), &[])
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(escape(&default_unsafe_rules(), "Hello World"), "Hello World");
    }

    #[test]
    fn test_phrasing_markers_escaped() {
        assert_eq!(
            escape(&default_unsafe_rules(), "a * b _c_ [d]"),
            "a \\* b \\_c\\_ \\[d]"
        );
    }

    #[test]
    fn test_at_break_only_at_line_start() {
        let rules = default_unsafe_rules();
        assert_eq!(escape(&rules, "# not a heading"), "\\# not a heading");
        assert_eq!(escape(&rules, "C# is fine"), "C# is fine");
        assert_eq!(escape(&rules, "- not a list"), "\\- not a list");
        assert_eq!(escape(&rules, "1. not a list"), "1\\. not a list");
    }

    #[test]
    fn test_neighbour_condition_is_kept_when_both_conditional() {
        let rules = vec![
            UnsafeRule::new('{').after("\\{"),
            UnsafeRule::new('{').after("[a-zA-Z0-9]"),
        ];
        assert_eq!(escape(&rules, "{{open}}"), "\\{\\{open}}");
    }

    #[test]
    fn test_neighbour_condition_skipped_when_next_unconditional() {
        let rules = vec![UnsafeRule::new('!').after("\\["), UnsafeRule::new('[')];
        assert_eq!(escape(&rules, "![x"), "!\\[x");
    }

    #[test]
    fn test_non_punctuation_is_encoded() {
        let rules = vec![UnsafeRule::new(' ').before("[\\r\\n]")];
        assert_eq!(escape(&rules, "a\n b"), "a\n&#x20;b");
    }

    #[test]
    fn test_encode_list_forces_reference() {
        let compiled = compile_rules(&[UnsafeRule::new('`')]).unwrap();
        let result = safe(&compiled, &ContextStack::new(), "a`b", None, None, &['`']);
        assert_eq!(result, "a&#x60;b");
    }

    #[test]
    fn test_backslash_before_punctuation_doubled() {
        assert_eq!(escape(&default_unsafe_rules(), "a\\b \\!"), "a\\b \\\\!");
    }

    #[test]
    fn test_backslash_before_escape_doubled() {
        assert_eq!(escape(&default_unsafe_rules(), "a\\_b"), "a\\\\\\_b");
    }

    #[test]
    fn test_out_of_scope_rules_ignored() {
        let compiled = compile_rules(&default_unsafe_rules()).unwrap();
        let result = safe(&compiled, &ContextStack::new(), "a * b", Some('\n'), Some('\n'), &[]);
        assert_eq!(result, "a * b");
    }
}
