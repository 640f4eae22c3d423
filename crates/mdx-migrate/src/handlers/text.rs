//! Text handler
//!
//! The default escaping is conservative. This handler takes its output and
//! gives back what MDX v2 does not need: markup the parser left as text is
//! written raw, and markers that can no longer form a construct are
//! unescaped.

use mdx_migrate_core::{Construct, Info, Node, Result, State};
use once_cell::sync::Lazy;
use regex::Regex;

static ESCAPED_TAG_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\\<[A-Za-z0-9_].*?>$").expect("valid tag line pattern"));

static ESCAPED_SELF_CLOSING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\<[A-Za-z0-9_].*?/>").expect("valid self-closing tag pattern"));

static ESCAPED_MULTILINE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\<[A-Za-z0-9_]+(\s+[A-Za-z0-9_]+(=.+)?.+?\n)+")
        .expect("valid multi-line tag pattern")
});

/// Constructs whose text may hold markup the parser did not recognize
const MARKUP_CONTAINERS: &[Construct] = &[Construct::Phrasing, Construct::Emphasis, Construct::Strong];

/// A line that is an escaped tag from start to end, such as
/// `\<CodeBlockConfig hideClipboard>`
pub fn is_escaped_tag_line(escaped: &str) -> bool {
    ESCAPED_TAG_LINE.is_match(escaped)
}

/// An escaped self-closing tag anywhere, such as `\<img src="a.png" />`
pub fn is_escaped_self_closing_tag(escaped: &str) -> bool {
    ESCAPED_SELF_CLOSING_TAG.is_match(escaped)
}

/// An escaped tag at the start whose attributes are spread over lines:
///
/// ```text
/// \<video
///   muted
///   class="clickthrough"
/// >
/// ```
pub fn is_escaped_multiline_tag(escaped: &str) -> bool {
    ESCAPED_MULTILINE_TAG.is_match(escaped)
}

fn looks_like_markup(escaped: &str) -> bool {
    is_escaped_tag_line(escaped)
        || is_escaped_self_closing_tag(escaped)
        || is_escaped_multiline_tag(escaped)
}

/// Render a text node
pub fn text(node: &Node, state: &mut State<'_>, info: Info) -> Result<String> {
    let value = node.value().unwrap_or_default();
    let escaped = state.safe(value, info);

    let in_markup_container = state
        .stack()
        .current()
        .is_some_and(|construct| MARKUP_CONTAINERS.contains(&construct));

    if in_markup_container && looks_like_markup(&escaped) {
        log::trace!("keeping markup-like text verbatim: {value:?}");
        return Ok(value.to_string());
    }

    Ok(relax_escapes(&escaped))
}

/// Undo escapes that cannot matter in text, and keep `<=` escaped
fn relax_escapes(escaped: &str) -> String {
    escaped
        .replace(r"\->", "->")
        .replace(r"\~>", "~>")
        .replace(r"\_", "_")
        .replace(r"\*", "*")
        .replace(r"\[", "[")
        .replace("<=", r"\<=")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_line() {
        assert!(is_escaped_tag_line(r#"\<CodeBlockConfig foo=\{{ foo: "bar" }}>"#));
        assert!(is_escaped_tag_line("intro\n\\<Tabs>"));
        assert!(!is_escaped_tag_line(r"Talk to me about \<GITHUB_USER>"));
        assert!(!is_escaped_tag_line(r"\<Tabs> and more"));
        assert!(!is_escaped_tag_line(r"\< Tabs>"));
    }

    #[test]
    fn test_self_closing_tag() {
        assert!(is_escaped_self_closing_tag(r#"icon \<img src="/a.svg" />"#));
        assert!(!is_escaped_self_closing_tag(r#"icon \<img src="/a.svg">"#));
        assert!(!is_escaped_self_closing_tag(r"a \< b />"));
    }

    #[test]
    fn test_multiline_tag() {
        assert!(is_escaped_multiline_tag("\\<video\n  muted\n  loop\n>"));
        assert!(is_escaped_multiline_tag(
            "\\<video\n  class=\"boundary-video\"\n>"
        ));
        assert!(!is_escaped_multiline_tag("\\<video>"));
        assert!(!is_escaped_multiline_tag("see \\<video\n  muted\n>"));
    }

    #[test]
    fn test_relax_escapes() {
        assert_eq!(relax_escapes(r"\-> Note"), "-> Note");
        assert_eq!(relax_escapes(r"\~> Warning"), "~> Warning");
        assert_eq!(relax_escapes(r"snake\_case and \_more\_"), "snake_case and _more_");
        assert_eq!(relax_escapes(r"2 \* 3 \* 4"), "2 * 3 * 4");
        assert_eq!(relax_escapes(r"\[not a link]"), "[not a link]");
        assert_eq!(relax_escapes("1 is <= 2 and 3 <= 4"), r"1 is \<= 2 and 3 \<= 4");
    }

    #[test]
    fn test_relax_escapes_keeps_mdx_escapes() {
        assert_eq!(relax_escapes(r"\{\{open}} \<Tag>"), r"\{\{open}} \<Tag>");
    }
}
