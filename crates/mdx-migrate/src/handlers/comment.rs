//! Raw markup handler: HTML comments become MDX comments

use mdx_migrate_core::{Info, Node, Result, State};
use once_cell::sync::Lazy;
use regex::Regex;

/// A value that is a single comment, with optional surrounding whitespace
static STANDALONE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<!--((?s:.)*?)-->\s*$").expect("valid comment pattern"));

/// Any comment inside a larger piece of markup
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--((?s:.)*?)-->").expect("valid comment pattern"));

/// Render a raw markup node.
///
/// Comments are rewritten to `{/*body */}` with the body kept verbatim,
/// internal line endings and indentation included. Any other markup is
/// written as-is.
pub fn html(node: &Node, _state: &mut State<'_>, _info: Info) -> Result<String> {
    let value = node.value().unwrap_or_default();
    Ok(rewrite_comments(value))
}

fn rewrite_comments(value: &str) -> String {
    if let Some(body) = STANDALONE_COMMENT
        .captures(value)
        .and_then(|caps| caps.get(1))
        .filter(|body| !body.as_str().contains("-->"))
    {
        return mdx_comment(body.as_str());
    }

    if COMMENT.is_match(value) {
        log::trace!("rewriting comments inside markup {value:?}");
        return COMMENT
            .replace_all(value, |caps: &regex::Captures<'_>| mdx_comment(&caps[1]))
            .into_owned();
    }

    value.to_string()
}

fn mdx_comment(body: &str) -> String {
    format!("{{/*{body} */}}")
}
