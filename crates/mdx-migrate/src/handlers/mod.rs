//! Node handlers overriding the default serialization

mod comment;
mod text;

use mdx_migrate_core::{Handlers, NodeKind};

pub use comment::html;
pub use text::{is_escaped_multiline_tag, is_escaped_self_closing_tag, is_escaped_tag_line, text};

/// The handlers used for migration: raw markup and text
pub fn mdx_handlers() -> Handlers {
    let mut handlers = Handlers::new();
    handlers.add(NodeKind::Html, html).add(NodeKind::Text, text);
    handlers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_kinds() {
        let handlers = mdx_handlers();
        let kinds: Vec<NodeKind> = handlers.kinds().collect();
        assert_eq!(kinds, vec![NodeKind::Html, NodeKind::Text]);
    }
}
