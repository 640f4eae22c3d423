//! mdx-migrate-core - Markdown AST and context-sensitive serialization
//!
//! This crate provides the tree and the serializer used by `mdx-migrate`.
//! Serialization escapes characters according to declarative
//! [`UnsafeRule`]s and lets callers override the rendering of any node kind
//! through [`Handlers`].
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────┐   Options + UnsafeRules
//! Markdown ──▶ │ Markdown AST │ ──▶ Serializer ──▶ Markdown String
//!              └──────────────┘        ▲
//!                                      │ Handlers (per node kind)
//! ```
//!
//! # Example
//!
//! ```rust
//! use mdx_migrate_core::{serialize, Node, Options};
//!
//! let ast = Node::Root(vec![
//!     Node::Heading {
//!         depth: 1,
//!         children: vec![Node::text("Hello World")],
//!     },
//!     Node::Paragraph(vec![
//!         Node::text("This is "),
//!         Node::Strong(vec![Node::text("bold")]),
//!         Node::text(" text."),
//!     ]),
//! ]);
//!
//! let markdown = serialize(&ast, &Options::default()).unwrap();
//! assert_eq!(markdown, "# Hello World\n\nThis is **bold** text.\n");
//! ```

mod ast;
mod context;
mod options;
mod safe;
mod serialize;
mod unsafe_rules;

pub use ast::{Node, NodeKind};
pub use context::{Construct, ContextStack, FULL_PHRASING_SPANS};
pub use options::{ListItemIndent, Options};
pub use serialize::{serialize, Handle, Handlers, Info, Serializer, State};
pub use unsafe_rules::{compile_rules, default_unsafe_rules, CompiledRule, UnsafeRule};

/// Error type for serialization
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("{kind} node cannot appear in {context}")]
    Invariant {
        kind: NodeKind,
        context: &'static str,
    },

    #[error("invalid unsafe rule pattern for {character:?}: {source}")]
    InvalidRule {
        character: char,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, SerializeError>;
