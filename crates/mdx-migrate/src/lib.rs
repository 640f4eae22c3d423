//! # mdx-migrate
//!
//! Migrate MDX v1 documents to MDX v2.
//!
//! MDX v2 reads `<`, `>`, `{` and `}` as the start of embedded markup or
//! expressions everywhere. This crate re-serializes Markdown so that literal
//! uses of those characters are escaped, HTML comments become MDX comments,
//! and markup the parser left as text survives untouched.
//!
//! ## Example
//!
//! ```rust
//! use mdx_migrate::compile;
//!
//! let migrated = compile("This should be {escaped}").unwrap();
//! assert_eq!(migrated, "This should be \\{escaped}\n");
//!
//! let migrated = compile("<!-- note -->").unwrap();
//! assert_eq!(migrated, "{/* note  */}\n");
//! ```
//!
//! ## Batch migration
//!
//! [`Migration`] walks a content directory, keeps each file's front matter
//! as-is and rewrites the body in place. A failing document is reported
//! and skipped; it never stops the rest of the run.

pub mod batch;
mod compiler;
pub mod front_matter;
mod handlers;
mod options;
mod parse;

use std::path::PathBuf;

pub use batch::{Failure, Migration, Outcome, Report};
pub use compiler::{compile, MigrationCompiler};
pub use front_matter::Document;
pub use handlers::{
    html, is_escaped_multiline_tag, is_escaped_self_closing_tag, is_escaped_tag_line, mdx_handlers,
    text,
};
pub use options::{mdx_unsafe_rules, mdx_v2_options};
pub use parse::parse;

pub use mdx_migrate_core::SerializeError;

/// Error type for migration
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] SerializeError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, MigrateError>;
