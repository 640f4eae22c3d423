//! The migration pipeline: parse, then serialize with the MDX handlers

use mdx_migrate_core::{Handlers, Options, Serializer};
use once_cell::sync::Lazy;

use crate::front_matter::Document;
use crate::handlers::mdx_handlers;
use crate::options::mdx_v2_options;
use crate::parse::parse;
use crate::Result;

/// Compiles document bodies from MDX v1 to MDX v2.
///
/// The compiler holds only configuration. Every call builds its own tree
/// and serialization state, so one compiler can be shared across threads.
///
/// # Example
///
/// ```rust
/// use mdx_migrate::MigrationCompiler;
///
/// let compiler = MigrationCompiler::new().unwrap();
/// assert_eq!(compiler.compile("1 is <= 2").unwrap(), "1 is \\<= 2\n");
/// ```
#[derive(Debug)]
pub struct MigrationCompiler {
    serializer: Serializer,
}

impl MigrationCompiler {
    /// Create a compiler with the MDX v2 options and handlers
    pub fn new() -> Result<Self> {
        Self::with_options(mdx_v2_options())
    }

    /// Create a compiler with custom options and the MDX v2 handlers
    pub fn with_options(options: Options) -> Result<Self> {
        Self::with_handlers(options, mdx_handlers())
    }

    pub fn with_handlers(options: Options, handlers: Handlers) -> Result<Self> {
        let serializer = Serializer::with_handlers(options, handlers)?;
        Ok(Self { serializer })
    }

    /// Migrate one document body
    pub fn compile(&self, text: &str) -> Result<String> {
        let tree = parse(text)?;
        let output = self.serializer.serialize(&tree)?;

        log::debug!("compiled {} bytes into {} bytes", text.len(), output.len());
        Ok(output)
    }

    /// Migrate a whole file's contents: the front matter is kept and only
    /// the body is compiled
    pub fn compile_document(&self, source: &str) -> Result<String> {
        let document = Document::split(source);
        let body = self.compile(&document.body)?;
        Ok(document.with_body(body).join())
    }
}

static DEFAULT_COMPILER: Lazy<MigrationCompiler> =
    Lazy::new(|| MigrationCompiler::new().expect("built-in unsafe rules are valid"));

/// Migrate one document body with the default compiler
pub fn compile(text: &str) -> Result<String> {
    DEFAULT_COMPILER.compile(text)
}
