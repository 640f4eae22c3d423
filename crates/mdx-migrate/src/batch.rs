//! Batch migration of a content directory
//!
//! Every Markdown file under the root is migrated in place. Documents are
//! independent: a failure is recorded in the [`Report`] and the run moves
//! on to the next file.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::compiler::MigrationCompiler;
use crate::{MigrateError, Result};

/// File extensions that are migrated
pub const EXTENSIONS: &[&str] = &["md", "mdx"];

/// A batch migration over a directory tree
#[derive(Debug, Clone)]
pub struct Migration {
    root: PathBuf,
    filters: Vec<String>,
    dry_run: bool,
}

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Migrated,
    Unchanged,
}

/// A file that could not be migrated
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: MigrateError,
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct Report {
    /// Files whose contents changed (written unless dry run)
    pub migrated: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.migrated.len() + self.unchanged.len() + self.failed.len()
    }
}

impl Migration {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filters: Vec::new(),
            dry_run: false,
        }
    }

    /// Only migrate files whose path contains one of `filters`. An empty
    /// list migrates every file.
    pub fn filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    /// Compile files without writing them back
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Migrate every selected file under the root.
    ///
    /// Fails only when the root itself cannot be read; per-file errors end
    /// up in [`Report::failed`].
    pub fn run(&self, compiler: &MigrationCompiler) -> Result<Report> {
        fs::read_dir(&self.root).map_err(|source| MigrateError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut report = Report::default();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("skipping {}: {err}", path.display());
                    report.failed.push(Failure {
                        error: MigrateError::Io {
                            path: path.clone(),
                            source: err.into(),
                        },
                        path,
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.selects(entry.path()) {
                continue;
            }

            let path = entry.into_path();
            match self.migrate_file(compiler, &path) {
                Ok(Outcome::Migrated) => report.migrated.push(path),
                Ok(Outcome::Unchanged) => report.unchanged.push(path),
                Err(error) => {
                    log::warn!("failed to migrate {}: {error}", path.display());
                    report.failed.push(Failure { path, error });
                }
            }
        }

        log::info!(
            "{} migrated, {} unchanged, {} failed",
            report.migrated.len(),
            report.unchanged.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Migrate one file, writing it back when its contents change
    pub fn migrate_file(&self, compiler: &MigrationCompiler, path: &Path) -> Result<Outcome> {
        log::info!("{}", path.display());

        let source = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
        let migrated = compiler.compile_document(&source)?;

        if migrated == source {
            return Ok(Outcome::Unchanged);
        }
        if !self.dry_run {
            fs::write(path, &migrated).map_err(|source| io_error(path, source))?;
        }
        Ok(Outcome::Migrated)
    }

    /// Whether `path` has a Markdown extension and passes the filters
    fn selects(&self, path: &Path) -> bool {
        let markdown = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if !markdown {
            return false;
        }

        let full = path.to_string_lossy();
        self.filters.is_empty() || self.filters.iter().any(|filter| full.contains(filter.as_str()))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> MigrateError {
    MigrateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_markdown_only() {
        let migration = Migration::new("content");
        assert!(migration.selects(Path::new("content/docs/intro.mdx")));
        assert!(migration.selects(Path::new("content/README.md")));
        assert!(!migration.selects(Path::new("content/logo.svg")));
        assert!(!migration.selects(Path::new("content/mdx")));
    }

    #[test]
    fn test_filters_match_path_substrings() {
        let migration = Migration::new("content").filters(vec!["docs/vault".to_string()]);
        assert!(migration.selects(Path::new("content/docs/vault/index.mdx")));
        assert!(!migration.selects(Path::new("content/docs/consul/index.mdx")));
    }

    #[test]
    fn test_report_totals() {
        let report = Report {
            migrated: vec![PathBuf::from("a.md")],
            unchanged: vec![PathBuf::from("b.md")],
            failed: Vec::new(),
        };
        assert_eq!(report.total(), 2);
        assert!(report.is_success());
    }
}
