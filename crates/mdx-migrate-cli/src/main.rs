//! mdx-migrate - Migrate MDX v1 content to MDX v2

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mdx_migrate::{Migration, MigrationCompiler};

#[derive(Parser)]
#[command(name = "mdx-migrate")]
#[command(version, about = "Migrate MDX v1 content to MDX v2", long_about = None)]
#[command(after_help = "EXAMPLES:
    mdx-migrate                      Migrate every .md/.mdx file under ./content
    mdx-migrate docs/vault           Only files whose path contains docs/vault
    mdx-migrate --dry-run            Report what would change
    mdx-migrate --stdin < page.mdx   Migrate one document to stdout")]
struct Cli {
    /// Only migrate files whose path contains one of these strings
    #[arg(value_name = "FILTER")]
    filters: Vec<String>,

    /// Content directory to migrate
    #[arg(short, long, value_name = "DIR", default_value = "content")]
    dir: PathBuf,

    /// Compile files without writing them back
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Read one document from stdin and write the result to stdout
    #[arg(long, conflicts_with_all = ["filters", "dir", "dry_run"])]
    stdin: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let result = if cli.stdin {
        migrate_stdin()
    } else {
        migrate_dir(&cli)
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn migrate_stdin() -> Result<ExitCode, String> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .map_err(|e| format!("failed to read stdin: {e}"))?;

    let compiler = MigrationCompiler::new().map_err(|e| e.to_string())?;
    let migrated = compiler.compile_document(&source).map_err(|e| e.to_string())?;

    io::stdout()
        .write_all(migrated.as_bytes())
        .map_err(|e| format!("failed to write stdout: {e}"))?;
    Ok(ExitCode::SUCCESS)
}

fn migrate_dir(cli: &Cli) -> Result<ExitCode, String> {
    let compiler = MigrationCompiler::new().map_err(|e| e.to_string())?;
    let report = Migration::new(&cli.dir)
        .filters(cli.filters.clone())
        .dry_run(cli.dry_run)
        .run(&compiler)
        .map_err(|e| e.to_string())?;

    for failure in &report.failed {
        log::error!("{}: {}", failure.path.display(), failure.error);
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
