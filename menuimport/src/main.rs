use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use menuport::store::{JsonFileStore, MemoryStore, MenuStore};
use menuport::{ImportConfig, ImportError, ImportSession, MenuImporter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod formatter;

#[derive(Parser)]
#[command(name = "menuimport")]
#[command(about = "Check and import vendor menu spreadsheets", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a menu file and show the preview
    Check {
        /// Path to the .xlsx/.xls/.csv file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Write the full error report to this file
        #[arg(long, value_name = "OUT")]
        report: Option<PathBuf>,
    },
    /// Validate and persist a menu file for a vendor
    Import {
        /// Path to the .xlsx/.xls/.csv file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Vendor whose catalog receives the items
        #[arg(long, value_name = "ID")]
        vendor: String,

        /// JSON store file
        #[arg(long, value_name = "JSON", required_unless_present = "dry_run")]
        store: Option<PathBuf>,

        /// Run the import against a throwaway in-memory store
        #[arg(long)]
        dry_run: bool,
    },
    /// Write the import template workbook
    Template {
        /// Output .xlsx file
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    let config = if let Some(config_path) = path {
        ImportConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("menuimport.toml");
        if default_config_path.exists() {
            ImportConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ImportConfig::default()
        }
    };

    let valid_tokens = menuport::rules::registry::get_all_valid_tokens();
    config
        .validate(
            &valid_tokens,
            &menuport::rules::registry::mandatory_rule_ids(),
        )
        .context("Invalid configuration")?;

    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    let exit_code = match cli.command {
        Command::Check {
            file,
            format,
            report,
        } => check(config, &file, format, report.as_deref())?,
        Command::Import {
            file,
            vendor,
            store,
            dry_run,
        } => {
            let store: Box<dyn MenuStore> = match store {
                Some(path) if !dry_run => Box::new(JsonFileStore::new(path)),
                _ => Box::new(MemoryStore::new()),
            };
            import(config, &file, &vendor, store.as_ref(), dry_run).await?
        }
        Command::Template { output } => {
            menuport::writer::write_template(&output)?;
            println!("✓ Template written to {}", output.display());
            0
        }
    };

    std::process::exit(exit_code);
}

fn check(
    config: ImportConfig,
    file: &Path,
    format: OutputFormat,
    report: Option<&Path>,
) -> Result<i32> {
    let preview_limit = config.report.preview_limit;
    let matching = config.validation.category_matching;
    let mut session = ImportSession::new(MenuImporter::with_config(config));

    let result = match session.load_file(file, &mut formatter::progress_printer()) {
        Ok(result) => result,
        Err(ImportError::FileFormat(e)) => {
            formatter::print_fatal(file, &e.to_string());
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(report_path) = report {
        menuport::report::write_error_report(report_path, result)?;
    }

    match format {
        OutputFormat::Human => formatter::print_preview(file, result, matching, preview_limit),
        OutputFormat::Json => formatter::print_json(file, result)?,
    }

    Ok(if result.has_errors() { 1 } else { 0 })
}

async fn import(
    config: ImportConfig,
    file: &Path,
    vendor: &str,
    store: &dyn MenuStore,
    dry_run: bool,
) -> Result<i32> {
    let preview_limit = config.report.preview_limit;
    let matching = config.validation.category_matching;
    let mut session = ImportSession::new(MenuImporter::with_config(config));

    match session.load_file(file, &mut formatter::progress_printer()) {
        Ok(result) => formatter::print_preview(file, result, matching, preview_limit),
        Err(ImportError::FileFormat(e)) => {
            formatter::print_fatal(file, &e.to_string());
            return Ok(2);
        }
        Err(e) => return Err(e.into()),
    }

    if !session.can_confirm() {
        formatter::print_blocked();
        return Ok(1);
    }

    match session.confirm_import(store, vendor).await {
        Ok(summary) => {
            formatter::print_summary(vendor, &summary, dry_run);
            Ok(0)
        }
        Err(e) if e.is_retryable() => {
            formatter::print_fatal(file, &e.to_string());
            Ok(3)
        }
        Err(e) => Err(e.into()),
    }
}
