use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use examsheet_core::{ImportConfig, Importer};
use std::path::PathBuf;

mod formatter;

#[derive(Parser)]
#[command(name = "examsheet")]
#[command(about = "Import exam definitions and student scores from a spreadsheet")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Workbook to import, overrides the configured path
    #[arg(short, long, value_name = "FILE")]
    workbook: Option<PathBuf>,

    /// SQLite database to import into, overrides the configured path
    #[arg(short, long, value_name = "DB")]
    database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Parse and validate the workbook without writing to the database
    #[arg(long)]
    dry_run: bool,

    /// Log every record decision
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripts
    Json,
}

fn load_config(cli: &Cli) -> Result<ImportConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        log::debug!("Loading config from {}", config_path.display());
        ImportConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let default_config_path = PathBuf::from("examsheet.toml");
        if default_config_path.exists() {
            log::debug!("Loading config from {}", default_config_path.display());
            ImportConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            log::debug!("No config file, using defaults");
            ImportConfig::default()
        }
    };

    if let Some(workbook) = &cli.workbook {
        config.workbook = workbook.clone();
    }
    if let Some(database) = &cli.database {
        config.database = database.clone();
    }
    log::info!(
        "Importing {} into {}",
        config.workbook.display(),
        config.database.display()
    );
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&cli)?;
    config.validate().context("Invalid configuration")?;

    let importer = Importer::with_config(config);
    let workbook = importer.config().workbook.clone();

    if cli.dry_run {
        let parsed = importer
            .parse()
            .with_context(|| format!("Failed to parse workbook: {}", workbook.display()))?;
        match cli.format {
            OutputFormat::Human => formatter::print_human_dry_run(&workbook, &parsed),
            OutputFormat::Json => formatter::print_json_dry_run(&workbook, &parsed)?,
        }
        return Ok(());
    }

    let summary = importer
        .import()
        .with_context(|| format!("Failed to import workbook: {}", workbook.display()))?;

    match cli.format {
        OutputFormat::Human => {
            formatter::print_human(&workbook, &importer.config().database, &summary);
        }
        OutputFormat::Json => {
            formatter::print_json(&workbook, &importer.config().database, &summary)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "workbook = \"from_file.xlsx\"\ndatabase = \"from_file.sqlite3\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "examsheet",
            "--config",
            path.to_str().unwrap(),
            "--database",
            "flag.sqlite3",
        ]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.workbook, PathBuf::from("from_file.xlsx"));
        assert_eq!(config.database, PathBuf::from("flag.sqlite3"));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["examsheet", "--config", "/nonexistent/examsheet.toml"]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config from"));
    }
}
