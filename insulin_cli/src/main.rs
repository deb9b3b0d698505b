use clap::{Parser, Subcommand};
use insulin_core::*;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gdose")]
#[command(about = "Insulin dose recommendation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the dose table CSV path
    #[arg(long, global = true)]
    table: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a recommendation from a request JSON object (default)
    Recommend {
        /// Read the request from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Pretty-print the response JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show and validate the active dose table
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    insulin_core::logging::init_with_level(&config.logging.level);

    let dose_table = resolve_table(cli.table.as_deref(), &config);

    match cli.command {
        Some(Commands::Recommend { input, pretty }) => cmd_recommend(&dose_table, input, pretty),
        Some(Commands::Table) => cmd_table(&dose_table),
        None => {
            // Default to "recommend" reading from stdin
            cmd_recommend(&dose_table, None, false)
        }
    }
}

/// Pick the dose table source: CLI flag, then config file, then built-ins.
fn resolve_table(flag: Option<&Path>, config: &Config) -> DoseTable {
    match flag.or(config.table.csv_path.as_deref()) {
        Some(path) => load_table_or_default(path),
        None => {
            tracing::debug!("No table source configured, using built-in defaults");
            get_default_table().clone()
        }
    }
}

fn cmd_recommend(table: &DoseTable, input: Option<PathBuf>, pretty: bool) -> Result<()> {
    let raw_text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let raw: serde_json::Value = serde_json::from_str(&raw_text)?;

    match recommend(&raw, table) {
        Ok(recommendation) => {
            let json = if pretty {
                serde_json::to_string_pretty(&recommendation)?
            } else {
                serde_json::to_string(&recommendation)?
            };
            println!("{}", json);

            let due = chrono::Utc::now()
                + chrono::Duration::hours(i64::from(recommendation.next_check_hours));
            tracing::info!(
                "Next glucose check due around {}",
                due.format("%H:%M UTC")
            );
            Ok(())
        }
        Err(e @ (Error::MissingField(_) | Error::InvalidValue { .. })) => {
            // Validation failures are part of the response contract.
            let body = serde_json::json!({ "error": format!("Invalid input: {}", e) });
            println!("{}", body);
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

fn cmd_table(table: &DoseTable) -> Result<()> {
    let errors = table.validate();
    if !errors.is_empty() {
        eprintln!("Dose table validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Table("Invalid dose table".into()));
    }

    for (name, algorithm_table, unit) in [
        ("IV Infusion", &table.iv, "IU/hr"),
        ("Basal Bolus", &table.basal, "IU"),
    ] {
        println!("{} ({}):", name, unit);
        for level in algorithm_table.levels() {
            for entry in &level.entries {
                println!(
                    "  level {}: {}-{} -> {}",
                    level.level, entry.range.min, entry.range.max, entry.dose
                );
            }
        }
    }

    Ok(())
}
