//! socmatrix - field-coverage matrix for the schedule-of-classes API
//!
//! Fetches course and open-section payloads for the compiled-in terms and
//! campuses and writes an annotated CSV describing which fields the API
//! actually populates.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use socmatrix_catalog::{Catalog, SocApi};

mod config;

use config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "socmatrix")]
#[command(about = "Field-coverage matrix for the schedule-of-classes API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    quiet: bool,

    /// Config file path (default: ./socmatrix.toml or ~/.config/socmatrix/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// CSV output path
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every term and campus and write the field matrix (default)
    Run,
    /// Show effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = socmatrix_core::ProgressContext::new();
    let multi = progress.is_tty().then(|| progress.multi());
    socmatrix_core::init_logging(cli.quiet, cli.debug, multi);

    let file_config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    let config = file_config.resolve(Overrides {
        output: cli.output,
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
    })?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let api = SocApi::new(&config)?;
            socmatrix_catalog::run(&api, &Catalog::builtin(), &config, &progress)?;
            Ok(())
        }
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let catalog = Catalog::builtin();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["API base URL", &config.base_url]);
            table.add_row(vec!["User agent", &config.user_agent]);
            table.add_row(vec![
                "Timeout",
                &format!("{}s", config.timeout.as_secs()),
            ]);
            table.add_row(vec!["Output", &config.output.display().to_string()]);
            table.add_row(vec![
                "Terms",
                &catalog
                    .terms
                    .iter()
                    .map(|t| t.code)
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
            table.add_row(vec![
                "Campuses",
                &catalog
                    .campuses
                    .iter()
                    .map(|c| c.code)
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
            table.add_row(vec![
                "Subjects",
                &catalog
                    .subjects
                    .iter()
                    .map(|s| format!("{} [{}]", s.code, s.levels.join(",")))
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);

            println!("\n{table}");
            Ok(())
        }
    }
}
