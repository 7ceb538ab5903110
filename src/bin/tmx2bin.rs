use std::path::PathBuf;

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::Parser;

use tmx2bin_lib::export::{self, ExportSummary};
use tmx2bin_lib::schema::{FieldWidth, OverflowPolicy, SchemaConfig, Traversal, PRESET_NAMES};
use tmx2bin_lib::ExportError;

/// Convert a Tiled TMX map into the binary map format.
#[derive(Debug, Parser)]
#[command(name = "tmx2bin", version, about)]
struct Cli {
    /// Source TMX map
    source: PathBuf,

    /// Output binary file
    output: PathBuf,

    /// Bytes per grid cell (1 or 2); overrides the schema
    #[arg(value_parser = clap::value_parser!(u8).range(1..=2))]
    cell_width: Option<u8>,

    /// Named layout preset
    #[arg(long, default_value = "classic", value_parser = PossibleValuesParser::new(PRESET_NAMES), conflicts_with = "config")]
    schema: String,

    /// JSON file describing a custom layout
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write grids column by column instead of row by row
    #[arg(long)]
    column_major: bool,

    /// Fail instead of truncating values that do not fit their field
    #[arg(long)]
    strict: bool,

    /// Print the export summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn resolve_schema(cli: &Cli) -> anyhow::Result<SchemaConfig> {
    let mut schema = match &cli.config {
        Some(path) => SchemaConfig::load(path)?,
        None => cli.schema.parse()?,
    };
    if let Some(width) = cli.cell_width {
        schema = schema.with_cell_width(FieldWidth::try_from(width).map_err(anyhow::Error::msg)?);
    }
    if cli.column_major {
        schema = schema.with_traversal(Traversal::ColumnMajor);
    }
    if cli.strict {
        schema = schema.with_overflow(OverflowPolicy::Reject);
    }
    Ok(schema)
}

fn run(cli: &Cli) -> anyhow::Result<ExportSummary> {
    let schema = resolve_schema(cli)?;
    let summary = export::export_file(&cli.source, &cli.output, &schema)?;
    if cli.json {
        let json = serde_json::to_string_pretty(&summary)
            .context("Failed to serialize export summary")?;
        println!("{}", json);
    }
    Ok(summary)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("tmx2bin_lib", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    if let Err(err) = run(&cli) {
        match err.downcast_ref::<ExportError>() {
            Some(export_err) => {
                eprintln!("{}", export_err);
                std::process::exit(export_err.exit_code());
            }
            None => {
                eprintln!("error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
