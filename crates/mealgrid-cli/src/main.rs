//! mealgrid CLI - Weekly Order Workbook Engine
//!
//! Command-line interface for turning order report payloads into XLSX
//! workbooks.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mealgrid_aggregate::{active_customers, aggregate_orders, resolve_dates};
use mealgrid_core::{RangePreset, ReportData, ReportPeriod};
use mealgrid_render::WorkbookRenderer;

#[derive(Parser)]
#[command(name = "mealgrid")]
#[command(author, version, about = "Weekly order workbook generator", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a report payload and print a summary
    Inspect {
        /// Payload JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate the workbook for a payload
    Generate {
        /// Payload JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Range preset (full_week, first_half, second_half); defaults to
        /// the payload's preset, then to full_week
        #[arg(short, long)]
        range: Option<String>,

        /// Output directory (current directory if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sheet name tag
        #[arg(long, default_value = "NY")]
        tag: String,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        // Structured error payload, matching the ordering backend's
        // response shape; never a partial binary
        let payload = serde_json::json!({ "success": false, "error": err.to_string() });
        eprintln!("{payload}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Inspect { file }) => inspect(&file),
        Some(Commands::Generate {
            file,
            range,
            output,
            tag,
        }) => generate(&file, range.as_deref(), output.as_deref(), &tag),
        None => {
            println!("mealgrid - Weekly Order Workbook Engine");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

fn load_payload(file: &Path) -> Result<ReportData> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let data: ReportData = serde_json::from_str(&text)
        .with_context(|| format!("invalid report payload in {}", file.display()))?;
    Ok(data)
}

/// Resolve the requested preset: explicit flag first, then the payload's own
/// preset, then the full week
fn resolve_preset(flag: Option<&str>, data: &ReportData) -> Result<RangePreset> {
    if let Some(value) = flag {
        return Ok(value.parse()?);
    }
    Ok(data
        .date_range
        .as_ref()
        .and_then(|range| range.preset)
        .unwrap_or(RangePreset::FullWeek))
}

fn inspect(file: &Path) -> Result<()> {
    let data = load_payload(file)?;

    println!("Customers:  {}", data.customers.len());
    println!("Menu items: {}", data.menu_items.len());
    println!("Orders:     {}", data.orders.len());

    let Some(range) = &data.date_range else {
        println!("Date range: (none)");
        return Ok(());
    };
    println!("Date range: {} .. {}", range.start, range.end);

    let period = ReportPeriod::from_range(range.start, range.end)?;
    let aggregated = if data.orders.is_empty() {
        data.aggregated_data.clone()
    } else {
        aggregate_orders(&data.orders, &data.menu_items)
    };

    for preset in RangePreset::ALL {
        let dates = resolve_dates(&period, preset);
        let active = active_customers(&data.customers, &aggregated, &dates);
        println!(
            "  {}: {} days, {} active customers",
            preset,
            dates.len(),
            active.len()
        );
    }

    Ok(())
}

fn generate(
    file: &Path,
    range: Option<&str>,
    output: Option<&Path>,
    tag: &str,
) -> Result<()> {
    let data = load_payload(file)?;
    let preset = resolve_preset(range, &data)?;

    let renderer = WorkbookRenderer::new().tag(tag);
    let bytes = renderer.render_to_bytes(&data, preset)?;

    let out_dir = output.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let path = out_dir.join(preset.filename());
    std::fs::write(&path, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(preset = %preset, bytes = bytes.len(), "workbook generated");
    println!("Workbook written: {} ({} bytes)", path.display(), bytes.len());

    Ok(())
}
