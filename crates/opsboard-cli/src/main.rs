//! opsboard CLI - Operations Dashboard Engine
//!
//! Command-line interface for filtering records, summarizing KPIs,
//! exporting workbooks and resolving status styles.

mod config;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use opsboard_core::filter::{set_of, FilterState, FilterUpdate};
use opsboard_core::ingest::records_from_json;
use opsboard_core::style::{resolve_style_in, StylePalette};
use opsboard_core::{Record, RecordKind};
use opsboard_render::{ExcelRenderer, ExportLayout, SummaryRenderer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "opsboard")]
#[command(author, version, about = "Operations dashboard engine", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./opsboard.toml when present)
    #[arg(short, long, global = true, env = "OPSBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List records that pass a filter
    Filter {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Summarize KPIs over the filtered records
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Export the filtered records to an Excel workbook
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Column layout (defaults to the record kind's layout)
        #[arg(short, long, value_enum)]
        layout: Option<LayoutArg>,

        /// Output file (Tickets_<date>.xlsx / CallLog_Report_<date>.xlsx if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve display styles for status values
    Style {
        /// Values to resolve
        #[arg(value_name = "VALUE", required = true)]
        values: Vec<String>,

        /// Lookup table
        #[arg(short, long, default_value = "status")]
        palette: StylePalette,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Record source and filter selection shared by the data commands
#[derive(Args)]
struct InputArgs {
    /// JSON file with an array of records
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// What the records are
    #[arg(short, long, value_enum, default_value_t = KindArg::Ticket)]
    kind: KindArg,

    /// JSON file holding a filter state
    #[arg(long, value_name = "FILTER")]
    filter: Option<PathBuf>,

    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,

    /// Keep only these statuses (repeatable)
    #[arg(long)]
    status: Vec<String>,

    /// Only starred records
    #[arg(long)]
    favorite: bool,

    /// Reference date for overdue/today/upcoming (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Ticket,
    Order,
    CallLog,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Ticket => RecordKind::Ticket,
            KindArg::Order => RecordKind::Order,
            KindArg::CallLog => RecordKind::CallLog,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Tickets,
    CallLogs,
}

impl From<LayoutArg> for ExportLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Tickets => ExportLayout::Tickets,
            LayoutArg::CallLogs => ExportLayout::CallLogs,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Filter { input, format }) => cmd_filter(&config, &input, format),
        Some(Commands::Summary { input, format }) => cmd_summary(&config, &input, format),
        Some(Commands::Export { input, layout, output }) => cmd_export(&config, &input, layout, output),
        Some(Commands::Style { values, palette, format }) => cmd_style(&values, palette, format),
        None => {
            println!("opsboard - Operations Dashboard Engine");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_filter(config: &Config, input: &InputArgs, format: OutputFormat) -> Result<()> {
    let records = load_records(input)?;
    let matched = select(config, input, &records)?;

    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &matched)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for record in &matched {
                writeln!(
                    out,
                    "{:<12} {:<24} {}",
                    record.id,
                    or_dash(&record.status),
                    or_dash(&record.subject)
                )?;
            }
            writeln!(out, "{} of {} records", matched.len(), records.len())?;
        }
    }
    Ok(())
}

fn cmd_summary(config: &Config, input: &InputArgs, format: OutputFormat) -> Result<()> {
    let records = load_records(input)?;
    let matched = select(config, input, &records)?;
    let builder = config.kpi_builder();
    let summary = builder.build(matched.iter().copied());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", SummaryRenderer::new(builder).format(&summary)),
    }
    Ok(())
}

fn cmd_export(
    config: &Config,
    input: &InputArgs,
    layout: Option<LayoutArg>,
    output: Option<PathBuf>,
) -> Result<()> {
    let records = load_records(input)?;
    let matched: Vec<Record> = select(config, input, &records)?.into_iter().cloned().collect();
    if matched.is_empty() {
        bail!("No records match the filter; nothing to export");
    }

    let layout = layout.map_or_else(|| ExportLayout::for_kind(input.kind.into()), ExportLayout::from);
    let renderer = ExcelRenderer::new().formatter(config.export_formatter(layout));
    let output = output.unwrap_or_else(|| PathBuf::from(renderer.file_name(Local::now().date_naive())));

    let bytes = renderer
        .render_to_bytes(&matched)
        .context("Failed to render workbook")?;
    fs::write(&output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(records = matched.len(), path = %output.display(), "exported workbook");
    println!("Exported {} records to {}", matched.len(), output.display());
    Ok(())
}

fn cmd_style(values: &[String], palette: StylePalette, format: OutputFormat) -> Result<()> {
    let tokens: Vec<_> = values.iter().map(|v| resolve_style_in(palette, v)).collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
        OutputFormat::Text => {
            for token in &tokens {
                println!("{:<28} bg={:<8} text={}", token.label, token.bg_color, token.text_color);
            }
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn load_records(input: &InputArgs) -> Result<Vec<Record>> {
    let content = fs::read_to_string(&input.file)
        .with_context(|| format!("Failed to read {}", input.file.display()))?;
    let records = records_from_json(&content, input.kind.into())
        .with_context(|| format!("Failed to load records from {}", input.file.display()))?;
    debug!(count = records.len(), kind = %RecordKind::from(input.kind), "loaded records");
    Ok(records)
}

/// Filter state from `--filter`, with flag overrides applied on top
fn filter_state(input: &InputArgs) -> Result<FilterState> {
    let mut state = match &input.filter {
        Some(path) => read_filter(path)?,
        None => FilterState::default(),
    };
    if let Some(search) = &input.search {
        state.apply(FilterUpdate::Search(search.clone()));
    }
    if !input.status.is_empty() {
        state.apply(FilterUpdate::Status(set_of(&input.status)));
    }
    if input.favorite {
        state.apply(FilterUpdate::Favorite(true));
    }
    debug!(active = state.active_count(), "filter state");
    Ok(state)
}

fn read_filter(path: &Path) -> Result<FilterState> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read filter {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid filter {}", path.display()))
}

fn select<'a>(config: &Config, input: &InputArgs, records: &'a [Record]) -> Result<Vec<&'a Record>> {
    let state = filter_state(input)?;
    let today = input.today.unwrap_or_else(|| Local::now().date_naive());
    Ok(config.filter_engine(today).filter(records, &state))
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
