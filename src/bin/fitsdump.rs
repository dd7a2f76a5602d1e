//! fitsdump - inspect the binary table of a Kepler/TESS light-curve file
//!
//! Usage:
//! cargo run --bin fitsdump -- /path/to/my/file.fits --columns

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use fits_lightcurve::{
    ColumnLayout, Decoder, DecoderConfig, FitsDocument, Keyword, LightCurve, LightCurveColumns,
    Value,
};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Decode the first binary table of a FITS file
#[derive(Parser, Debug)]
#[command(name = "fitsdump")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// FITS file to read
    file: PathBuf,

    /// Print every header card of the primary and table headers
    #[arg(long)]
    headers: bool,

    /// Print the value of a header keyword (repeatable)
    #[arg(short, long = "keyword", value_parser = Keyword::from_str)]
    keywords: Vec<Keyword>,

    /// Print the decoded columns
    #[arg(long)]
    columns: bool,

    /// Print the whole document as JSON
    #[arg(long, conflicts_with = "lightcurve")]
    json: bool,

    /// Print the time/flux series as JSON
    #[arg(long)]
    lightcurve: bool,

    /// Flux column for --lightcurve (default: PDCSAP_FLUX, SAP_FLUX or FLUX)
    #[arg(long, requires = "lightcurve")]
    flux: Option<String>,

    /// Divide flux by its median
    #[arg(long, requires = "lightcurve")]
    normalize: bool,

    /// Keep about this many points of the light curve
    #[arg(long, requires = "lightcurve")]
    downsample: Option<usize>,

    /// Decode at most this many rows
    #[arg(long)]
    max_rows: Option<u32>,

    /// How column offsets are computed
    #[arg(long, value_enum, default_value = "on-disk")]
    layout: Layout,

    /// Extension HDUs inspected before giving up
    #[arg(long, default_value_t = fits_lightcurve::parser::DEFAULT_MAX_EXTENSIONS)]
    max_extensions: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    /// Every field takes its real width
    OnDisk,
    /// Only decodable fields take space
    SupportedOnly,
}

impl From<Layout> for ColumnLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::OnDisk => ColumnLayout::OnDisk,
            Layout::SupportedOnly => ColumnLayout::SupportedOnly,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let buffer = fs::read(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;
    info!(bytes = buffer.len(), file = %cli.file.display(), "read file");

    let config = DecoderConfig::new()
        .max_extensions(cli.max_extensions)
        .column_layout(cli.layout.into())
        .max_rows(cli.max_rows);
    let document = Decoder::new(config)
        .decode(&buffer)
        .with_context(|| format!("failed to decode {}", cli.file.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }
    if cli.lightcurve {
        return print_lightcurve(&cli, &document);
    }

    print_summary(&document);
    if cli.headers {
        println!();
        println!("Primary header");
        print!("{}", document.primary_header());
        println!();
        println!("Table header");
        print!("{}", document.extension_header());
    }
    if !cli.keywords.is_empty() {
        println!();
        for keyword in &cli.keywords {
            println!("{:<8} = {}", keyword, show(&document.lookup(keyword).cloned()));
        }
    }
    if cli.columns {
        println!();
        print_columns(&document);
    }
    for warning in document.warnings() {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn show(value: &Option<Value>) -> String {
    match value {
        Some(Value::CharacterString(s)) => s.clone(),
        Some(Value::Undefined) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

fn print_summary(document: &FitsDocument) {
    let observation = document.observation();
    println!("Object:     {}", show(&observation.object));
    println!("Telescope:  {}", show(&observation.telescope));
    println!("Instrument: {}", show(&observation.instrument));
    println!("Date obs:   {}", show(&observation.date_obs));
    println!("Exposure:   {}", show(&observation.exposure));
    println!("Creator:    {}", show(&observation.creator));
    println!(
        "Table:      {} columns x {} rows",
        document.column_names().len(),
        document.row_count()
    );
}

fn print_columns(document: &FitsDocument) {
    println!("{:<20} {:<8} {:>6} {:<12} {:>8}", "NAME", "TFORM", "OFFSET", "UNIT", "MISSING");
    for column in document.table().columns() {
        let missing = column.cells.iter().filter(|c| c.is_none()).count();
        let d = &column.descriptor;
        println!(
            "{:<20} {:<8} {:>6} {:<12} {:>8}",
            d.name, d.format, d.byte_offset, d.unit, missing
        );
    }
}

fn print_lightcurve(cli: &Cli, document: &FitsDocument) -> Result<()> {
    let columns = LightCurveColumns {
        flux: cli.flux.clone(),
        ..LightCurveColumns::default()
    };
    let Some(mut curve) = LightCurve::from_document(document, &columns) else {
        bail!(
            "no time/flux columns found (available: {})",
            document.column_names().join(", ")
        );
    };
    if cli.normalize {
        curve = curve.normalized();
    }
    if let Some(target) = cli.downsample {
        curve = curve.downsample(target);
    }
    info!(points = curve.len(), "light curve");
    println!("{}", serde_json::to_string_pretty(&curve)?);
    Ok(())
}
