use clap::{Parser, ValueEnum};
use schemahub_canvas::build_diagram;
use schemahub_canvas::layout::LayoutEngine;
use schemahub_canvas::schema::Schema;
use schemahub_canvas::svg::SvgRenderer;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Svg,
}

/// Lay out a parsed DBML schema as a table diagram
#[derive(Parser, Debug)]
#[command(name = "schemahub-canvas")]
#[command(
    about = "Lay out DBML parser output as positioned nodes and foreign-key edges",
    long_about = None
)]
struct Args {
    /// Schema JSON ({ tables, refs }); use "-" for stdin
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format; inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Layout config JSON overriding the grid constants
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Table to mark as selected
    #[arg(short, long, value_name = "TABLE")]
    selected: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String, String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
    }
}

fn resolve_format(args: &Args) -> Format {
    if let Some(format) = args.format {
        return format;
    }
    match args.output.as_ref().and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        Some("svg") => Format::Svg,
        _ => Format::Json,
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let engine = match &args.config {
        Some(path) => LayoutEngine::from_json(&read_input(path)?).map_err(|e| e.to_string())?,
        None => LayoutEngine::default(),
    };

    let schema = Schema::from_json(&read_input(&args.input)?).map_err(|e| e.to_string())?;
    info!(tables = schema.tables.len(), refs = schema.refs.len(), "loaded schema");

    let diagram = build_diagram(schema, engine.clone(), args.selected.clone());
    info!(nodes = diagram.nodes.len(), edges = diagram.edges.len(), "laid out diagram");

    let rendered = match resolve_format(&args) {
        Format::Json => serde_json::to_string_pretty(&diagram)
            .map_err(|e| format!("Failed to encode diagram: {}", e))?,
        Format::Svg => SvgRenderer::default().render(&diagram.nodes, &diagram.edges, &engine),
    };

    match &args.output {
        Some(path) => fs::write(path, &rendered)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
        None => println!("{}", rendered),
    }

    Ok(())
}
