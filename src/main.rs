//! quotecraft - decorate quote blocks in HTML pages

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quotecraft::block::{decorate_all, dispatch_resize, summarize};
use quotecraft::dom::{decode_html_bytes, parse_html, parse_html_bytes, select, serialize_like};
use quotecraft::observe::{SimulatedHost, Unsupported};
use quotecraft::{QuoteConfig, QuoteSummary};

#[derive(Parser)]
#[command(name = "quotecraft")]
#[command(version, about = "Decorate quote blocks in HTML pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    quotecraft page.html out.html                     Decorate every .quote block
    quotecraft page.html --viewport-width 375         Prerender the mobile layout to stdout
    quotecraft -i --json page.html                    List quote blocks as JSON")]
struct Cli {
    /// Input HTML page
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// TOML file overriding breakpoint, reveal timing or block selector
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Apply the layout class for blocks rendered at this width
    #[arg(long, value_name = "PX")]
    viewport_width: Option<f64>,

    /// List quote blocks instead of decorating
    #[arg(short, long)]
    info: bool,

    /// With --info, print JSON
    #[arg(long, requires = "info")]
    json: bool,

    /// Suppress status messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        if cli.info {
            show_info(&cli.input, &config, cli.json)
        } else {
            convert(&cli, &config)
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<QuoteConfig, String> {
    match path {
        Some(path) => QuoteConfig::load(path).map_err(|e| format!("{}: {e}", path.display())),
        None => Ok(QuoteConfig::default()),
    }
}

fn show_info(path: &Path, config: &QuoteConfig, json: bool) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let dom = parse_html_bytes(&bytes);
    let blocks = select(&dom, &config.block_selector).map_err(|e| e.to_string())?;
    let summaries: Vec<QuoteSummary> = blocks.iter().map(|&b| summarize(&dom, b)).collect();

    if json {
        let text = serde_json::to_string_pretty(&summaries).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("Quote blocks: {}", summaries.len());
    for (i, summary) in summaries.iter().enumerate() {
        println!();
        println!("[{}]{}", i + 1, if summary.decorated { " (decorated)" } else { "" });
        let quote = summary.quote.trim();
        if quote.chars().count() > 80 {
            let cut: String = quote.chars().take(80).collect();
            println!("  Quote: {cut}...");
        } else {
            println!("  Quote: {quote}");
        }
        if let Some(author) = &summary.author {
            println!("  Author: {author}");
        }
        if let Some(title) = &summary.author_title {
            println!("  Title: {title}");
        }
    }
    Ok(())
}

fn convert(cli: &Cli, config: &QuoteConfig) -> Result<(), String> {
    let bytes = std::fs::read(&cli.input).map_err(|e| format!("{}: {e}", cli.input.display()))?;
    let source = decode_html_bytes(&bytes);
    let mut dom = parse_html(&source);

    let count = match cli.viewport_width {
        Some(width) => {
            let mut host = SimulatedHost::with_support(true, false);
            let quotes = decorate_all(&mut dom, &mut host, config).map_err(|e| e.to_string())?;
            let changed = dispatch_resize(&mut dom, &quotes, &host.resize_all(width));
            info!(width, changed, "applied layout for viewport width");
            quotes.len()
        }
        None => decorate_all(&mut dom, &mut Unsupported, config)
            .map_err(|e| e.to_string())?
            .len(),
    };

    let html = serialize_like(&dom, &source);
    match &cli.output {
        Some(path) => std::fs::write(path, html).map_err(|e| format!("{}: {e}", path.display()))?,
        None => std::io::stdout()
            .write_all(html.as_bytes())
            .map_err(|e| e.to_string())?,
    }

    info!(count, input = %cli.input.display(), "decorated quote blocks");
    Ok(())
}
