//! # Factura CLI
//!
//! Prints the totals of an invoice or purchase order read from JSON.
//!
//! ## Usage
//! ```bash
//! # Read a document file
//! factura invoice.json
//!
//! # Read stdin and replace the global discount
//! cat order.json | factura - --discount 5
//!
//! # Refuse documents that the form would not save
//! factura invoice.json --validate
//!
//! # More logging
//! RUST_LOG=factura=trace factura invoice.json
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ──► tracing-subscriber, RUST_LOG or default     │
//! │  2. Parse Arguments ─────► input path, --discount, --validate          │
//! │  3. Load Config ─────────► FACTURA_* env over CurrencyConfig::default  │
//! │  4. Read + Render ───────► TotalsCalculator bound once, summary out    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod summary;

use std::env;
use std::io::Read;
use std::process::ExitCode;

use factura_core::numeric::parse_leading_decimal;
use factura_core::TotalsCalculator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use error::{CliError, CliResult};
use summary::{DocumentInput, RenderOptions};

/// Parsed command line.
#[derive(Debug, Default)]
struct Args {
    /// File path, or `-` for stdin.
    input: Option<String>,
    options: RenderOptions,
    help: bool,
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "factura failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let calculator = TotalsCalculator::new(config::from_env());
    let source = args.input.unwrap_or_else(|| "-".to_string());
    info!(%source, "Reading document");

    let json = read_input(&source)?;
    let document = DocumentInput::from_json(&json)?;
    let text = summary::render(&calculator, document, &args.options)?;
    print!("{}", text);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so the summary on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,factura=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> CliResult<Args> {
    let raw: Vec<String> = raw.into_iter().collect();
    let mut args = Args::default();

    let mut i = 0;
    while i < raw.len() {
        match raw[i].as_str() {
            "--discount" | "-d" => {
                let value = raw
                    .get(i + 1)
                    .ok_or_else(|| CliError::Usage("--discount needs a percentage".to_string()))?;
                let discount = parse_leading_decimal(value).ok_or_else(|| {
                    CliError::Usage(format!("--discount: '{}' is not a number", value))
                })?;
                args.options.discount_override = Some(discount);
                i += 1;
            }
            "--validate" | "-v" => args.options.validate = true,
            "--help" | "-h" => args.help = true,
            other if other.starts_with("--") => {
                return Err(CliError::Usage(format!("unknown option '{}'", other)));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage("only one input file is accepted".to_string()));
                }
                args.input = Some(path.to_string());
            }
        }
        i += 1;
    }

    Ok(args)
}

fn read_input(source: &str) -> CliResult<String> {
    let mut json = String::new();
    if source == "-" {
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|source| CliError::Read {
                path: "stdin".to_string(),
                source,
            })?;
    } else {
        json = std::fs::read_to_string(source).map_err(|err| CliError::Read {
            path: source.to_string(),
            source: err,
        })?;
    }
    Ok(json)
}

fn print_usage() {
    println!("Factura document totals");
    println!();
    println!("Usage: factura [FILE|-] [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --discount <PCT>  Replace the document's global discount");
    println!("  -v, --validate        Fail if the document would not save");
    println!("  -h, --help            Show this help");
    println!();
    println!("Environment:");
    println!("  FACTURA_CURRENCY_CODE, FACTURA_CURRENCY_SYMBOL, FACTURA_LOCALE,");
    println!("  FACTURA_GROUP_SEPARATOR, FACTURA_DECIMAL_SEPARATOR, FACTURA_DEFAULT_TAX_RATE");
    println!("  RUST_LOG (default: info,factura=debug)");
}
