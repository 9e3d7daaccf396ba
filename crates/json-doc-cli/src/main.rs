//! `jsondoc` CLI: format, check, and query JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Pretty-print (stdin → stdout)
//! echo '{"name":"Hero","level":25}' | jsondoc format
//!
//! # Compact from file to file
//! jsondoc format --compact -i save.json -o save.min.json
//!
//! # Strict well-formedness check
//! jsondoc check -i save.json
//!
//! # Look up a dotted path
//! jsondoc get --path inventory.0 -i save.json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use json_doc::{Document, WriteOptions};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "jsondoc",
    version,
    about = "Format, check, and query JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse leniently and re-emit the document
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit without any whitespace
        #[arg(long)]
        compact: bool,
        /// Spaces per nesting level in pretty output
        #[arg(long, default_value_t = 2, conflicts_with = "compact")]
        indent: usize,
    },
    /// Parse strictly and report the first anomaly
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the compact JSON found at a dotted path (e.g. `stats.health`, `inventory.0`)
    Get {
        /// Dotted path; array elements are addressed by index
        #[arg(long)]
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Format {
            input,
            output,
            compact,
            indent,
        } => {
            let mut doc = load_document(input.as_deref())?;
            let options = if compact {
                WriteOptions::compact()
            } else {
                WriteOptions::pretty().with_indent(indent)
            };
            let mut text = doc.to_json_text_with(&options);
            text.push('\n');
            write_output(output.as_deref(), &text)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_deref())?;
            // A leading byte-order mark is not part of the document.
            let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
            json_doc::parse_strict(text).context("Document is not well-formed JSON")?;
            println!("ok");
        }
        Commands::Get { path, input } => {
            let doc = load_document(input.as_deref())?;
            let Some(found) = doc.root().pointer(&path) else {
                bail!("path not found: '{}'", path);
            };
            println!("{}", found.to_json(false));
        }
    }

    Ok(())
}

/// Lenient load through the document adapter. Absorbed anomalies are reported
/// on stderr; they never fail the command.
fn load_document(path: Option<&str>) -> Result<Document> {
    let mut doc = Document::new();
    let diagnostics = match path {
        Some(path) => doc
            .load_from_file(path)
            .with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let text = read_input(None)?;
            doc.load_from_text(text.strip_prefix('\u{feff}').unwrap_or(&text))
        }
    };
    for diagnostic in &diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    Ok(doc)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
