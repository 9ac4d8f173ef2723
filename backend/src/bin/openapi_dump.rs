//! Print the OpenAPI document.
//!
//! ```sh
//! cargo run --bin openapi-dump -- --format yaml
//! ```

use std::io::Write;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use todo_backend::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// Dump the generated OpenAPI document to stdout.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Cli {
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let doc = ApiDoc::openapi();
    let rendered = match cli.format {
        Format::Json => doc.to_pretty_json()?,
        Format::Yaml => doc.to_yaml()?,
    };
    writeln!(std::io::stdout().lock(), "{rendered}")?;
    Ok(())
}
