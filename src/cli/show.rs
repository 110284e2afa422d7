//! Show command implementation

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use super::utils::build_source;
use crate::load::load;
use crate::schema::Schema;

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Schema file (TOML or YAML) declaring the expected fields
    #[arg(short, long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Dotenv-style file filling variables absent from the environment
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let schema = Schema::from_file(&args.schema)?;
    let source = build_source(args.env_file.as_deref())?;
    let snapshot = load(&schema, &source)?;

    match args.format {
        OutputFormat::Json => {
            // Snapshot serialization redacts secret fields unconditionally.
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        OutputFormat::Table => {
            for (name, value) in snapshot.iter() {
                println!("{:<24} {}", name, value);
            }
        }
    }
    Ok(())
}
