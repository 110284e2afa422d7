//! Check command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::utils::build_source;
use crate::load::load;
use crate::schema::Schema;

#[derive(Args)]
pub struct CheckArgs {
    /// Schema file (TOML or YAML) declaring the expected fields
    #[arg(short, long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Dotenv-style file filling variables absent from the environment
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let schema = Schema::from_file(&args.schema)?;
    let source = build_source(args.env_file.as_deref())?;

    // Secrets render through Value's Display, which redacts them.
    let snapshot = load(&schema, &source)?;
    for (name, value) in snapshot.iter() {
        println!("  {:<24} {}", name, value);
    }
    println!("ok: {} field(s) loaded and validated", snapshot.len());
    Ok(())
}
