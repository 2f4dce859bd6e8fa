use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "conformance-runner", about = "Run the Promises/A+ conformance cases")]
pub struct Cli {
    /// Only run cases whose id contains this text.
    #[arg(long)]
    pub filter: Option<String>,

    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    #[arg(long, default_value_t = false)]
    pub analyze: bool,

    /// Write a JSON report to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Engine settings as JSON, e.g. `{ "max_steps": 10000 }`.
    #[arg(long)]
    pub engine: Option<PathBuf>,
}
