use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "jasper")]
#[command(about = "Command-line access to the Jasper text-processing backend")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Backend URL (defaults to the configured backend, e.g. http://127.0.0.1:5123)
    #[arg(long, global = true)]
    pub(crate) server: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}
