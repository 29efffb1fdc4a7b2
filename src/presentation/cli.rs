// Command line arguments
use crate::application::series_service::DocumentKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "energy-timeseries", version, about = "Convert energy metering time series between JSON and tables")]
pub struct Cli {
    /// Text encoding of JSON files (overrides settings)
    #[arg(long, global = true)]
    pub encoding: Option<String>,

    /// Pretty-print JSON output files
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Series,
    Frame,
    Collection,
}

impl From<KindArg> for DocumentKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::Series => DocumentKind::Series,
            KindArg::Frame => DocumentKind::Frame,
            KindArg::Collection => DocumentKind::Collection,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a JSON document as a table
    Show {
        file: PathBuf,

        /// Document model (detected from its fields when omitted)
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// UTC, a fixed offset such as +01:00, or an IANA name
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Write one series file per column of a frame
    Split { frame: PathBuf, out_dir: PathBuf },

    /// Merge series files sharing one index into a frame
    Merge {
        output: PathBuf,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}
