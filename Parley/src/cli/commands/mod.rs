use clap::Subcommand;
use parleygraph::formats::DocumentFormat;
use std::path::PathBuf;
use std::str::FromStr;

pub mod convert;
pub mod execute;
pub mod list;
pub mod play;
pub mod show;
pub mod validate;

/// Target format for `convert`
#[derive(Debug, Clone, Copy)]
pub struct FormatArg(pub DocumentFormat);

impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "record" | "legacy" | "flat" => Ok(FormatArg(DocumentFormat::Record)),
            "typed" | "schema" => Ok(FormatArg(DocumentFormat::Typed)),
            _ => Err(format!(
                "Invalid format '{s}'. Valid values: record/legacy/flat, typed/schema"
            )),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List discovered dialogues
    List {
        /// Only show dialogues with this load tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Print an outline of a dialogue graph
    Show {
        /// Dialogue name (file stem)
        name: String,
    },

    /// Check dialogue graphs for structural problems
    Validate {
        /// Dialogue name; all dialogues when omitted
        name: Option<String>,

        /// Hide warnings
        #[arg(short, long)]
        quiet: bool,
    },

    /// Play a conversation in the terminal
    Play {
        /// Dialogue name (file stem)
        name: String,

        /// Choices to take at player nodes, in order (e.g. "0,2,1");
        /// prompts on stdin once these run out
        #[arg(short, long, value_delimiter = ',')]
        choices: Vec<usize>,

        /// Start at this node ID instead of the dialogue's start point
        #[arg(long)]
        start: Option<i32>,
    },

    /// Convert a dialogue document between the record and typed formats
    Convert {
        /// Source document (either format)
        source: PathBuf,

        /// Output file
        destination: PathBuf,

        /// Output format (record, typed)
        #[arg(long, default_value = "typed")]
        to: FormatArg,
    },
}
