use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use memedex::walker::DEFAULT_FORMATS;

#[derive(Debug, Parser)]
#[command(
    name = "memedex",
    version,
    about = "Find your memes when you want them"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a meme (or folder of memes) to the database
    Add(AddArgs),
    /// Search for the meme you want
    Search(SearchArgs),
    /// List all memes in the database
    List(ListArgs),
    /// Show data directory and database statistics
    Status(StatusArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Add --

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Path to a meme file or a folder containing memes
    pub path: PathBuf,

    /// Search recursively in the folder for memes
    #[arg(short, long)]
    pub recursive: bool,

    /// Phrases for a single meme, separated by vertical bars (|), used
    /// instead of OCR. Ignored when adding a folder
    #[arg(long, value_name = "\"KEYWORDS\"")]
    pub keywords: Option<String>,

    /// Comma-separated list of accepted file extensions
    #[arg(long, default_value = DEFAULT_FORMATS)]
    pub format: String,

    /// Tesseract language used for OCR
    #[arg(long, default_value = "chi_sim")]
    pub lang: String,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search keywords or phrases; multiple keywords are allowed
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Number of candidates to show
    #[arg(
        short = 'c',
        long = "candidates",
        short_alias = 'n',
        default_value = "1"
    )]
    pub count: usize,

    /// Show every matching meme
    #[arg(long)]
    pub all: bool,

    /// Display matching details (score and phrases)
    #[arg(short, long)]
    pub detail: bool,

    /// Output results as JSON
    #[arg(long, conflicts_with = "files")]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,
}

// -- List --

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "memedex",
            &mut std::io::stdout(),
        );
    }
}
