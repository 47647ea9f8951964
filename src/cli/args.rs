use clap::{ArgAction, Parser, Subcommand};

use crate::config::BackendKind;

#[derive(Parser)]
#[command(name = "memo")]
#[command(about = "A memo board for the terminal", version)]
pub(crate) struct Cli {
    /// Quick-add a memo with this title.
    pub(crate) content: Option<String>,

    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub(crate) version: Option<bool>,

    /// Where memos are stored: `sqlite` or `supabase`.
    #[arg(long, global = true)]
    pub(crate) backend: Option<BackendKind>,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value = "other")]
        category: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    #[command(alias = "ls")]
    List {
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long)]
        json: bool,
    },
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    Show {
        id: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Replaces all tags. Pass `--tag ""` to clear them.
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    #[command(alias = "rm")]
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    Clear {
        #[arg(long)]
        yes: bool,
    },
    Seed,
    Version,
}
