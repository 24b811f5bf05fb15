use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tick", about = concat!("[x] tickmark v", env!("CARGO_PKG_VERSION"), " - a markdown checklist that keeps time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// List file (default: [list] default_file from config, else tasks.md)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: tickmark.toml beside the list file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite the list in normalized form
    Fmt(FmtArgs),
    /// Show every line with its depth, kind and times
    List,
    /// Append a task at the end of the list or under a line
    Add(AddArgs),
    /// Insert a task after a line (as the first child of a heading)
    Insert(InsertArgs),
    /// Change a task's title
    Title(TitleArgs),
    /// Remove a line and everything nested under it
    Rm(LineArg),
    /// Move a line and its children so they start at another line
    Mv(MvArgs),
    /// Nest lines under their previous sibling
    Indent(RangeArgs),
    /// Move lines out to their parent's level
    Outdent(RangeArgs),
    /// Start timing a task (stops any other running task)
    Start(LineArg),
    /// Stop timing a task and add the elapsed time
    Stop(LineArg),
    /// Toggle a task's completion
    Done(LineArg),
    /// Write the list for the next day
    Carry(CarryArgs),
    /// Set a reminder on a line
    Alarm(AlarmArgs),
    /// Link a calendar event to a line
    Link(LinkArgs),
    /// Edit the config file
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FmtArgs {
    /// Exit with an error if the file is not already normalized
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct LineArg {
    /// Line number (1-based)
    pub line: usize,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title, optionally with ~time and #tags
    pub title: String,
    /// Add as the last child of this line
    #[arg(long, value_name = "LINE")]
    pub under: Option<usize>,
}

#[derive(Args)]
pub struct InsertArgs {
    /// Line to insert after
    pub line: usize,
    /// Title for the new task; without one an empty checkbox is written
    pub title: Option<String>,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Line number of the task
    pub line: usize,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Line to move
    pub from: usize,
    /// Line the block should start at afterwards
    pub to: usize,
}

#[derive(Args)]
pub struct RangeArgs {
    /// First line of the range
    pub first: usize,
    /// Last line of the range (default: same as first)
    pub last: Option<usize>,
}

#[derive(Args)]
pub struct CarryArgs {
    /// Write the carried list here instead of rewriting the list file
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
    /// Keep only the completed tasks (a log of what got done)
    #[arg(long)]
    pub completed: bool,
}

#[derive(Args)]
pub struct AlarmArgs {
    /// Line number
    pub line: usize,
    /// Fire this many minutes from now
    #[arg(long = "in", value_name = "MIN")]
    pub in_minutes: Option<i64>,
    /// Fire at this time (RFC 3339)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct LinkArgs {
    /// Line number
    pub line: usize,
    /// Calendar event ID
    pub event_id: String,
}

// ---------------------------------------------------------------------------
// Config subcommands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Set a dotted key, e.g. `tags.colors.work blue`
    Set(ConfigSetArgs),
    /// Print the effective config
    Show,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}
