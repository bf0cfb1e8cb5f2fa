use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::tracker::DropPolicy;

#[derive(Parser)]
#[command(name = "reorder", about = concat!("reorder v", env!("CARGO_PKG_VERSION"), " - drag-and-drop ordering for nested task lists"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding reorder.toml and the session state (default: current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    /// Override the configured drop policy (midpoint, before)
    #[arg(long, global = true)]
    pub policy: Option<DropPolicy>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a tree file as an outline
    Show(TreeArgs),
    /// Validate a tree file
    Check(TreeArgs),
    /// Drag an item onto a target and apply the resulting move
    Mv(MvArgs),
    /// Feed a gesture script through the tracker
    Replay(ReplayArgs),
    /// Revert the most recent move applied to a tree
    Undo(TreeArgs),
    /// List applied moves
    History,
    /// Show or change drop settings
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct TreeArgs {
    /// Tree file (default: the last tree used)
    pub tree: Option<PathBuf>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Item to drag
    pub item: String,
    /// Drop target: an item id, `@<id>` for an item's child list, or `@root`
    pub target: String,
    /// Pointer offset within the target (0.0 = top edge, 1.0 = bottom edge)
    #[arg(long)]
    pub offset: Option<f32>,
    /// Tree file (default: the last tree used)
    #[arg(long)]
    pub tree: Option<PathBuf>,
    /// Print the move without applying it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Gesture script file, or `-` for stdin
    pub script: String,
    /// Tree file (default: the last tree used)
    #[arg(long)]
    pub tree: Option<PathBuf>,
    /// Apply emitted moves and save the tree
    #[arg(long)]
    pub apply: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Set the drop policy in reorder.toml
    #[arg(long)]
    pub set_policy: Option<DropPolicy>,
    /// Set the midpoint threshold in reorder.toml (0.0 to 1.0)
    #[arg(long)]
    pub threshold: Option<f32>,
}
