use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{CommentCommands, DocumentCommands, PlanningCommands, TaskCommands};

/// Command-line view over the condominium planning store
///
/// Plannings group the tasks, documents and comments of one initiative in a
/// condominium. Every command acts as `--user` within the `--unit` of the
/// `--tenant` organization.
#[derive(Parser)]
#[command(version, about, name = "cpl")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/condo-planning/planning.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Directory for uploaded files. Defaults to
    /// $XDG_DATA_HOME/condo-planning/blobs
    #[arg(long, global = true)]
    pub blob_dir: Option<PathBuf>,

    /// Organization the records belong to
    #[arg(long, global = true, default_value = "default")]
    pub tenant: String,

    /// Condominium unit to work in
    #[arg(long, global = true)]
    pub unit: Option<String>,

    /// User acting on the records
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without a command the plannings of the unit are
/// listed.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage plannings
    #[command(alias = "p")]
    Planning {
        #[command(subcommand)]
        command: PlanningCommands,
    },
    /// Manage tasks within a planning
    #[command(alias = "t")]
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage documents attached to a planning
    #[command(aliases = ["d", "doc"])]
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Manage comments on a planning
    #[command(alias = "c")]
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },
}
