//! Condominium planning CLI.
//!
//! Builds a [`PlanningStore`](planning_core::PlanningStore) over the local
//! SQLite database and blob directory and dispatches one command against it.
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to trace backend
//! round trips.

mod args;
mod cli;
mod handlers;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handlers::Cli;
use log::info;
use planning_core::{PlanningStoreBuilder, SessionResolver};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        blob_dir,
        tenant,
        unit,
        user,
        no_color,
        command,
    } = Args::parse();

    let session = SessionResolver::new();
    if let Some(user) = user {
        session.sign_in(tenant, user).await;
        session.select_unit(unit).await;
    }

    let store = PlanningStoreBuilder::new()
        .with_database_path(database_file)
        .with_blob_dir(blob_dir)
        .with_resolver(Arc::new(session))
        .build()
        .await
        .context("Failed to initialize planning store")?;

    let cli = Cli::new(store, TerminalRenderer::new(!no_color));

    info!("Planning CLI started");

    match command {
        Some(Planning { command }) => cli.handle_planning_command(command).await,
        Some(Task { command }) => cli.handle_task_command(command).await,
        Some(Document { command }) => cli.handle_document_command(command).await,
        Some(Comment { command }) => cli.handle_comment_command(command).await,
        None => cli.list_plannings().await,
    }
}
