mod app;
mod cli;
mod config;
mod dashboard;
mod events;
mod export;
mod filter_page;
mod form;
mod service;
mod settings;
mod settings_page;
mod storage;
mod terminal;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::info;

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::service::TaskService;
use crate::storage::LocalStorage;

/// The dashboard owns the terminal, so it logs to a file; one-shot commands log to stderr.
fn init_logging(data_dir: &Path, interactive: bool) -> Result<()> {
    if !interactive {
        env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
        return Ok(());
    }
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let path = data_dir.join("todomaster.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load()?.with_overrides(cli.api_url, cli.data_dir);
    let data_dir = config.data_dir()?;
    let command = cli.command.unwrap_or(Command::Tui);
    let interactive = matches!(command, Command::Tui);

    init_logging(&data_dir, interactive)?;

    let storage = LocalStorage::open(data_dir.join("storage"))
        .with_context(|| format!("Failed to open local storage in {}", data_dir.display()))?;
    let service = TaskService::new(&config.api_base_url, storage.clone())
        .with_context(|| format!("Invalid API URL: {}", config.api_base_url))?;

    if !interactive {
        return cli::run(command, service, storage, &config).await;
    }

    info!("Starting dashboard against {}", config.api_base_url);
    let mut app = App::new(service, storage, config.export_dir());
    terminal::run(&mut app).await
}
