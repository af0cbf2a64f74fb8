use std::{io, path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod scripted;
#[cfg(test)]
mod test_support;
mod ui;

use anyhow::Result;
use clap::Parser;
use client_core::HttpChatBackend;
use crossbeam_channel::bounded;
use shared::domain::Page;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::runtime,
    config::{load_settings, normalize_server_url, Settings},
    controller::events::UiEvent,
    ui::{input::spawn_stdin_reader, TerminalApp},
};

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the guided flow and document Q&A chat server")]
struct Args {
    /// Base URL of the chat server. Overrides the config file and environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Page to open first: home, flow or rag.
    #[arg(long, default_value = "home")]
    page: Page,
    /// Config file; `chat_terminal.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_filter: Option<String>,
    /// Send these messages in order without prompting, print the transcript and exit.
    #[arg(long = "send", value_name = "MESSAGE")]
    messages: Vec<String>,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url.as_deref() {
        settings.server_url = normalize_server_url(server_url)?;
    }
    if let Some(log_filter) = args.log_filter {
        settings.log_filter = log_filter;
    }
    init_tracing(&settings);
    tracing::info!(server_url = %settings.server_url, page = %args.page, "starting chat terminal");

    let backend = Arc::new(HttpChatBackend::new(&settings.server_url)?);

    if !args.messages.is_empty() {
        return scripted::run(backend, args.page, &settings, &args.messages);
    }

    let (cmd_tx, cmd_rx) = bounded(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let _worker = runtime::launch(backend, cmd_rx, ui_tx.clone());
    let _stdin = spawn_stdin_reader(ui_tx);

    TerminalApp::new(settings, cmd_tx, ui_rx, io::stdout()).run(args.page)
}
