//! Non-interactive mode: opens one page, sends each message in turn and
//! prints the transcript.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use client_core::{ChatBackend, ChatController, ChatMessage, ChatView, MessageList};
use shared::domain::{ChatMode, Page};

use crate::{config::Settings, ui::TerminalView};

pub fn run<B: ChatBackend>(
    backend: B,
    page: Page,
    settings: &Settings,
    messages: &[String],
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    runtime
        .block_on(run_session(backend, page, settings, messages, io::stdout()))
        .map(|_| ())
}

pub async fn run_session<B, W>(
    backend: B,
    page: Page,
    settings: &Settings,
    messages: &[String],
    out: W,
) -> Result<W>
where
    B: ChatBackend,
    W: Write,
{
    let Some(mode) = page.mode() else {
        bail!("--send needs a chat page; pass --page flow or --page rag");
    };

    let mut controller = ChatController::new(page, backend, TerminalView::new(out, page));
    if mode == ChatMode::Rag {
        controller.view_mut().append_message(
            MessageList::Rag,
            ChatMessage::bot(settings.rag_welcome.clone()),
        );
    }
    controller.initialize().await;

    for message in messages {
        match mode {
            ChatMode::Flow => {
                if controller.session().is_flow_finished() {
                    tracing::info!("flow finished; remaining messages not sent");
                    break;
                }
                let outcome = controller.send_flow_message(message).await;
                tracing::debug!(?outcome, "flow message handled");
            }
            ChatMode::Rag => {
                let outcome = controller.send_rag_message(message).await;
                tracing::debug!(?outcome, "rag message handled");
            }
        }
    }

    Ok(controller.into_view().into_inner())
}
