//! Runtime bridge between the UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::ChatBackend;
use crossbeam_channel::{Receiver, Sender};

use crate::{backend_bridge::commands::BackendCommand, controller::events::UiEvent};

/// Starts the backend worker thread. Page loads are awaited in queue order;
/// chat requests run as independent tasks and may overlap.
pub fn launch<B>(
    backend: Arc<B>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()>
where
    B: ChatBackend + 'static,
{
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadPage { page } => {
                        tracing::info!(page = %page, "backend: load_page");
                        let result = backend.load_page(page).await;
                        let _ = ui_tx.send(UiEvent::PageLoaded { page, result });
                    }
                    BackendCommand::NextFlowQuestion { ticket, request } => {
                        tracing::info!(
                            generation = ticket.generation,
                            has_answer = request.answer.is_some(),
                            "backend: next_flow_question"
                        );
                        let backend = backend.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let result = backend.next_flow_question(&request).await;
                            let _ = ui_tx.send(UiEvent::FlowReplied { ticket, result });
                        });
                    }
                    BackendCommand::RagChat { ticket, request } => {
                        tracing::info!(generation = ticket.generation, "backend: rag_chat");
                        let backend = backend.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let result = backend.rag_chat(&request).await;
                            let _ = ui_tx.send(UiEvent::RagReplied { ticket, result });
                        });
                    }
                    BackendCommand::RagStatus => {
                        tracing::info!("backend: rag_status");
                        let backend = backend.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let result = backend.rag_status().await;
                            let _ = ui_tx.send(UiEvent::RagStatus(result));
                        });
                    }
                }
            }
            tracing::debug!("backend command queue closed; worker exiting");
        });
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use client_core::{RequestTicket, SessionState};
    use crossbeam_channel::bounded;
    use shared::{
        domain::{ChatMode, Page},
        protocol::{RagReply, RagRequest},
    };

    use super::*;
    use crate::test_support::EchoBackend;

    fn next_reply(ui_rx: &Receiver<UiEvent>) -> UiEvent {
        loop {
            match ui_rx.recv_timeout(Duration::from_secs(5)).expect("ui event") {
                UiEvent::Info(_) => continue,
                event => return event,
            }
        }
    }

    #[test]
    fn worker_loads_page_then_answers_rag_request() {
        let backend = Arc::new(EchoBackend::default());
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let worker = launch(backend.clone(), cmd_rx, ui_tx);

        let mut session = SessionState::new();
        let ticket: RequestTicket = session.issue_ticket(ChatMode::Rag, true);
        cmd_tx
            .send(BackendCommand::LoadPage { page: Page::RagChat })
            .expect("send");
        cmd_tx
            .send(BackendCommand::RagChat {
                ticket,
                request: RagRequest::new("hello"),
            })
            .expect("send");

        match next_reply(&ui_rx) {
            UiEvent::PageLoaded { page, result } => {
                assert_eq!(page, Page::RagChat);
                assert!(result.is_ok());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match next_reply(&ui_rx) {
            UiEvent::RagReplied { ticket: got, result } => {
                assert_eq!(got, ticket);
                assert_eq!(result.expect("reply"), RagReply::Answer("echo: hello".into()));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(cmd_tx);
        worker.join().expect("worker exits once the queue closes");
        assert_eq!(*backend.pages.lock().expect("pages"), vec![Page::RagChat]);
    }
}
