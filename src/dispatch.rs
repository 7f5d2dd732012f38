// ABOUTME: Background dispatcher — performs webhook calls off the UI task.
// ABOUTME: Receives send requests over mpsc and reports each outcome back to the UI.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::webhook::{Webhook, WebhookError, WebhookReply, WebhookRequest};

/// Requests sent from the UI to the dispatcher.
#[derive(Debug)]
pub enum DispatchRequest {
    /// Deliver a message on behalf of a session.
    Send {
        session_id: String,
        request: WebhookRequest,
    },
    /// Stop the dispatcher.
    Quit,
}

/// Events sent from the dispatcher back to the UI.
#[derive(Debug)]
pub enum DispatchEvent {
    Completed {
        session_id: String,
        outcome: Result<WebhookReply, WebhookError>,
    },
}

/// Run the dispatcher until `Quit` arrives or the request channel closes.
///
/// Requests are handled one at a time, in arrival order. `Quit` or a closed
/// channel drops the call in flight instead of waiting for it.
pub async fn run_dispatcher(
    webhook: Arc<dyn Webhook>,
    mut request_rx: mpsc::Receiver<DispatchRequest>,
    event_tx: mpsc::Sender<DispatchEvent>,
) {
    let mut queued: VecDeque<(String, WebhookRequest)> = VecDeque::new();

    'outer: loop {
        let (session_id, request) = match queued.pop_front() {
            Some(next) => next,
            None => match request_rx.recv().await {
                Some(DispatchRequest::Send {
                    session_id,
                    request,
                }) => (session_id, request),
                Some(DispatchRequest::Quit) | None => break,
            },
        };

        let deliver = webhook.deliver(&request);
        tokio::pin!(deliver);
        let outcome = loop {
            tokio::select! {
                outcome = &mut deliver => break outcome,
                next = request_rx.recv() => match next {
                    Some(DispatchRequest::Send { session_id, request }) => {
                        queued.push_back((session_id, request));
                    }
                    Some(DispatchRequest::Quit) | None => {
                        debug!("abandoning in-flight exchange for session {}", session_id);
                        break 'outer;
                    }
                },
            }
        };

        debug!("exchange for session {} finished: ok={}", session_id, outcome.is_ok());
        if event_tx
            .send(DispatchEvent::Completed {
                session_id,
                outcome,
            })
            .await
            .is_err()
        {
            break;
        }
    }
    debug!("dispatcher stopped");
}
