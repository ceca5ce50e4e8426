//! Realtime gateway server
//!
//! axum router with a health endpoint and a WebSocket endpoint. Each
//! incoming message maps 1:1 to one session run; the socket receives
//! exactly one terminal response per request. Requests are tracked in
//! the inbox store across their pending → running → done/failed
//! lifecycle.

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use conclave_application::ports::inbox::{InboxPort, InboxStatus};
use conclave_application::use_cases::run_session::SessionService;
use conclave_domain::session::Task;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::protocol::{GatewayRequest, GatewayResponse};
use crate::output::ConsoleFormatter;

/// Shared state behind the gateway routes.
#[derive(Clone)]
pub struct GatewayState {
    service: Arc<dyn SessionService>,
    inbox: Arc<dyn InboxPort>,
    repo_root: PathBuf,
}

impl GatewayState {
    pub fn new(
        service: Arc<dyn SessionService>,
        inbox: Arc<dyn InboxPort>,
        repo_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            service,
            inbox,
            repo_root: repo_root.into(),
        }
    }
}

/// Build the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws_upgrade))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_loop(socket, state))
}

async fn ws_loop(mut socket: WebSocket, state: GatewayState) {
    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "WebSocket receive error; closing");
                return;
            }
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => return,
            // Pings are answered by axum; ignore everything else.
            _ => continue,
        };

        let response = match serde_json::from_str::<GatewayRequest>(text.as_str()) {
            Ok(request) => process_request(&state, request).await,
            Err(e) => GatewayResponse::failed(None, "", format!("invalid request: {}", e)),
        };

        let Ok(payload) = serde_json::to_string(&response) else {
            warn!("Could not serialize gateway response");
            continue;
        };
        if socket.send(Message::Text(payload.into())).await.is_err() {
            return;
        }
    }
}

/// Handle one request: validate, track in the inbox, run a session, and
/// produce the single terminal response.
pub async fn process_request(state: &GatewayState, request: GatewayRequest) -> GatewayResponse {
    let mode = match request.session_mode() {
        Ok(mode) => mode,
        Err(e) => return GatewayResponse::failed(None, &request.mode, e),
    };

    let inbox_id = match state
        .inbox
        .insert_pending(&request.workspace, "web", mode.as_str(), &request.text)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "Inbox insert failed");
            return GatewayResponse::failed(None, mode.as_str(), format!("inbox unavailable: {}", e));
        }
    };

    if let Err(e) = state
        .inbox
        .set_status(inbox_id, InboxStatus::Running, None, None)
        .await
    {
        warn!(error = %e, inbox_id, "Could not mark inbox message running");
    }

    let task = Task::new(request.text.clone())
        .with_repo_root(state.repo_root.clone())
        .with_mode(mode);

    match state.service.run(task).await {
        Ok(outcome) => {
            let text = ConsoleFormatter::plain().format_outcome(&outcome);
            if let Err(e) = state
                .inbox
                .set_status(inbox_id, InboxStatus::Done, Some(&text), None)
                .await
            {
                warn!(error = %e, inbox_id, "Could not mark inbox message done");
            }
            GatewayResponse::done(inbox_id, mode.as_str(), text)
        }
        Err(e) => {
            let error = e.to_string();
            if let Err(e) = state
                .inbox
                .set_status(inbox_id, InboxStatus::Failed, None, Some(&error))
                .await
            {
                warn!(error = %e, inbox_id, "Could not mark inbox message failed");
            }
            GatewayResponse::failed(Some(inbox_id), mode.as_str(), error)
        }
    }
}
