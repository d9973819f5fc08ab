use super::hub::ProgressHub;
use crate::state::AppState;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Progress stream. The first message carries the connection id to pass as
/// `connection_id` on `/upload`.
#[utoipa::path(
    get,
    path = "/ws",
    responses(
        (status = 101, description = "Switching to the progress WebSocket")
    ),
    tag = "Progress"
)]
pub async fn progress_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let hub = state.progress.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<ProgressHub>) {
    let (id, mut events) = hub.register().await;
    let active = hub.connection_count().await;
    info!(connection_id = %id, active, "🔌 Progress client connected");

    let (mut ws_sender, mut receiver) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(j) => j,
                Err(e) => {
                    warn!("Failed to encode progress event: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        // Hub shut down.
        let _ = ws_sender.send(Message::Close(None)).await;
    });

    // Clients only ever close; anything else they send is ignored.
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    hub.remove(id).await;
    send_task.abort();
    info!(connection_id = %id, "🔌 Progress client disconnected");
}
