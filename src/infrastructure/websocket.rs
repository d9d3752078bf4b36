//! WebSocket stream of sheet run progress
//!
//! Clients connect to `/api/characters/{id}/sheet/ws` and receive the run's
//! progress on every stage transition until the run is terminal. When the
//! run is cancelled by a regenerate, the stream moves on to the run that
//! replaced it.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::Serialize;

use crate::application::dto::RunProgressDto;
use crate::domain::entities::PipelineStage;
use crate::domain::value_objects::CharacterId;
use crate::infrastructure::http::parse_character_id;
use crate::infrastructure::state::AppState;

/// Messages sent to progress subscribers
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ProgressMessage {
    Progress(RunProgressDto),
    Error { message: String },
}

/// WebSocket upgrade handler
pub async fn progress_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let id = parse_character_id(&id)?;
    Ok(ws.on_upgrade(move |socket| stream_progress(socket, state, id)))
}

async fn stream_progress(socket: WebSocket, state: Arc<AppState>, id: CharacterId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    tracing::info!("Progress stream opened for character {}", id);

    let Some(mut progress) = state.sheets.subscribe(id).await else {
        let error = ProgressMessage::Error {
            message: format!("No sheet run for character {}", id),
        };
        let _ = send(&mut ws_sender, &error).await;
        let _ = ws_sender.close().await;
        return;
    };

    loop {
        let run = progress.borrow_and_update().run.clone();
        let run_id = run.id;
        let stage = run.stage;

        if send(&mut ws_sender, &ProgressMessage::Progress(RunProgressDto::from(run)))
            .await
            .is_err()
        {
            break;
        }

        if stage == PipelineStage::Cancelled {
            let Some(next) = state.sheets.subscribe(id).await else {
                break;
            };
            let next_id = next.borrow().run.id;
            if next_id == run_id {
                break;
            }
            progress = next;
            continue;
        }
        if stage.is_terminal() {
            break;
        }

        tokio::select! {
            changed = progress.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            incoming = ws_receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },
        }
    }

    let _ = ws_sender.close().await;
    tracing::info!("Progress stream closed for character {}", id);
}

async fn send(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ProgressMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::warn!("Failed to serialize progress message: {}", e);
            Ok(())
        }
    }
}
