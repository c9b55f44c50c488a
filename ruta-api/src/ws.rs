use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use ruta_domain::events::SeatEvent;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RoomQuery {
    /// Stable viewer identity for advisory selections; generated per
    /// connection when absent.
    #[serde(default)]
    client: Option<String>,
}

/// Client → server messages inside a trip room. Joining the room is
/// connecting to the URL.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClientMessage {
    #[serde(rename = "seat:select", rename_all = "camelCase")]
    Select { seat_id: Uuid },
    #[serde(rename = "seat:release", rename_all = "camelCase")]
    Release { seat_id: Uuid },
    #[serde(rename = "trip:leave")]
    Leave,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/trips/{trip_id}/ws", get(trip_room))
}

async fn trip_room(
    ws: WebSocketUpgrade,
    Path(trip_id): Path<Uuid>,
    Query(query): Query<RoomQuery>,
    State(state): State<AppState>,
) -> Response {
    let holder = query
        .client
        .unwrap_or_else(|| format!("viewer-{}", Uuid::new_v4()));
    ws.on_upgrade(move |socket| handle_room(socket, trip_id, holder, state))
}

async fn handle_room(socket: WebSocket, trip_id: Uuid, holder: String, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.notifier.subscribe();

    debug!(%trip_id, %holder, "viewer joined trip room");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(payload) = event_for_room(&event, trip_id) {
                        if sink.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Clients re-render from GET seats after a gap
                    warn!(%trip_id, skipped, "trip room subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if !handle_client_message(&state, trip_id, &holder, &mut sink, text.as_str()).await {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Ping/pong is answered by axum itself
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    debug!(%trip_id, %holder, "viewer left trip room");
    // Advisory selections held by this viewer expire on their own TTL.
}

/// Serializes an event for delivery if it belongs to this room; events for
/// other trips are dropped at the subscriber.
fn event_for_room(event: &SeatEvent, trip_id: Uuid) -> Option<String> {
    if event.trip_id() != trip_id {
        return None;
    }
    match serde_json::to_string(event) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!("failed to serialize seat event: {err}");
            None
        }
    }
}

/// Returns false when the room loop should end.
async fn handle_client_message(
    state: &AppState,
    trip_id: Uuid,
    holder: &str,
    sink: &mut SplitSink<WebSocket, Message>,
    text: &str,
) -> bool {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(err) => {
            let body = json!({ "type": "error", "message": format!("unrecognized message: {err}") });
            return send_json(sink, &body).await;
        }
    };

    match message {
        ClientMessage::Select { seat_id } => {
            match state.selection.select(trip_id, seat_id, holder).await {
                Ok(granted) => {
                    let body = json!({ "type": "seat:select:result", "seatId": seat_id, "ok": granted });
                    send_json(sink, &body).await
                }
                Err(err) => {
                    warn!(%trip_id, %seat_id, "selection failed: {err}");
                    let body = json!({ "type": "error", "message": "selection unavailable" });
                    send_json(sink, &body).await
                }
            }
        }
        ClientMessage::Release { seat_id } => {
            match state.selection.release(trip_id, seat_id, holder).await {
                Ok(released) => {
                    let body = json!({ "type": "seat:release:result", "seatId": seat_id, "ok": released });
                    send_json(sink, &body).await
                }
                Err(err) => {
                    warn!(%trip_id, %seat_id, "release failed: {err}");
                    let body = json!({ "type": "error", "message": "selection unavailable" });
                    send_json(sink, &body).await
                }
            }
        }
        ClientMessage::Leave => false,
    }
}

async fn send_json(sink: &mut SplitSink<WebSocket, Message>, body: &serde_json::Value) -> bool {
    sink.send(Message::Text(body.to_string().into()))
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ruta_engine::SeatNotifier;

    #[tokio::test]
    async fn room_filter_forwards_only_matching_trip() {
        let notifier = SeatNotifier::new(16);
        let mut rx = notifier.subscribe();

        let room = Uuid::new_v4();
        let other_room = Uuid::new_v4();
        notifier.publish(SeatEvent::Released {
            trip_id: other_room,
            seat_id: Uuid::new_v4(),
        });
        notifier.publish(SeatEvent::Locked {
            trip_id: room,
            seat_ids: vec![Uuid::new_v4()],
            locked_until: Utc::now(),
        });

        let foreign = rx.recv().await.expect("receives");
        assert!(event_for_room(&foreign, room).is_none());

        let local = rx.recv().await.expect("receives");
        let payload = event_for_room(&local, room).expect("event for this room");
        let value: serde_json::Value = serde_json::from_str(&payload).expect("json payload");
        assert_eq!(value["type"], "seat:locked");
        assert_eq!(value["tripId"], room.to_string());
    }

    #[test]
    fn client_messages_parse_wire_names() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type": "seat:select", "seatId": "4b4a6f2e-8c2f-4a7e-9f2a-111111111111"}"#,
        )
        .expect("parses");
        assert!(matches!(msg, ClientMessage::Select { .. }));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "trip:leave"}"#).expect("parses");
        assert!(matches!(msg, ClientMessage::Leave));

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "seat:buy"}"#).is_err());
    }
}
