use futures::{future, Sink, SinkExt, StreamExt};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast::{self, error::RecvError};
use warp::ws::{Message, WebSocket};
use warp::Filter;

use crate::error::StartupError;
use crate::events::broadcast::{CalendarEvent, TaskBroadcaster};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub fn health_status() -> HealthStatus {
    HealthStatus { status: "ok" }
}

/// Claims the viewer port up front so a taken port fails startup.
pub async fn bind_viewer_listener(port: u16) -> Result<TcpListener, StartupError> {
    TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|source| StartupError::Bind { port, source })
}

/// `GET /health` and the `GET /ws` viewer socket, restricted to the trusted
/// viewer origin.
pub fn routes(
    broadcaster: TaskBroadcaster,
    viewer_origin: String,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&health_status()));

    let viewers = warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_broadcaster(broadcaster))
        .map(|ws: warp::ws::Ws, broadcaster: TaskBroadcaster| {
            ws.on_upgrade(move |socket| serve_viewer(socket, broadcaster))
        });

    let cors = warp::cors()
        .allow_origin(viewer_origin.as_str())
        .allow_methods(vec!["GET", "POST"]);

    health.or(viewers).with(cors)
}

fn with_broadcaster(
    broadcaster: TaskBroadcaster,
) -> impl Filter<Extract = (TaskBroadcaster,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || broadcaster.clone())
}

pub async fn serve_viewer(socket: WebSocket, broadcaster: TaskBroadcaster) {
    let rx = broadcaster.subscribe();
    tracing::info!(viewers = broadcaster.viewer_count(), "viewer connected");

    let (ws_tx, mut ws_rx) = socket.split();
    let sink = ws_tx.with(|text: String| future::ok::<Message, warp::Error>(Message::text(text)));

    // Viewers never send anything meaningful; read only to notice the close.
    let inbound = async {
        while let Some(frame) = ws_rx.next().await {
            match frame {
                Ok(msg) if msg.is_close() => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(error = %err, "viewer socket error");
                    break;
                }
            }
        }
    };

    tokio::select! {
        delivered = pump_events(rx, sink) => {
            tracing::debug!(delivered, "viewer stream ended");
        }
        _ = inbound => {}
    }
    tracing::info!("viewer disconnected");
}

/// Forwards every event from `rx` into `sink` as JSON text until either side
/// closes. Returns the number of events delivered.
pub async fn pump_events<S>(mut rx: broadcast::Receiver<CalendarEvent>, sink: S) -> usize
where
    S: Sink<String>,
{
    futures::pin_mut!(sink);
    let mut delivered = 0;
    loop {
        match rx.recv().await {
            Ok(event) => {
                let payload = match event.to_json() {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::error!(error = %err, "failed to encode calendar event");
                        continue;
                    }
                };
                if sink.send(payload).await.is_err() {
                    break;
                }
                delivered += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "viewer fell behind; events dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
    delivered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_payload_is_fixed() {
        let json = serde_json::to_value(health_status()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }
}
