//! One observer connection.
//!
//! Every frame to the client, broadcast or query response, goes through the
//! observer's hub queue. A single writer task drains that queue, so the client
//! sees frames in the order they were queued. Query requests are answered on
//! the blocking pool and their responses are queued behind whatever broadcasts
//! were already pending.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use pl_05_subscription_hub::{ObserverId, Subscription, SubscriptionHub};
use pl_06_query::QueryService;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::service::AppState;

/// Upgrade handler for the observer listener.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let hub_config = state.hub.config();
    if state.hub.observer_count() >= hub_config.max_observers {
        warn!(limit = hub_config.max_observers, "Refusing observer upgrade");
        return (StatusCode::SERVICE_UNAVAILABLE, "Observer limit reached").into_response();
    }

    let connection = ObserverConnection::new(
        Arc::clone(&state.hub),
        Arc::clone(&state.query),
        state.shutdown.clone(),
    );
    ws.max_message_size(state.max_message_size)
        .on_upgrade(move |socket| connection.run(socket))
}

/// Drives one upgraded socket until the client leaves, the observer is
/// evicted, or the gateway shuts down.
pub struct ObserverConnection {
    hub: Arc<SubscriptionHub>,
    query: Arc<QueryService>,
    shutdown: watch::Receiver<bool>,
}

impl ObserverConnection {
    pub fn new(
        hub: Arc<SubscriptionHub>,
        query: Arc<QueryService>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            hub,
            query,
            shutdown,
        }
    }

    pub async fn run(self, socket: WebSocket) {
        let ObserverConnection {
            hub,
            query,
            mut shutdown,
        } = self;

        let Subscription { id, mut frames } = match hub.subscribe() {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!(error = %e, "Observer rejected");
                let _ = socket.close().await;
                return;
            }
        };
        info!(observer = %id, "Observer connected");

        let (mut sink, mut stream) = socket.split();

        let mut writer = tokio::spawn(async move {
            while let Some(frame) = frames.recv().await {
                if sink.send(Message::Text(frame.to_string())).await.is_err() {
                    break;
                }
            }
            // Queue closed: evicted or unsubscribed.
            let _ = sink.close().await;
        });

        if !*shutdown.borrow() {
            loop {
                tokio::select! {
                    incoming = stream.next() => {
                        let text = match incoming {
                            Some(Ok(Message::Text(text))) => text,
                            Some(Ok(Message::Binary(data))) => {
                                String::from_utf8_lossy(&data).into_owned()
                            }
                            Some(Ok(Message::Close(_))) | None => break,
                            Some(Ok(_)) => continue,
                            Some(Err(e)) => {
                                debug!(observer = %id, error = %e, "Observer read failed");
                                break;
                            }
                        };
                        if !answer(&hub, &query, id, text).await {
                            break;
                        }
                    }
                    _ = shutdown.changed() => break,
                    _ = &mut writer => break,
                }
            }
        }

        hub.unsubscribe(id);
        writer.abort();
        info!(observer = %id, "Observer disconnected");
    }
}

/// Answer one request. Returns false once the observer can no longer be
/// written to.
async fn answer(
    hub: &SubscriptionHub,
    query: &Arc<QueryService>,
    id: ObserverId,
    text: String,
) -> bool {
    let query = Arc::clone(query);
    let response = match tokio::task::spawn_blocking(move || query.handle_request(&text)).await
    {
        Ok(response) => response,
        Err(e) => {
            error!(observer = %id, error = %e, "Query task failed");
            return true;
        }
    };

    match hub.send_to(id, &response) {
        Ok(()) => true,
        Err(e) => {
            debug!(observer = %id, error = %e, "Response not queued");
            false
        }
    }
}
