//! API Gateway service: scan ingress and observer listeners.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use pl_04_ingestion::IngestionService;
use pl_05_subscription_hub::SubscriptionHub;
use pl_06_query::QueryService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::middleware::create_cors_layer;
use crate::routes::{handle_scan, health_check, metrics};
use crate::ws::ws_upgrade;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionService>,
    pub query: Arc<QueryService>,
    pub hub: Arc<SubscriptionHub>,
    pub device_header: Arc<str>,
    pub token_header: Arc<str>,
    pub max_message_size: usize,
    pub shutdown: watch::Receiver<bool>,
}

/// Both listeners, wired to the services they front.
pub struct ApiGatewayService {
    config: GatewayConfig,
    ingestion: Arc<IngestionService>,
    query: Arc<QueryService>,
    hub: Arc<SubscriptionHub>,
    shutdown_tx: watch::Sender<bool>,
}

impl ApiGatewayService {
    /// Create a new API Gateway service
    pub fn new(
        config: GatewayConfig,
        ingestion: Arc<IngestionService>,
        query: Arc<QueryService>,
        hub: Arc<SubscriptionHub>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            ingestion,
            query,
            hub,
            shutdown_tx,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn state(&self) -> AppState {
        AppState {
            ingestion: Arc::clone(&self.ingestion),
            query: Arc::clone(&self.query),
            hub: Arc::clone(&self.hub),
            device_header: Arc::from(self.config.ingress.device_header.as_str()),
            token_header: Arc::from(self.config.ingress.token_header.as_str()),
            max_message_size: self.config.websocket.max_message_size,
            shutdown: self.shutdown_tx.subscribe(),
        }
    }

    /// Scan ingress plus `/health` and `/metrics`.
    ///
    /// Every other path is a scan, so a 404 always means an unregistered tag.
    pub fn ingress_router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(&self.config.cors));

        Router::new()
            .route("/", any(handle_scan))
            .route("/scan", any(handle_scan))
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .fallback(handle_scan)
            .layer(middleware)
            .with_state(self.state())
    }

    /// Observer upgrades on `/`.
    pub fn ws_router(&self) -> Router {
        Router::new()
            .route("/", get(ws_upgrade))
            .with_state(self.state())
    }

    /// Bind both listeners and serve them in the background.
    pub async fn start(self) -> Result<RunningGateway, GatewayError> {
        let (ingress, ingress_addr) = bind(self.config.http_addr()).await?;
        let (ws, ws_addr) = bind(self.config.ws_addr()).await?;

        info!(%ingress_addr, %ws_addr, "Starting API Gateway");

        let tasks = vec![
            serve("ingress", ingress, self.ingress_router(), self.shutdown_tx.subscribe()),
            serve("websocket", ws, self.ws_router(), self.shutdown_tx.subscribe()),
        ];

        Ok(RunningGateway {
            ingress_addr,
            ws_addr,
            shutdown_tx: self.shutdown_tx,
            tasks,
        })
    }
}

async fn bind(addr: SocketAddr) -> Result<(TcpListener, SocketAddr), GatewayError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind { addr, source })?;
    let local = listener
        .local_addr()
        .map_err(|source| GatewayError::Bind { addr, source })?;
    Ok((listener, local))
}

fn serve(
    name: &'static str,
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<Result<(), GatewayError>> {
    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await
            .map_err(|e| {
                error!(server = name, error = %e, "Server error");
                GatewayError::Server(format!("{name}: {e}"))
            })
    })
}

/// Handle to a started gateway.
pub struct RunningGateway {
    /// Bound scan ingress address (resolved if port 0 was requested)
    pub ingress_addr: SocketAddr,
    /// Bound observer address
    pub ws_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<Result<(), GatewayError>>>,
}

impl RunningGateway {
    /// Stop accepting, close observer connections and wait for both servers.
    pub async fn shutdown(self) -> Result<(), GatewayError> {
        info!("Shutting down API Gateway");
        self.shutdown_tx.send_replace(true);

        for task in self.tasks {
            task.await
                .map_err(|e| GatewayError::Server(e.to_string()))??;
        }
        Ok(())
    }
}
