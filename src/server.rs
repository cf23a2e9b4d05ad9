//! HTTP surface so a remote interpreter and the local channel can be
//! deployed on opposite sides of a network boundary.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use crate::channel::ActionChannel;
use crate::config::ServerConfig;
use crate::consumer::{
    attach, DateRangeStore, DisplayModeStore, JsonFilePrefs, MemoryPrefs, NavigationStore,
    PreferenceStore,
};
use crate::types::UiSnapshot;

pub mod dashboard;
pub mod error;
pub mod interpret;
pub mod openapi;

/// Shared state handed to every handler.
pub struct ServerState {
    pub channel: Mutex<ActionChannel>,
    pub navigation: Arc<Mutex<NavigationStore>>,
    pub date_range: Arc<Mutex<DateRangeStore>>,
    pub display_mode: Arc<Mutex<DisplayModeStore>>,
}

impl ServerState {
    /// Build the channel and the three stores, and perform the mount
    /// handshake for each domain.
    pub fn new(config: &ServerConfig) -> Self {
        let prefs: Arc<dyn PreferenceStore> = match &config.prefs_path {
            Some(path) => Arc::new(JsonFilePrefs::open(path)),
            None => Arc::new(MemoryPrefs::new()),
        };
        let navigation = Arc::new(Mutex::new(NavigationStore::new(prefs.clone())));
        let date_range = Arc::new(Mutex::new(DateRangeStore::new(prefs.clone())));
        let display_mode = Arc::new(Mutex::new(DisplayModeStore::new(prefs)));

        let mut channel = ActionChannel::with_config(config.channel_config());
        attach(&mut channel, navigation.clone());
        attach(&mut channel, date_range.clone());
        attach(&mut channel, display_mode.clone());

        Self {
            channel: Mutex::new(channel),
            navigation,
            date_range,
            display_mode,
        }
    }

    /// Snapshot of the live store values, used when a dispatch request
    /// does not carry its own snapshot.
    pub fn live_snapshot(&self) -> Result<UiSnapshot, error::ApiError> {
        let page = self
            .navigation
            .lock()
            .map_err(|_| error::ApiError::internal("navigation store lock poisoned"))?
            .token();
        let date_range = self
            .date_range
            .lock()
            .map_err(|_| error::ApiError::internal("date-range store lock poisoned"))?
            .token();
        let display_mode = self
            .display_mode
            .lock()
            .map_err(|_| error::ApiError::internal("display-mode store lock poisoned"))?
            .token();
        Ok(UiSnapshot::new(page, date_range, display_mode))
    }
}

pub fn app(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/health", get(health))
        .route("/interpret", post(interpret::interpret_message))
        .route("/dispatch", post(interpret::dispatch_message))
        .route("/actions", post(interpret::publish_actions))
        .route("/state", get(dashboard::dashboard_state))
        .route("/openapi.json", get(openapi::openapi_json))
        .with_state(state)
        .layer(cors)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    state: Arc<ServerState>,
}

impl Server {
    /// Bind `127.0.0.1:port` (a zero port picks a free one) and serve in a
    /// background task until [`Server::shutdown`] or drop.
    pub async fn new(config: ServerConfig) -> Result<Self, String> {
        let state = Arc::new(ServerState::new(&config));
        let app = app(state.clone());

        let listener = TcpListener::bind(("127.0.0.1", config.port))
            .await
            .map_err(|error| error.to_string())?;
        let addr = listener.local_addr().map_err(|error| error.to_string())?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });
        tracing::info!(%addr, "chartpilot server listening");

        Ok(Server { addr, shutdown: Some(shutdown_tx), state })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    pub fn shutdown(&mut self) -> Result<(), String> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| "failed to send server shutdown signal".to_string())
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
