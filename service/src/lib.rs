//! HTTP API for a todo list whose only storage is a remote sync service.
//!
//! # Overview
//! Four routes (`GET /todo`, `POST /todo`, `PUT /todo/{sid}`,
//! `DELETE /todo/{sid}`) validate their input and turn it into one call on a
//! [`DocumentStore`]. Each todo is one remote document; the service keeps no
//! state of its own.
//!
//! # Design
//! - Handlers only see `Arc<dyn DocumentStore>`, so tests swap in fakes and
//!   production uses [`SyncStore`].
//! - Configuration is read once into [`Config`] at start-up.
//! - The same routes are also served under `/api`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod remote;
pub mod store;
pub mod telemetry;
pub mod todo;
pub mod validation;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::AppError;
pub use remote::SyncStore;
pub use store::{DocumentStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(SyncStore::new(&config.sync)))
    }
}

pub fn app(state: AppState) -> Router {
    let todo_routes = Router::new()
        .route("/todo", get(handlers::list_todos).post(handlers::create_todo))
        .route("/todo/{sid}", put(handlers::update_todo).delete(handlers::delete_todo));

    Router::new()
        .merge(todo_routes.clone())
        .nest("/api", todo_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves, then drain in-flight requests.
pub async fn run(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
