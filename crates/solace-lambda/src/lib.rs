//! solace-lambda
//!
//! HTTP API for the Solace dashboard, served from AWS Lambda. Handlers
//! are thin: they validate input, call the FHIR, storage, and chat crates,
//! and map their errors onto [`error::ApiError`].

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/clients",
            get(routes::clients::search_clients).post(routes::clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(routes::clients::get_client)
                .put(routes::clients::update_client)
                .delete(routes::clients::delete_client),
        )
        .route("/clients/{id}/notes", post(routes::clients::create_note))
        .route(
            "/documents",
            get(routes::documents::search_documents).post(routes::documents::upload_document),
        )
        .route("/chat", post(routes::chat::chat))
        .route("/storage/status", get(routes::storage::storage_status))
        .route("/datastore/status", get(routes::datastore::datastore_status))
        .route("/datastore/exports", post(routes::datastore::start_export))
        .route(
            "/datastore/exports/files",
            get(routes::storage::list_exported_files),
        )
        .route(
            "/datastore/exports/{job_id}",
            get(routes::datastore::get_export),
        )
        .route("/datastore/imports", post(routes::datastore::start_import))
        .route(
            "/datastore/imports/{job_id}",
            get(routes::datastore::get_import),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
