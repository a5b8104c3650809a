//! HTTP host for the adapter.
//!
//! Stands in for the federation host: it owns the per-ceremony context bags,
//! calls `begin`/`resume`, renders the returned views and issues the
//! authentication method claim once a ceremony completes.

use crate::{
    ceremony::{Adapter, AssertionClient},
    metadata::AdapterMetadata,
    render::Renderer,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;
pub mod store;

pub use openapi::ApiDoc;
pub use store::CeremonyStore;

/// Everything the handlers share.
pub struct AppState<C> {
    adapter: Adapter<C>,
    renderer: Renderer,
    store: CeremonyStore,
    metadata: AdapterMetadata,
    email_subjects: bool,
}

impl<C: AssertionClient> AppState<C> {
    #[must_use]
    pub fn new(adapter: Adapter<C>, renderer: Renderer, store: CeremonyStore) -> Self {
        Self {
            adapter,
            renderer,
            store,
            metadata: AdapterMetadata::new(),
            email_subjects: false,
        }
    }

    /// Reject subjects that do not look like an email address.
    #[must_use]
    pub fn with_email_subjects(mut self, enabled: bool) -> Self {
        self.email_subjects = enabled;
        self
    }

    #[must_use]
    pub fn adapter(&self) -> &Adapter<C> {
        &self.adapter
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    #[must_use]
    pub fn store(&self) -> &CeremonyStore {
        &self.store
    }

    #[must_use]
    pub fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn email_subjects(&self) -> bool {
        self.email_subjects
    }
}

/// Build the application router.
pub fn router<C>(state: Arc<AppState<C>>) -> Router
where
    C: AssertionClient + 'static,
{
    Router::new()
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .route("/v1/metadata", get(handlers::metadata::metadata::<C>))
        .route("/v1/ceremonies", post(handlers::ceremony::begin::<C>))
        .route("/v1/ceremonies/:id/poll", post(handlers::ceremony::poll::<C>))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new<C>(port: u16, state: AppState<C>) -> Result<()>
where
    C: AssertionClient + 'static,
{
    let app = router(Arc::new(state));

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
