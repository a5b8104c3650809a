use crate::{
    api::AppState,
    ceremony::AssertionClient,
    metadata::AdapterMetadata,
};
use axum::{extract::Extension, response::Json};
use std::sync::Arc;

#[utoipa::path(
    get,
    path= "/v1/metadata",
    responses (
        (status = 200, description = "Authentication methods, identity claims and locales", body = AdapterMetadata),
    ),
    tag= "metadata"
)]
pub async fn metadata<C: AssertionClient>(
    state: Extension<Arc<AppState<C>>>,
) -> Json<AdapterMetadata> {
    Json(state.metadata().clone())
}
