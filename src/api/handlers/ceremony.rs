//! Ceremony endpoints: start a sign in, then poll it until it is over.
//!
//! The context bag for each ceremony lives in the store between calls. It is
//! dropped once the ceremony reaches a terminal outcome or turns out to be
//! corrupted; transport faults keep it so the user can retry.

use super::valid_email;
use crate::{
    api::AppState,
    ceremony::{AssertionClient, CeremonyData, CeremonyError, PollOutcome, PresentationView},
    metadata::{authentication_method_claim, Claim},
    render::Locale,
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use ulid::Ulid;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct BeginRequest {
    pub subject_id: String,
    /// Language tag, e.g. `sv-SE`.
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct BeginResponse {
    pub ceremony_id: String,
    pub view: PresentationView,
    pub page_title: String,
    pub html: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct PollRequest {
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollResponse {
    Completed {
        claims: Vec<Claim>,
    },
    Failed {
        view: Option<PresentationView>,
        html: String,
    },
    Pending {
        view: PresentationView,
        html: String,
    },
}

/// Body for faults shown through the generic error display.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct FaultResponse {
    pub view: PresentationView,
    pub html: String,
}

#[utoipa::path(
    post,
    path= "/v1/ceremonies",
    request_body = BeginRequest,
    responses (
        (status = 201, description = "Ceremony started", body = BeginResponse, content_type = "application/json"),
        (status = 400, description = "Missing payload or invalid subject"),
        (status = 500, description = "Error rendering form"),
        (status = 502, description = "Freja eID could not be reached", body = FaultResponse),
    ),
    tag= "ceremony"
)]
#[instrument(skip(state, payload))]
pub async fn begin<C: AssertionClient>(
    state: Extension<Arc<AppState<C>>>,
    payload: Option<Json<BeginRequest>>,
) -> Response {
    let request: BeginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let subject_id = request.subject_id.trim();
    if subject_id.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing subject_id".to_string()).into_response();
    }

    if state.email_subjects() && !valid_email(subject_id) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    if !state.adapter().is_available_for_user(subject_id) {
        return (StatusCode::FORBIDDEN, "Method not available".to_string()).into_response();
    }

    let locale = Locale::negotiate(request.locale.as_deref());

    let mut data = CeremonyData::new();
    match state.adapter().begin_with_context(&mut data, subject_id).await {
        Ok(view) => {
            let html = match state.renderer().form_html(&view, locale) {
                Ok(html) => html,
                Err(e) => return render_failed(&e),
            };

            let ceremony_id = state.store().insert(data).await;

            info!(%ceremony_id, "Ceremony started");

            let response = BeginResponse {
                ceremony_id: ceremony_id.to_string(),
                html,
                page_title: state.renderer().page_title(locale).to_string(),
                view,
            };

            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(fault) => fault_response(&state, &fault, locale),
    }
}

#[utoipa::path(
    post,
    path= "/v1/ceremonies/{id}/poll",
    params(("id" = String, Path, description = "Ceremony id returned when the ceremony started")),
    request_body(content = PollRequest, description = "Optional, selects the display language"),
    responses (
        (status = 200, description = "Current outcome of the ceremony", body = PollResponse, content_type = "application/json"),
        (status = 404, description = "Unknown or expired ceremony"),
        (status = 409, description = "Ceremony context is corrupted", body = FaultResponse),
        (status = 500, description = "Error rendering form"),
        (status = 502, description = "Freja eID could not be reached", body = FaultResponse),
    ),
    tag= "ceremony"
)]
#[instrument(skip(state, payload))]
pub async fn poll<C: AssertionClient>(
    state: Extension<Arc<AppState<C>>>,
    Path(id): Path<String>,
    payload: Option<Json<PollRequest>>,
) -> Response {
    let locale = Locale::negotiate(
        payload
            .as_ref()
            .and_then(|Json(request)| request.locale.as_deref()),
    );

    let Ok(ceremony_id) = Ulid::from_string(&id) else {
        return not_found();
    };

    let Some(data) = state.store().get(ceremony_id).await else {
        return not_found();
    };

    match state.adapter().resume_with_context(&data).await {
        Ok(PollOutcome::Terminal { success: true, .. }) => {
            state.store().remove(ceremony_id).await;

            info!(%ceremony_id, "Ceremony completed");

            let response = PollResponse::Completed {
                claims: vec![authentication_method_claim()],
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(PollOutcome::Terminal {
            success: false,
            view,
        }) => {
            state.store().remove(ceremony_id).await;

            info!(%ceremony_id, "Ceremony failed");

            let html = match view
                .as_ref()
                .map(|view| state.renderer().form_html(view, locale))
                .transpose()
            {
                Ok(html) => html.unwrap_or_default(),
                Err(e) => return render_failed(&e),
            };
            (StatusCode::OK, Json(PollResponse::Failed { view, html })).into_response()
        }
        Ok(PollOutcome::Continue(view)) => {
            let html = match state.renderer().form_html(&view, locale) {
                Ok(html) => html,
                Err(e) => return render_failed(&e),
            };
            (StatusCode::OK, Json(PollResponse::Pending { view, html })).into_response()
        }
        Err(fault) => {
            if fault.is_corrupted() {
                state.store().remove(ceremony_id).await;
                warn!(%ceremony_id, "Discarding corrupted ceremony");
            }
            fault_response(&state, &fault, locale)
        }
    }
}

fn fault_response<C: AssertionClient>(
    state: &AppState<C>,
    fault: &CeremonyError,
    locale: Locale,
) -> Response {
    error!("Ceremony fault: {}", fault);

    let status = if fault.is_corrupted() {
        StatusCode::CONFLICT
    } else {
        StatusCode::BAD_GATEWAY
    };

    let view = state.adapter().on_error(fault);
    let html = match state.renderer().form_html(&view, locale) {
        Ok(html) => html,
        Err(e) => return render_failed(&e),
    };

    (status, Json(FaultResponse { view, html })).into_response()
}

fn render_failed(err: &anyhow::Error) -> Response {
    error!("Error rendering form: {}", err);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Error rendering form".to_string(),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Ceremony not found".to_string()).into_response()
}
