use crate::{
    api::handlers::{ceremony, health, metadata},
    ceremony::PresentationView,
    metadata::{AdapterMetadata, Claim},
    render::Locale,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "frejamfa", description = "Freja eID MFA adapter host"),
    paths(
        health::health,
        metadata::metadata,
        ceremony::begin,
        ceremony::poll,
    ),
    components(schemas(
        health::Health,
        AdapterMetadata,
        Claim,
        Locale,
        PresentationView,
        ceremony::BeginRequest,
        ceremony::BeginResponse,
        ceremony::PollRequest,
        ceremony::PollResponse,
        ceremony::FaultResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "ceremony", description = "Freja eID sign in ceremonies"),
        (name = "metadata", description = "Adapter metadata"),
    )
)]
pub struct ApiDoc;
