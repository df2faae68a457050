use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Extension, Json, Router,
};
use chulo_advisor::{InvalidInput, PricingRequestInput, PricingResponse};
use chulo_core::Principal;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pricing/suggest", post(suggest_price))
        .route("/v1/products/{id}/pricing-suggestion", post(suggest_for_product))
}

/// POST /v1/pricing/suggest
/// Advise on a fully supplied pricing request
async fn suggest_price(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    payload: Result<Json<PricingRequestInput>, JsonRejection>,
) -> Result<Json<PricingResponse>, AppError> {
    let Json(input) = payload.map_err(|e| InvalidInput::body(e.body_text()))?;
    log_requester(principal.as_deref(), None);

    let response = state.advisor.suggest_price(&input).await?;
    Ok(Json(response))
}

/// POST /v1/products/:id/pricing-suggestion
/// Prefill from the catalog, apply any fields in the body, then advise
async fn suggest_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    principal: Option<Extension<Principal>>,
    body: Bytes,
) -> Result<Json<PricingResponse>, AppError> {
    let overrides = if body.iter().all(u8::is_ascii_whitespace) {
        PricingRequestInput::default()
    } else {
        serde_json::from_slice::<PricingRequestInput>(&body)
            .map_err(|e| InvalidInput::body(format!("Failed to parse the request body as JSON: {}", e)))?
    };

    log_requester(principal.as_deref(), Some(product_id));
    let product = state.catalog.get_product(product_id).await?;
    let input = PricingRequestInput::from(&product).overlay(overrides);

    let response = state.advisor.suggest_price(&input).await?;
    Ok(Json(response))
}

/// Only present when auth is enabled
fn log_requester(principal: Option<&Principal>, product_id: Option<Uuid>) {
    if let Some(principal) = principal {
        tracing::info!(
            user = %principal.user_id,
            role = %principal.role,
            product_id = ?product_id,
            "Pricing advice requested"
        );
    }
}
