use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chulo_advisor::PricingRequestInput;
use chulo_catalog::Product;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", get(list_products))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/products/{id}/pricing-request", get(pricing_request))
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list_products().await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.get_product(product_id).await?))
}

/// GET /v1/products/:id/pricing-request
/// Form defaults for the pricing dialog
async fn pricing_request(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<PricingRequestInput>, AppError> {
    let product = state.catalog.get_product(product_id).await?;
    Ok(Json(PricingRequestInput::from(&product)))
}
