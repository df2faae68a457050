use axum::{
    routing::get,
    Router,
    http::Method,
    extract::State,
    Json,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod middleware;
pub mod pricing;
pub mod products;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let pricing = pricing::routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::pricing_auth_middleware,
    ));
    let products = products::routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::catalog_auth_middleware,
    ));

    Router::new()
        .route("/health", get(health))
        .merge(pricing)
        .merge(products)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.advisor.backend_name(),
    }))
}
