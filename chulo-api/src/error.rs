use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chulo_advisor::{AdvisorError, AdvisorUnavailable, InvalidInput};
use chulo_catalog::CatalogError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(InvalidInput),
    AdvisorUnavailable(AdvisorUnavailable),
    NotFoundError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidInput(err) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "invalid_input",
                    "message": format!("Fix your input: {}", err),
                    "fields": err.violations,
                }),
            ),
            AppError::AdvisorUnavailable(err) => {
                tracing::warn!("Pricing advisor unavailable: {}", err);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error": "advisor_unavailable",
                        "message": format!("Try again later: {}", short_reason(&err)),
                    }),
                )
            }
            AppError::NotFoundError(msg) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not_found", "message": msg }),
            ),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal", "message": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn short_reason(err: &AdvisorUnavailable) -> &'static str {
    match err {
        AdvisorUnavailable::Timeout(_) => "the pricing advisor took too long to answer",
        AdvisorUnavailable::Transport(_) | AdvisorUnavailable::Status(_) => "the pricing advisor could not be reached",
        AdvisorUnavailable::Malformed(_) | AdvisorUnavailable::Inconsistent(_) => {
            "the pricing advisor returned an unusable suggestion"
        }
    }
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::InvalidInput(e) => AppError::InvalidInput(e),
            AdvisorError::Unavailable(e) => AppError::AdvisorUnavailable(e),
        }
    }
}

impl From<InvalidInput> for AppError {
    fn from(err: InvalidInput) -> Self {
        AppError::InvalidInput(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::NotFoundError(format!("Product {} not found", id)),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}
