pub mod auth;

pub use auth::{catalog_auth_middleware, pricing_auth_middleware, StaffClaims};
