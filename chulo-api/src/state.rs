use std::sync::Arc;
use chulo_advisor::PricingAdvisor;
use chulo_catalog::ProductCatalog;

#[derive(Clone)]
pub struct AuthConfig {
    /// When off, every route is open and callers gate access themselves
    pub enabled: bool,
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<PricingAdvisor>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub auth: AuthConfig,
}
