use async_trait::async_trait;

use crate::error::AdvisorUnavailable;
use crate::models::{PricingRequest, PricingResponse};

/// Computes a suggestion for an already validated request.
///
/// Implementations do not need to re-check the response; the advisor
/// guards every result before handing it out.
#[async_trait]
pub trait PricingBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(&self, request: &PricingRequest) -> Result<PricingResponse, AdvisorUnavailable>;
}
