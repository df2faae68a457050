use chulo_store::app_config::{AdvisorConfig, BackendKind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::PricingBackend;
use crate::error::{AdvisorError, AdvisorUnavailable, SetupError};
use crate::generative::GenerativeBackend;
use crate::guard::check_response;
use crate::models::{PricingRequest, PricingRequestInput, PricingResponse};
use crate::rules::RuleBasedBackend;

/// Stateless pricing advisor.
///
/// Validates the request, makes one bounded call to the backend and checks
/// what comes back. Nothing is retried and nothing is stored.
pub struct PricingAdvisor {
    backend: Arc<dyn PricingBackend>,
    timeout: Duration,
}

impl PricingAdvisor {
    pub fn new(backend: Arc<dyn PricingBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self, SetupError> {
        let timeout = Duration::from_millis(config.timeout_ms);

        let backend: Arc<dyn PricingBackend> = match config.backend {
            BackendKind::Rules => {
                config.rules.validate().map_err(SetupError::InvalidRules)?;
                Arc::new(RuleBasedBackend::new(config.rules.clone()))
            }
            BackendKind::Generative => {
                let generative = config.generative.clone().ok_or(SetupError::MissingGenerativeConfig)?;
                Arc::new(GenerativeBackend::new(generative, timeout)?)
            }
        };

        Ok(Self::new(backend, timeout))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// `suggestPrice`: validate the raw request, then advise on it
    pub async fn suggest_price(&self, input: &PricingRequestInput) -> Result<PricingResponse, AdvisorError> {
        let request = input.validate()?;
        self.suggest(&request).await
    }

    pub async fn suggest(&self, request: &PricingRequest) -> Result<PricingResponse, AdvisorError> {
        let started = Instant::now();

        let response = match tokio::time::timeout(self.timeout, self.backend.evaluate(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(backend = self.backend.name(), product = %request.product_name(), "Pricing backend failed: {}", e);
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(backend = self.backend.name(), product = %request.product_name(), "Pricing backend timed out after {:?}", self.timeout);
                return Err(AdvisorUnavailable::Timeout(self.timeout).into());
            }
        };

        if let Err(e) = check_response(request, &response) {
            tracing::warn!(backend = self.backend.name(), product = %request.product_name(), "Rejected pricing suggestion: {}", e);
            return Err(e.into());
        }

        tracing::info!(
            backend = self.backend.name(),
            product = %request.product_name(),
            current_price = request.current_price(),
            suggested_price = response.suggested_price,
            direction = %response.direction(request.current_price()),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pricing suggestion ready"
        );

        Ok(response)
    }
}
