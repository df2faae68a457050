pub mod models;
pub mod validation;
pub mod error;
pub mod backend;
pub mod rules;
pub mod prompt;
pub mod generative;
pub mod guard;
pub mod advisor;

pub use models::{PriceDirection, PricingRequest, PricingRequestInput, PricingResponse};
pub use validation::{FieldViolation, InvalidInput, RequestField};
pub use error::{AdvisorError, AdvisorUnavailable, SetupError};
pub use backend::PricingBackend;
pub use rules::RuleBasedBackend;
pub use generative::GenerativeBackend;
pub use advisor::PricingAdvisor;
