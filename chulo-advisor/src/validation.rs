use chulo_catalog::SpoilageRisk;
use serde::Serialize;
use std::fmt;

use crate::models::{PricingRequest, PricingRequestInput};

/// Request fields, named as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestField {
    ProductName,
    CurrentStockQty,
    PopularityScore,
    SpoilageRisk,
    CurrentPrice,
    /// The payload as a whole could not be decoded
    Body,
}

impl RequestField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestField::ProductName => "productName",
            RequestField::CurrentStockQty => "currentStockQty",
            RequestField::PopularityScore => "popularityScore",
            RequestField::SpoilageRisk => "spoilageRisk",
            RequestField::CurrentPrice => "currentPrice",
            RequestField::Body => "body",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: RequestField,
    pub reason: String,
}

/// One or more request fields broke their constraint
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid input: {}", describe(.violations))]
pub struct InvalidInput {
    pub violations: Vec<FieldViolation>,
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

impl InvalidInput {
    pub fn body(reason: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation { field: RequestField::Body, reason: reason.into() }],
        }
    }

    pub fn fields(&self) -> Vec<RequestField> {
        self.violations.iter().map(|v| v.field).collect()
    }

    pub fn cites(&self, field: RequestField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

const MIN_POPULARITY: f64 = 1.0;
const MAX_POPULARITY: f64 = 10.0;

impl PricingRequestInput {
    /// Check every field and collect all violations in field order.
    pub fn validate(&self) -> Result<PricingRequest, InvalidInput> {
        let mut violations = Vec::new();
        let mut violation = |field, reason: String| violations.push(FieldViolation { field, reason });

        let product_name = match self.product_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            Some(_) => {
                violation(RequestField::ProductName, "must not be empty".to_string());
                None
            }
            None => {
                violation(RequestField::ProductName, "is required".to_string());
                None
            }
        };

        let current_stock_qty = match self.current_stock_qty {
            Some(qty) if qty < 0 => {
                violation(RequestField::CurrentStockQty, format!("must be zero or more, got {}", qty));
                None
            }
            Some(qty) => match u32::try_from(qty) {
                Ok(qty) => Some(qty),
                Err(_) => {
                    violation(RequestField::CurrentStockQty, format!("is too large, got {}", qty));
                    None
                }
            },
            None => {
                violation(RequestField::CurrentStockQty, "is required".to_string());
                None
            }
        };

        let popularity_score = match self.popularity_score {
            Some(score) if score.is_finite() && (MIN_POPULARITY..=MAX_POPULARITY).contains(&score) => Some(score),
            Some(score) => {
                violation(RequestField::PopularityScore, format!("must be between 1 and 10, got {}", score));
                None
            }
            None => {
                violation(RequestField::PopularityScore, "is required".to_string());
                None
            }
        };

        let spoilage_risk = match self.spoilage_risk.as_deref() {
            Some(raw) => match raw.parse::<SpoilageRisk>() {
                Ok(risk) => Some(risk),
                Err(e) => {
                    violation(RequestField::SpoilageRisk, e.to_string());
                    None
                }
            },
            None => {
                violation(RequestField::SpoilageRisk, "is required".to_string());
                None
            }
        };

        let current_price = match self.current_price {
            Some(price) if price.is_finite() && price > 0.0 => Some(price),
            Some(price) => {
                violation(RequestField::CurrentPrice, format!("must be a positive amount, got {}", price));
                None
            }
            None => {
                violation(RequestField::CurrentPrice, "is required".to_string());
                None
            }
        };

        match (product_name, current_stock_qty, popularity_score, spoilage_risk, current_price) {
            (Some(product_name), Some(current_stock_qty), Some(popularity_score), Some(spoilage_risk), Some(current_price)) => {
                Ok(PricingRequest {
                    product_name,
                    current_stock_qty,
                    popularity_score,
                    spoilage_risk,
                    current_price,
                })
            }
            _ => Err(InvalidInput { violations }),
        }
    }
}

impl PricingRequest {
    /// Build and validate in one step
    pub fn new(
        product_name: &str,
        current_stock_qty: i64,
        popularity_score: f64,
        spoilage_risk: &str,
        current_price: f64,
    ) -> Result<Self, InvalidInput> {
        PricingRequestInput {
            product_name: Some(product_name.to_string()),
            current_stock_qty: Some(current_stock_qty),
            popularity_score: Some(popularity_score),
            spoilage_risk: Some(spoilage_risk.to_string()),
            current_price: Some(current_price),
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, stock: i64, popularity: f64, spoilage: &str, price: f64) -> PricingRequestInput {
        PricingRequestInput {
            product_name: Some(name.to_string()),
            current_stock_qty: Some(stock),
            popularity_score: Some(popularity),
            spoilage_risk: Some(spoilage.to_string()),
            current_price: Some(price),
        }
    }

    #[test]
    fn test_valid_request() {
        let request = input("  Chicken Momo ", 50, 10.0, "HIGH", 250.0).validate().unwrap();

        assert_eq!(request.product_name(), "Chicken Momo");
        assert_eq!(request.current_stock_qty(), 50);
        assert_eq!(request.popularity_score(), 10.0);
        assert_eq!(request.spoilage_risk(), SpoilageRisk::High);
        assert_eq!(request.current_price(), 250.0);
    }

    #[test]
    fn test_negative_stock_is_cited() {
        let err = input("X", -1, 5.0, "medium", 100.0).validate().unwrap_err();
        assert_eq!(err.fields(), vec![RequestField::CurrentStockQty]);
        assert!(err.to_string().contains("currentStockQty"));
    }

    #[test]
    fn test_all_violations_reported_in_field_order() {
        let err = input("", -3, 11.0, "rotten", 0.0).validate().unwrap_err();
        assert_eq!(
            err.fields(),
            vec![
                RequestField::ProductName,
                RequestField::CurrentStockQty,
                RequestField::PopularityScore,
                RequestField::SpoilageRisk,
                RequestField::CurrentPrice,
            ]
        );
    }

    #[test]
    fn test_missing_fields_are_required() {
        let err = PricingRequestInput::default().validate().unwrap_err();
        assert_eq!(err.violations.len(), 5);
        assert!(err.violations.iter().all(|v| v.reason == "is required"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let bad = input("Veg Momo", 20, 0.5, "low", -10.0);
        let first = bad.validate().unwrap_err();
        let second = bad.validate().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.fields(), vec![RequestField::PopularityScore, RequestField::CurrentPrice]);
    }

    #[test]
    fn test_popularity_bounds_are_inclusive() {
        assert!(input("Lassi", 5, 1.0, "low", 90.0).validate().is_ok());
        assert!(input("Lassi", 5, 10.0, "low", 90.0).validate().is_ok());
        assert!(input("Lassi", 5, f64::NAN, "low", 90.0).validate().is_err());
    }

    #[test]
    fn test_huge_stock_is_rejected() {
        let err = input("Rice", i64::from(u32::MAX) + 1, 5.0, "low", 90.0).validate().unwrap_err();
        assert!(err.cites(RequestField::CurrentStockQty));
    }

    #[test]
    fn test_zero_stock_is_fine() {
        assert_eq!(PricingRequest::new("Sold Out Sekuwa", 0, 7.0, "medium", 400.0).unwrap().current_stock_qty(), 0);
    }
}
