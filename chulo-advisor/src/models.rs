use chulo_catalog::{Product, SpoilageRisk};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pricing request exactly as submitted, before any constraint is checked.
///
/// Every field is optional and loosely typed so that a bad value can be
/// reported against the field that carried it. See [`PricingRequestInput::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequestInput {
    pub product_name: Option<String>,
    pub current_stock_qty: Option<i64>,
    pub popularity_score: Option<f64>,
    pub spoilage_risk: Option<String>,
    pub current_price: Option<f64>,
}

impl PricingRequestInput {
    /// Fields set in `overrides` win, the rest are kept
    pub fn overlay(self, overrides: PricingRequestInput) -> Self {
        Self {
            product_name: overrides.product_name.or(self.product_name),
            current_stock_qty: overrides.current_stock_qty.or(self.current_stock_qty),
            popularity_score: overrides.popularity_score.or(self.popularity_score),
            spoilage_risk: overrides.spoilage_risk.or(self.spoilage_risk),
            current_price: overrides.current_price.or(self.current_price),
        }
    }
}

impl From<&Product> for PricingRequestInput {
    /// Prefill from a catalog record. A product without a popularity score
    /// leaves the field empty for the caller to supply.
    fn from(product: &Product) -> Self {
        Self {
            product_name: Some(product.name.clone()),
            current_stock_qty: Some(i64::from(product.stock_qty)),
            popularity_score: product.popularity_score,
            spoilage_risk: Some(product.spoilage_risk.to_string()),
            current_price: Some(product.price),
        }
    }
}

/// A validated pricing request. Only obtainable through validation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub(crate) product_name: String,
    pub(crate) current_stock_qty: u32,
    pub(crate) popularity_score: f64,
    pub(crate) spoilage_risk: SpoilageRisk,
    pub(crate) current_price: f64,
}

impl PricingRequest {
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn current_stock_qty(&self) -> u32 {
        self.current_stock_qty
    }

    pub fn popularity_score(&self) -> f64 {
        self.popularity_score
    }

    pub fn spoilage_risk(&self) -> SpoilageRisk {
        self.spoilage_risk
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub suggested_price: f64,
    pub reasoning: String,
}

impl PricingResponse {
    pub fn direction(&self, current_price: f64) -> PriceDirection {
        PriceDirection::between(current_price, self.suggested_price)
    }
}

/// Which way a suggestion moves the price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Raise,
    Lower,
    Hold,
}

impl PriceDirection {
    pub fn between(current: f64, suggested: f64) -> Self {
        if suggested > current {
            PriceDirection::Raise
        } else if suggested < current {
            PriceDirection::Lower
        } else {
            PriceDirection::Hold
        }
    }
}

impl fmt::Display for PriceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceDirection::Raise => f.write_str("raise"),
            PriceDirection::Lower => f.write_str("lower"),
            PriceDirection::Hold => f.write_str("hold"),
        }
    }
}
