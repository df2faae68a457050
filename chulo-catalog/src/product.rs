use serde::{Deserialize, Serialize};
use uuid::Uuid;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// How quickly unsold stock loses its sale value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SpoilageRisk {
    Low,
    Medium,
    High,
}

impl SpoilageRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpoilageRisk::Low => "low",
            SpoilageRisk::Medium => "medium",
            SpoilageRisk::High => "high",
        }
    }
}

impl fmt::Display for SpoilageRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized spoilage risk '{0}', expected low, medium or high")]
pub struct UnknownSpoilageRisk(pub String);

impl FromStr for SpoilageRisk {
    type Err = UnknownSpoilageRisk;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(SpoilageRisk::Low),
            "medium" => Ok(SpoilageRisk::Medium),
            "high" => Ok(SpoilageRisk::High),
            _ => Err(UnknownSpoilageRisk(s.to_string())),
        }
    }
}

/// Menu item as stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock_qty: u32,
    /// 1 (slow) to 10 (fast-selling). Older records may not have one yet.
    #[serde(default)]
    pub popularity_score: Option<f64>,
    pub spoilage_risk: SpoilageRisk,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool { true }

impl Product {
    pub fn new(name: &str, category: &str, price: f64, stock_qty: u32, spoilage_risk: SpoilageRisk) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            price,
            stock_qty,
            popularity_score: None,
            spoilage_risk,
            is_available: true,
        }
    }

    pub fn with_popularity(mut self, score: f64) -> Self {
        self.popularity_score = Some(score);
        self
    }
}

/// Catalog-related errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    #[error("Catalog seed could not be loaded: {0}")]
    Seed(String),
}

/// Read access to the product catalog store
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_product(&self, id: Uuid) -> Result<Product, CatalogError>;

    /// Products ordered by category, then name
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;
}
