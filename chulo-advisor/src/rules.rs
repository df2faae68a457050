use async_trait::async_trait;
use chulo_catalog::SpoilageRisk;
use chulo_store::app_config::RuleConfig;

use crate::backend::PricingBackend;
use crate::error::AdvisorUnavailable;
use crate::models::{PriceDirection, PricingRequest, PricingResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Low,
    Normal,
    High,
}

impl StockLevel {
    /// Scarce stock pushes the price up, surplus pushes it down
    fn bias(&self) -> i32 {
        match self {
            StockLevel::Low => 1,
            StockLevel::Normal => 0,
            StockLevel::High => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandLevel {
    Low,
    Moderate,
    High,
}

impl DemandLevel {
    fn bias(&self) -> i32 {
        match self {
            DemandLevel::Low => -1,
            DemandLevel::Moderate => 0,
            DemandLevel::High => 1,
        }
    }
}

/// Deterministic pricing heuristic.
///
/// Stock and popularity each contribute one step of bias in either direction.
/// Spoilage is applied last and dominates: a high-spoilage item is always
/// marked down, whatever stock and popularity say.
pub struct RuleBasedBackend {
    config: RuleConfig,
}

impl RuleBasedBackend {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn stock_level(&self, qty: u32) -> StockLevel {
        if qty <= self.config.low_stock_max {
            StockLevel::Low
        } else if qty >= self.config.high_stock_min {
            StockLevel::High
        } else {
            StockLevel::Normal
        }
    }

    pub fn demand_level(&self, popularity: f64) -> DemandLevel {
        if popularity <= self.config.low_popularity_max {
            DemandLevel::Low
        } else if popularity >= self.config.high_popularity_min {
            DemandLevel::High
        } else {
            DemandLevel::Moderate
        }
    }

    /// Fractional price change before clamping, e.g. -0.15 for a 15% markdown
    fn price_change(&self, stock: StockLevel, demand: DemandLevel, spoilage: SpoilageRisk) -> f64 {
        let step = self.config.adjustment_step;
        let base = step * f64::from(stock.bias() + demand.bias());

        match spoilage {
            SpoilageRisk::Low => base,
            SpoilageRisk::Medium => {
                if base > 0.0 {
                    base / 2.0
                } else {
                    base - step
                }
            }
            SpoilageRisk::High => base.min(0.0) - self.config.spoilage_markdown,
        }
    }

    pub fn suggest(&self, request: &PricingRequest) -> PricingResponse {
        let stock = self.stock_level(request.current_stock_qty());
        let demand = self.demand_level(request.popularity_score());
        let spoilage = request.spoilage_risk();
        let current = request.current_price();

        let multiplier = (1.0 + self.price_change(stock, demand, spoilage))
            .max(self.config.min_multiplier)
            .min(self.config.max_multiplier);

        let exact = current * multiplier;
        let rounded = round_to_cents(exact);

        // Rounding must not turn a small change into a hold, or a markdown into zero
        let suggested = if rounded > 0.0
            && PriceDirection::between(current, rounded) == PriceDirection::between(current, exact)
        {
            rounded
        } else {
            exact
        };

        PricingResponse {
            suggested_price: suggested,
            reasoning: explain(request, stock, demand, suggested),
        }
    }
}

#[async_trait]
impl PricingBackend for RuleBasedBackend {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn evaluate(&self, request: &PricingRequest) -> Result<PricingResponse, AdvisorUnavailable> {
        Ok(self.suggest(request))
    }
}

fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

fn explain(request: &PricingRequest, stock: StockLevel, demand: DemandLevel, suggested: f64) -> String {
    let name = request.product_name();
    let current = request.current_price();
    let change_pct = ((suggested / current) - 1.0).abs() * 100.0;

    let headline = match PriceDirection::between(current, suggested) {
        PriceDirection::Raise => format!(
            "Raise the price of {} from {:.2} to {:.2} (+{:.1}%).",
            name, current, suggested, change_pct
        ),
        PriceDirection::Lower => format!(
            "Lower the price of {} from {:.2} to {:.2} (-{:.1}%).",
            name, current, suggested, change_pct
        ),
        PriceDirection::Hold => format!("Hold the price of {} at {:.2}.", name, current),
    };

    let qty = request.current_stock_qty();
    let stock_clause = match stock {
        StockLevel::High => format!("Stock is high at {} units, which calls for clearing inventory.", qty),
        StockLevel::Low => format!("Stock is low at {} units, so scarcity supports a premium.", qty),
        StockLevel::Normal => format!("Stock of {} units is at a normal level.", qty),
    };

    let score = request.popularity_score();
    let demand_clause = match demand {
        DemandLevel::High => format!("Popularity is high ({}/10), so customers are willing to pay more.", score),
        DemandLevel::Low => format!("Popularity is low ({}/10), so a cheaper price should stimulate demand.", score),
        DemandLevel::Moderate => format!("Popularity is moderate ({}/10).", score),
    };

    let spoilage_clause = match request.spoilage_risk() {
        SpoilageRisk::High => {
            "Spoilage risk is high, so selling through before the product loses value takes priority over stock and popularity."
        }
        SpoilageRisk::Medium => "Spoilage risk is medium, which tilts the suggestion toward faster sell-through.",
        SpoilageRisk::Low => "Spoilage risk is low, so there is no urgency to sell.",
    };

    format!("{} {} {} {}", headline, stock_clause, demand_clause, spoilage_clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::check_response;
    use proptest::prelude::*;

    fn backend() -> RuleBasedBackend {
        RuleBasedBackend::new(RuleConfig::default())
    }

    fn request(name: &str, stock: i64, popularity: f64, spoilage: &str, price: f64) -> PricingRequest {
        PricingRequest::new(name, stock, popularity, spoilage, price).unwrap()
    }

    #[test]
    fn test_levels() {
        let rules = backend();
        assert_eq!(rules.stock_level(0), StockLevel::Low);
        assert_eq!(rules.stock_level(10), StockLevel::Low);
        assert_eq!(rules.stock_level(25), StockLevel::Normal);
        assert_eq!(rules.stock_level(40), StockLevel::High);
        assert_eq!(rules.demand_level(3.0), DemandLevel::Low);
        assert_eq!(rules.demand_level(5.5), DemandLevel::Moderate);
        assert_eq!(rules.demand_level(8.0), DemandLevel::High);
    }

    #[test]
    fn test_high_spoilage_overrides_popularity() {
        let req = request("Chicken Momo", 50, 10.0, "high", 250.0);
        let response = backend().suggest(&req);

        assert_eq!(response.suggested_price, 212.5);
        assert!(response.reasoning.starts_with("Lower the price of Chicken Momo"));
        assert!(response.reasoning.to_lowercase().contains("spoilage"));
    }

    #[test]
    fn test_scarce_popular_item_is_raised() {
        let req = request("Nepali Thali Set", 3, 9.0, "low", 550.0);
        let response = backend().suggest(&req);

        assert_eq!(response.suggested_price, 605.0);
        assert!(response.reasoning.starts_with("Raise the price"));
    }

    #[test]
    fn test_surplus_slow_item_is_lowered() {
        let req = request("Aloo Tama", 60, 2.0, "low", 300.0);
        assert_eq!(backend().suggest(&req).suggested_price, 270.0);

        let req = request("Aloo Tama", 60, 2.0, "medium", 300.0);
        assert_eq!(backend().suggest(&req).suggested_price, 255.0);
    }

    #[test]
    fn test_neutral_signals_hold() {
        let req = request("Masala Tea", 20, 5.0, "low", 60.0);
        let response = backend().suggest(&req);

        assert_eq!(response.suggested_price, 60.0);
        assert!(response.reasoning.starts_with("Hold the price of Masala Tea at 60.00."));
    }

    #[test]
    fn test_medium_spoilage_halves_increase() {
        let req = request("Nepali Thali Set", 3, 9.0, "medium", 550.0);
        assert_eq!(backend().suggest(&req).suggested_price, 577.5);
    }

    #[test]
    fn test_multiplier_is_clamped() {
        let rules = RuleBasedBackend::new(RuleConfig { spoilage_markdown: 0.9, ..RuleConfig::default() });
        let req = request("Yomari", 80, 1.0, "high", 100.0);
        assert_eq!(rules.suggest(&req).suggested_price, 50.0);
    }

    #[test]
    fn test_rounding_keeps_tiny_markdown() {
        let req = request("Mint Candy", 50, 2.0, "high", 0.01);
        let response = backend().suggest(&req);

        assert!(response.suggested_price > 0.0);
        assert!(response.suggested_price < 0.01);
        assert!(response.reasoning.starts_with("Lower the price"));
    }

    fn spoilage_risk() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("low"), Just("medium"), Just("high")]
    }

    proptest! {
        #[test]
        fn prop_suggestion_is_positive_and_consistent(
            name in "[A-Za-z][A-Za-z ]{0,11}",
            stock in 0i64..500,
            popularity in 1.0f64..=10.0,
            spoilage in spoilage_risk(),
            price in 0.01f64..10_000.0,
        ) {
            let req = request(&name, stock, popularity, spoilage, price);
            let response = backend().suggest(&req);

            prop_assert!(response.suggested_price > 0.0);
            prop_assert!(check_response(&req, &response).is_ok());
        }

        #[test]
        fn prop_high_spoilage_never_raises(
            stock in 0i64..500,
            popularity in 1.0f64..=10.0,
            price in 0.01f64..10_000.0,
        ) {
            let req = request("Test Dish", stock, popularity, "high", price);
            prop_assert!(backend().suggest(&req).suggested_price < price);
        }

        #[test]
        fn prop_surplus_slow_sellers_do_not_rise(
            stock in 40i64..500,
            popularity in 1.0f64..=3.0,
            spoilage in prop_oneof![Just("low"), Just("medium")],
            price in 0.01f64..10_000.0,
        ) {
            let req = request("Test Dish", stock, popularity, spoilage, price);
            prop_assert!(backend().suggest(&req).suggested_price <= price);
        }

        #[test]
        fn prop_scarce_bestsellers_do_not_fall(
            stock in 0i64..=5,
            popularity in 8.0f64..=10.0,
            price in 0.01f64..10_000.0,
        ) {
            let req = request("Test Dish", stock, popularity, "low", price);
            prop_assert!(backend().suggest(&req).suggested_price >= price);
        }
    }
}
