use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Rules,
    Generative,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Upper bound on a single backend evaluation
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub rules: RuleConfig,
    pub generative: Option<GenerativeConfig>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Rules,
            timeout_ms: default_timeout_ms(),
            rules: RuleConfig::default(),
            generative: None,
        }
    }
}

fn default_timeout_ms() -> u64 { 10_000 }

/// Thresholds for the deterministic pricing heuristic
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    /// Stock at or below this is scarce
    pub low_stock_max: u32,
    /// Stock at or above this needs clearing
    pub high_stock_min: u32,
    pub low_popularity_max: f64,
    pub high_popularity_min: f64,
    /// Fractional price change per unit of stock/demand bias
    pub adjustment_step: f64,
    /// Extra markdown applied to high-spoilage items
    pub spoilage_markdown: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            low_stock_max: 10,
            high_stock_min: 40,
            low_popularity_max: 3.0,
            high_popularity_min: 8.0,
            adjustment_step: 0.05,
            spoilage_markdown: 0.15,
            min_multiplier: 0.5,
            max_multiplier: 1.5,
        }
    }
}

impl RuleConfig {
    /// Reject thresholds under which the heuristic cannot produce a usable price.
    ///
    /// Markdowns must stay positive and high spoilage must never clamp into a raise.
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            ("low_popularity_max", self.low_popularity_max),
            ("high_popularity_min", self.high_popularity_min),
            ("adjustment_step", self.adjustment_step),
            ("spoilage_markdown", self.spoilage_markdown),
            ("min_multiplier", self.min_multiplier),
            ("max_multiplier", self.max_multiplier),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be a finite number", name));
        }

        if !(self.min_multiplier > 0.0 && self.min_multiplier <= 1.0) {
            return Err(format!("min_multiplier must be in (0, 1], got {}", self.min_multiplier));
        }
        if self.max_multiplier < 1.0 {
            return Err(format!("max_multiplier must be at least 1, got {}", self.max_multiplier));
        }
        if self.adjustment_step < 0.0 {
            return Err(format!("adjustment_step must not be negative, got {}", self.adjustment_step));
        }
        if self.spoilage_markdown <= 0.0 {
            return Err(format!("spoilage_markdown must be positive, got {}", self.spoilage_markdown));
        }
        if self.low_stock_max >= self.high_stock_min {
            return Err(format!(
                "low_stock_max ({}) must be below high_stock_min ({})",
                self.low_stock_max, self.high_stock_min
            ));
        }
        if self.low_popularity_max >= self.high_popularity_min {
            return Err(format!(
                "low_popularity_max ({}) must be below high_popularity_min ({})",
                self.low_popularity_max, self.high_popularity_min
            ));
        }

        Ok(())
    }
}

/// Hosted model settings
#[derive(Debug, Deserialize, Clone)]
pub struct GenerativeConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_temperature() -> f64 { 0.2 }

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file with the menu to load at startup
    pub seed_path: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layer `{dir}/default`, `{dir}/{RUN_MODE}`, `{dir}/local` and `CHULO__*` environment variables.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg.. `CHULO__ADVISOR__BACKEND=generative`
            .add_source(config::Environment::with_prefix("CHULO").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
