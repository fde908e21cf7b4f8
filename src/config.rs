use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{MatchOptions, ScoringWeights};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub sweep: SweepSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Leave unset to run with the in-process tier only
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_similar_limit")]
    pub similar_limit: usize,
    /// Only reports from the last N days enter a user's candidate pool
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            limit: default_limit(),
            similar_limit: default_similar_limit(),
            window_days: default_window_days(),
        }
    }
}

impl MatchingSettings {
    pub fn options(&self) -> MatchOptions {
        MatchOptions {
            min_score: self.min_score,
            limit: self.limit,
        }
    }
}

fn default_min_score() -> u32 { 15 }
fn default_limit() -> usize { 6 }
fn default_similar_limit() -> usize { 10 }
fn default_window_days() -> i64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Scoring weights as they appear in config files; unset keys keep defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub category: u32,
    pub location_exact: u32,
    pub location_partial: u32,
    pub color: u32,
    pub brand: u32,
    pub material: u32,
    pub size: u32,
    pub condition: u32,
    pub feature: u32,
    pub value: u32,
    pub keyword: u32,
    pub keyword_cap: u32,
    pub recent_week: u32,
    pub recent_month: u32,
    pub max_score: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        let w = ScoringWeights::default();
        Self {
            category: w.category,
            location_exact: w.location_exact,
            location_partial: w.location_partial,
            color: w.color,
            brand: w.brand,
            material: w.material,
            size: w.size,
            condition: w.condition,
            feature: w.feature,
            value: w.value,
            keyword: w.keyword,
            keyword_cap: w.keyword_cap,
            recent_week: w.recent_week,
            recent_month: w.recent_month,
            max_score: w.max_score,
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(c: &WeightsConfig) -> Self {
        Self {
            category: c.category,
            location_exact: c.location_exact,
            location_partial: c.location_partial,
            color: c.color,
            brand: c.brand,
            material: c.material,
            size: c.size,
            condition: c.condition,
            feature: c.feature,
            value: c.value,
            keyword: c.keyword,
            keyword_cap: c.keyword_cap,
            recent_week: c.recent_week,
            recent_month: c.recent_month,
            max_score: c.max_score,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SweepSettings {
    #[serde(default = "default_sweep_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            enabled: default_sweep_enabled(),
            interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_enabled() -> bool { true }
fn default_sweep_interval() -> u64 { 600 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with LOSTFOUND_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., LOSTFOUND__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LOSTFOUND")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LOSTFOUND")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Apply the conventional unprefixed variables on top of the loaded config
///
/// `DATABASE_URL`, `REDIS_URL` and `JWT_SECRET` win over file values when set.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
        assert_eq!(weights.category, 40);
        assert_eq!(weights.color, 20);
        assert_eq!(weights.max_score, 100);
    }

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.min_score, 15);
        assert_eq!(matching.limit, 6);
        assert_eq!(matching.window_days, 30);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_partial_weights_keep_defaults() {
        let settings = Config::builder()
            .set_override("brand", 30)
            .unwrap()
            .build()
            .unwrap();
        let weights: WeightsConfig = settings.try_deserialize().unwrap();

        assert_eq!(weights.brand, 30);
        assert_eq!(weights.color, 20);
    }
}
