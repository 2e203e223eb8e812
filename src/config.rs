use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub system: SystemConfig,
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    pub dry_run: bool,
    pub database_path: String,
    pub snapshot_path: String,
    pub csv_logging: bool,
    pub csv_log_path: String,
    pub benchmarks_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    pub tick_interval_secs: u64,
    pub history_window: usize,
    pub base_bid_chance: f64,
    pub max_bid_step_pct: f64,
    pub watcher_drift: u32,
    pub velocity_jitter: f64,
}

/// Tunables for the pricing recommendation engine. Defaults match the
/// marketplace heuristic the engine was calibrated against; the velocity
/// baseline in particular is a tuning knob, not an invariant.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_eur_per_usd")]
    pub eur_per_usd: f64,
    #[serde(default = "default_min_spread")]
    pub min_spread_usd: f64,
    #[serde(default = "default_watcher_scale")]
    pub watcher_scale: f64,
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,
    #[serde(default = "default_velocity_baseline")]
    pub velocity_baseline: f64,
    #[serde(default = "default_trend_lookback")]
    pub trend_lookback_ticks: usize,
}

fn default_eur_per_usd() -> f64 { 0.92 }
fn default_min_spread() -> f64 { 5.0 }
fn default_watcher_scale() -> f64 { 240.0 }
fn default_velocity_scale() -> f64 { 4.5 }
fn default_velocity_baseline() -> f64 { 3.2 }
fn default_trend_lookback() -> usize { 6 }

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            eur_per_usd: default_eur_per_usd(),
            min_spread_usd: default_min_spread(),
            watcher_scale: default_watcher_scale(),
            velocity_scale: default_velocity_scale(),
            velocity_baseline: default_velocity_baseline(),
            trend_lookback_ticks: default_trend_lookback(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub database_path: Option<String>,
    pub dry_run: bool,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            database_path: std::env::var("PRICER_DATABASE_PATH").ok(),
            dry_run: std::env::var("DRY_RUN")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.eur_per_usd, 0.92);
        assert_eq!(config.min_spread_usd, 5.0);
        assert_eq!(config.watcher_scale, 240.0);
        assert_eq!(config.velocity_scale, 4.5);
        assert_eq!(config.velocity_baseline, 3.2);
        assert_eq!(config.trend_lookback_ticks, 6);
    }

    #[test]
    fn test_pricing_section_optional_in_toml() {
        let raw = r#"
            [system]
            dry_run = true
            database_path = "pricer.db"
            snapshot_path = "board.json"
            csv_logging = false
            csv_log_path = "recs.csv"

            [exchange]
            tick_interval_secs = 5
            history_window = 24
            base_bid_chance = 0.2
            max_bid_step_pct = 0.02
            watcher_drift = 4
            velocity_jitter = 0.4
        "#;

        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.system.dry_run);
        assert_eq!(config.pricing.velocity_baseline, 3.2);
        assert!(config.system.benchmarks_path.is_none());
    }
}
