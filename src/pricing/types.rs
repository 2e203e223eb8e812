use serde::{Deserialize, Serialize};

/// Market signals for a single listing, snapshotted at the moment of the
/// call. The engine never mutates or retains this.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPricingInput {
    pub floor_price_usd: f64,
    pub highest_bid_usd: f64,
    /// Chronological bid values, oldest first. May be empty.
    pub bid_history_usd: Vec<f64>,
    pub watchers: u32,
    /// Bids per minute.
    pub bid_velocity: f64,
}

/// External reference price range for comparable prompt offerings.
/// Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPricingBenchmark {
    pub market: String,
    pub offering_en: String,
    pub offering_bn: String,
    /// [low, high] in USD.
    pub usd_range: [f64; 2],
    /// Observed top-of-market price, above the typical range.
    pub usd_premium_anchor: Option<f64>,
    pub sample_size: u32,
    pub notes: String,
    pub source_url: String,
    pub last_updated: String,
}

/// One benchmark projected into both display currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketComparable {
    pub market: String,
    pub offering_en: String,
    pub offering_bn: String,
    pub usd_range: [f64; 2],
    pub eur_range: [f64; 2],
    pub usd_premium_anchor: Option<f64>,
    pub eur_premium_anchor: Option<f64>,
    pub sample_size: u32,
    pub source_url: String,
}

/// Recommendation computed for one listing. All figures are rounded to two
/// decimals at construction; EUR fields mirror the rounded USD fields at the
/// fixed conversion rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPricingResult {
    pub recommended_bid_usd: f64,
    pub recommended_bid_eur: f64,
    pub recommended_ask_usd: f64,
    pub recommended_ask_eur: f64,
    pub bid_band_usd: [f64; 2],
    pub bid_band_eur: [f64; 2],
    pub momentum_score: f64,
    pub demand_score: f64,
    pub market_range_usd: [f64; 2],
    pub market_range_eur: [f64; 2],
    pub market_comparables: Vec<MarketComparable>,
}
