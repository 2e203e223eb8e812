use crate::config::PricingConfig;
use crate::pricing::types::{
    MarketComparable, MarketPricingBenchmark, PromptPricingInput, PromptPricingResult,
};

// Heuristic weights, calibrated against marketplace mock data.
const TREND_MOMENTUM_WEIGHT: f64 = 0.6;
const VELOCITY_MOMENTUM_WEIGHT: f64 = 0.08;
const WATCHER_DEMAND_WEIGHT: f64 = 0.42;
const VELOCITY_DEMAND_WEIGHT: f64 = 0.33;
const TREND_DEMAND_WEIGHT: f64 = 0.25;
const SIGNAL_CAP: f64 = 2.0;

const SUPPORT_BASE: f64 = 0.32;
const SUPPORT_DEMAND_GAIN: f64 = 0.18;
const BID_MOMENTUM_GAIN: f64 = 0.35;
const ASK_BASE_MARKUP: f64 = 0.04;
const ASK_DEMAND_GAIN: f64 = 0.09;
const ASK_MOMENTUM_GAIN: f64 = 0.05;
const ASK_SPREAD_FLOOR: f64 = 0.18;

const BID_FLOOR_MULTIPLIER: f64 = 1.02;
const ASK_CAP_MULTIPLIER: f64 = 1.2;
const MARKET_HIGH_HEADROOM: f64 = 1.1;
const MARKET_ASK_ANCHOR_BLEND: f64 = 0.3;
const MARKET_WEIGHT_MIN: f64 = 0.25;
const MARKET_WEIGHT_MAX: f64 = 0.85;
const BAND_LOW_FACTOR: f64 = 0.97;
const BAND_HIGH_FACTOR: f64 = 1.03;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregated bounds across the whole benchmark table.
struct MarketAggregate {
    low: f64,
    high: f64,
    midpoint: f64,
}

/// Deterministic bid/ask recommendation engine for prompt listings.
///
/// Pure over its inputs: no I/O, no randomness, no retained state beyond
/// the immutable benchmark table and tunables handed in at construction.
/// Two calls with the same input produce identical results.
pub struct PricingEngine {
    config: PricingConfig,
    benchmarks: Vec<MarketPricingBenchmark>,
}

impl PricingEngine {
    pub fn new(config: PricingConfig, benchmarks: Vec<MarketPricingBenchmark>) -> Self {
        Self { config, benchmarks }
    }

    pub fn benchmarks(&self) -> &[MarketPricingBenchmark] {
        &self.benchmarks
    }

    /// Compute the recommended bid/ask band for one listing.
    ///
    /// Total over the numeric domain: degenerate input (empty history, zero
    /// floor, zero watchers) is absorbed by fallbacks and clamping rather
    /// than rejected. Never panics, never returns NaN for finite input.
    pub fn recommend(&self, input: &PromptPricingInput) -> PromptPricingResult {
        let cfg = &self.config;

        // Minimum spread avoids a degenerate zero-width band.
        let price_spread =
            (input.highest_bid_usd - input.floor_price_usd).max(cfg.min_spread_usd);

        // Capped so outlier popularity cannot dominate the blend.
        let normalized_watchers = (input.watchers as f64 / cfg.watcher_scale).min(SIGNAL_CAP);
        let normalized_velocity = (input.bid_velocity / cfg.velocity_scale).min(SIGNAL_CAP);

        let history = &input.bid_history_usd;
        let lookback_price = if history.len() > cfg.trend_lookback_ticks {
            history[history.len() - cfg.trend_lookback_ticks - 1]
        } else {
            input.floor_price_usd
        };
        let latest_price = history.last().copied().unwrap_or(input.highest_bid_usd);
        // A zero lookback (zero floor with short history) reads as "no trend".
        let trend_growth = if lookback_price > 0.0 {
            (latest_price - lookback_price) / lookback_price
        } else {
            0.0
        };

        let momentum_score = round2(
            trend_growth * TREND_MOMENTUM_WEIGHT
                + (input.bid_velocity - cfg.velocity_baseline) * VELOCITY_MOMENTUM_WEIGHT,
        );
        // Only a positive trend contributes: a falling price is not a demand penalty.
        let demand_score = round2(
            normalized_watchers * WATCHER_DEMAND_WEIGHT
                + normalized_velocity * VELOCITY_DEMAND_WEIGHT
                + trend_growth.max(0.0) * TREND_DEMAND_WEIGHT,
        );

        let aggregate = self.aggregate_market();
        let market_weight = if aggregate.is_some() {
            ((normalized_watchers + normalized_velocity) / 4.0)
                .clamp(MARKET_WEIGHT_MIN, MARKET_WEIGHT_MAX)
        } else {
            0.0
        };

        // Bid rises from a demand-scaled support point, on positive momentum
        // only; ask rises from the highest bid and stays inside the local
        // trading range.
        let positive_momentum = momentum_score.max(0.0);
        let local_bid_floor = input.floor_price_usd * BID_FLOOR_MULTIPLIER;
        let local_ask_cap = input.highest_bid_usd * ASK_CAP_MULTIPLIER;
        let support = input.floor_price_usd
            + price_spread * (SUPPORT_BASE + demand_score * SUPPORT_DEMAND_GAIN);
        let unanchored_bid = (support * (1.0 + positive_momentum * BID_MOMENTUM_GAIN))
            .max(local_bid_floor)
            .min(local_ask_cap);
        let unanchored_ask = (input.highest_bid_usd
            * (1.0
                + ASK_BASE_MARKUP
                + demand_score * ASK_DEMAND_GAIN
                + positive_momentum * ASK_MOMENTUM_GAIN))
            .max(unanchored_bid + price_spread * ASK_SPREAD_FLOOR)
            .min(local_ask_cap);

        // Blend toward the external market by observed demand, then clamp so
        // the recommendation never leaves the local trading range and never
        // strays far past the benchmark range. min/max chains instead of
        // clamp(): the two ranges can invert, and the local floor wins.
        let (anchored_bid, anchored_ask) = match &aggregate {
            Some(agg) => {
                let bid_cap = local_ask_cap.min(agg.high * MARKET_HIGH_HEADROOM);
                let blended_bid =
                    unanchored_bid * (1.0 - market_weight) + agg.midpoint * market_weight;
                let anchored_bid = blended_bid.min(bid_cap).max(local_bid_floor);

                let ask_anchor =
                    agg.midpoint + (agg.high - agg.midpoint) * MARKET_ASK_ANCHOR_BLEND;
                let blended_ask =
                    unanchored_ask * (1.0 - market_weight) + ask_anchor * market_weight;
                let anchored_ask = blended_ask
                    .max(anchored_bid + price_spread * ASK_SPREAD_FLOOR)
                    .min(local_ask_cap);

                (anchored_bid, anchored_ask)
            }
            None => (unanchored_bid, unanchored_ask),
        };

        let to_eur = |usd: f64| round2(usd * cfg.eur_per_usd);

        let recommended_bid_usd = round2(anchored_bid);
        let recommended_ask_usd = round2(anchored_ask);
        let band_low_usd = round2((anchored_bid * BAND_LOW_FACTOR).max(input.floor_price_usd));
        let band_high_usd = round2(
            (recommended_ask_usd * BAND_HIGH_FACTOR)
                .min(recommended_ask_usd * ASK_CAP_MULTIPLIER),
        );

        let market_range_usd = match &aggregate {
            Some(agg) => [round2(agg.low), round2(agg.high)],
            None => [0.0, 0.0],
        };

        let market_comparables = self
            .benchmarks
            .iter()
            .map(|bench| {
                let usd_range = [round2(bench.usd_range[0]), round2(bench.usd_range[1])];
                let usd_anchor = bench.usd_premium_anchor.map(round2);
                MarketComparable {
                    market: bench.market.clone(),
                    offering_en: bench.offering_en.clone(),
                    offering_bn: bench.offering_bn.clone(),
                    usd_range,
                    eur_range: [to_eur(usd_range[0]), to_eur(usd_range[1])],
                    usd_premium_anchor: usd_anchor,
                    eur_premium_anchor: usd_anchor.map(to_eur),
                    sample_size: bench.sample_size,
                    source_url: bench.source_url.clone(),
                }
            })
            .collect();

        PromptPricingResult {
            recommended_bid_usd,
            recommended_bid_eur: to_eur(recommended_bid_usd),
            recommended_ask_usd,
            recommended_ask_eur: to_eur(recommended_ask_usd),
            bid_band_usd: [band_low_usd, band_high_usd],
            bid_band_eur: [to_eur(band_low_usd), to_eur(band_high_usd)],
            momentum_score,
            demand_score,
            market_range_usd,
            market_range_eur: [to_eur(market_range_usd[0]), to_eur(market_range_usd[1])],
            market_comparables,
        }
    }

    fn aggregate_market(&self) -> Option<MarketAggregate> {
        if self.benchmarks.is_empty() {
            return None;
        }

        let mut low = f64::MAX;
        let mut high = f64::MIN;
        let mut midpoint_sum = 0.0;

        for bench in &self.benchmarks {
            low = low.min(bench.usd_range[0]);
            high = high.max(bench.usd_premium_anchor.unwrap_or(bench.usd_range[1]));
            midpoint_sum += (bench.usd_range[0] + bench.usd_range[1]) / 2.0;
        }

        Some(MarketAggregate {
            low,
            high,
            midpoint: midpoint_sum / self.benchmarks.len() as f64,
        })
    }
}
