use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::config::ExchangeConfig;
use crate::exchange::types::Listing;

/// Random-walk market simulator. Driven by an explicit external tick, so the
/// pricing engine's inputs stay caller-supplied and testable in isolation.
pub struct MarketSimulator {
    config: ExchangeConfig,
}

impl MarketSimulator {
    pub fn new(config: ExchangeConfig) -> Self {
        Self { config }
    }

    /// Advance one listing by one market tick: maybe land a simulated bid,
    /// drift the watcher count, jitter the bid velocity, and trim the
    /// history window.
    pub fn tick(&self, listing: &mut Listing) {
        let mut rng = rand::thread_rng();

        // Busier listings attract bids more often.
        let bid_chance =
            (self.config.base_bid_chance + listing.bid_velocity / 10.0).min(0.9);
        if rng.gen::<f64>() < bid_chance {
            let step = rng.gen::<f64>() * self.config.max_bid_step_pct;
            let base = listing.highest_bid_usd.max(listing.floor_price_usd);
            let bid = base * (1.0 + step);
            if bid > listing.highest_bid_usd {
                listing.highest_bid_usd = bid;
                listing.bid_history_usd.push(bid);
                debug!("{}: simulated bid ${:.2}", listing.id, bid);
            }
        }

        let drift_max = self.config.watcher_drift as i64;
        // Slight upward skew: interest accumulates faster than it decays.
        let drift = rng.gen_range(-drift_max..=drift_max + 2);
        listing.watchers = (listing.watchers as i64 + drift).max(0) as u32;

        let jitter = rng.gen_range(-self.config.velocity_jitter..=self.config.velocity_jitter);
        listing.bid_velocity = (listing.bid_velocity + jitter).max(0.0);

        let window = self.config.history_window;
        if listing.bid_history_usd.len() > window {
            let excess = listing.bid_history_usd.len() - window;
            listing.bid_history_usd.drain(..excess);
        }

        listing.updated_at = Utc::now();
    }
}
