use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pricing::types::PromptPricingInput;

/// One auction-style prompt listing with its live market signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title_en: String,
    pub title_bn: String,
    pub category: String,
    pub floor_price_usd: f64,
    pub highest_bid_usd: f64,
    /// Chronological bids, oldest first, bounded by the simulator's window.
    pub bid_history_usd: Vec<f64>,
    pub watchers: u32,
    pub bid_velocity: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub listing_id: String,
    pub amount_usd: f64,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum BidError {
    #[error("Bid must be a positive finite amount")]
    NotFinite,

    #[error("Bid ${0:.2} is below the floor price ${1:.2}")]
    BelowFloor(f64, f64),

    #[error("Bid ${0:.2} does not beat the current highest bid ${1:.2}")]
    NotAboveHighest(f64, f64),
}

impl Listing {
    /// Snapshot the signals the pricing engine consumes.
    pub fn pricing_input(&self) -> PromptPricingInput {
        PromptPricingInput {
            floor_price_usd: self.floor_price_usd,
            highest_bid_usd: self.highest_bid_usd,
            bid_history_usd: self.bid_history_usd.clone(),
            watchers: self.watchers,
            bid_velocity: self.bid_velocity,
        }
    }

    /// Apply a user-submitted bid. Rejected bids leave the listing untouched.
    pub fn place_bid(&mut self, amount_usd: f64) -> Result<Bid, BidError> {
        if !amount_usd.is_finite() || amount_usd <= 0.0 {
            return Err(BidError::NotFinite);
        }
        if amount_usd < self.floor_price_usd {
            return Err(BidError::BelowFloor(amount_usd, self.floor_price_usd));
        }
        if amount_usd <= self.highest_bid_usd {
            return Err(BidError::NotAboveHighest(amount_usd, self.highest_bid_usd));
        }

        self.highest_bid_usd = amount_usd;
        self.bid_history_usd.push(amount_usd);
        // A live bid nudges the observed bid rate upward.
        self.bid_velocity += 0.25;
        self.updated_at = Utc::now();

        Ok(Bid {
            listing_id: self.id.clone(),
            amount_usd,
            placed_at: self.updated_at,
        })
    }
}

/// Initial marketplace mock data, used when no snapshot exists.
pub fn seed_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: "enterprise-toolkit".to_string(),
            title_en: "Enterprise Prompt Engineering Toolkit".to_string(),
            title_bn: "এন্টারপ্রাইজ প্রম্পট ইঞ্জিনিয়ারিং টুলকিট".to_string(),
            category: "toolkit".to_string(),
            floor_price_usd: 280.0,
            highest_bid_usd: 342.0,
            bid_history_usd: vec![
                260.0, 272.0, 281.0, 296.0, 302.0, 315.0, 325.0, 329.0, 333.0, 338.0, 340.0,
                342.0,
            ],
            watchers: 186,
            bid_velocity: 5.2,
            updated_at: Utc::now(),
        },
        Listing {
            id: "bangla-copywriting-pack".to_string(),
            title_en: "Bengali Copywriting Prompt Pack".to_string(),
            title_bn: "বাংলা কপিরাইটিং প্রম্পট প্যাক".to_string(),
            category: "copywriting".to_string(),
            floor_price_usd: 24.0,
            highest_bid_usd: 31.5,
            bid_history_usd: vec![22.0, 24.5, 26.0, 27.5, 29.0, 30.25, 31.5],
            watchers: 64,
            bid_velocity: 2.1,
            updated_at: Utc::now(),
        },
        Listing {
            id: "midjourney-brand-kit".to_string(),
            title_en: "Midjourney Brand Identity Prompts".to_string(),
            title_bn: "মিডজার্নি ব্র্যান্ড আইডেন্টিটি প্রম্পট".to_string(),
            category: "art".to_string(),
            floor_price_usd: 58.0,
            highest_bid_usd: 73.0,
            bid_history_usd: vec![52.0, 55.0, 59.0, 61.0, 64.0, 66.0, 69.0, 71.0, 73.0],
            watchers: 112,
            bid_velocity: 3.8,
            updated_at: Utc::now(),
        },
    ]
}
