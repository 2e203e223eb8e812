use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::exchange::types::Bid;
use crate::pricing::types::PromptPricingResult;

/// One persisted recommendation row, read back for inspection.
#[derive(Debug, Clone)]
pub struct StoredRecommendation {
    pub id: i64,
    pub listing_id: String,
    pub bid_usd: f64,
    pub ask_usd: f64,
    pub band_low_usd: f64,
    pub band_high_usd: f64,
    pub momentum_score: f64,
    pub demand_score: f64,
    pub computed_at: DateTime<Utc>,
}

pub struct RecommendationDatabase {
    conn: Connection,
}

impl RecommendationDatabase {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS recommendations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id TEXT NOT NULL,
                bid_usd REAL NOT NULL,
                ask_usd REAL NOT NULL,
                band_low_usd REAL NOT NULL,
                band_high_usd REAL NOT NULL,
                momentum_score REAL NOT NULL,
                demand_score REAL NOT NULL,
                computed_at TIMESTAMP NOT NULL
            );

            CREATE TABLE IF NOT EXISTS bids (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id TEXT NOT NULL,
                amount_usd REAL NOT NULL,
                placed_at TIMESTAMP NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_recommendations_listing_id ON recommendations(listing_id);
            CREATE INDEX IF NOT EXISTS idx_recommendations_computed_at ON recommendations(computed_at);
            CREATE INDEX IF NOT EXISTS idx_bids_listing_id ON bids(listing_id);
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Insert one recommendation row
    pub fn insert_recommendation(
        &self,
        listing_id: &str,
        result: &PromptPricingResult,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO recommendations (listing_id, bid_usd, ask_usd, band_low_usd, band_high_usd, momentum_score, demand_score, computed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                listing_id,
                result.recommended_bid_usd,
                result.recommended_ask_usd,
                result.bid_band_usd[0],
                result.bid_band_usd[1],
                result.momentum_score,
                result.demand_score,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Insert one accepted user bid
    pub fn insert_bid(&self, bid: &Bid) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO bids (listing_id, amount_usd, placed_at) VALUES (?1, ?2, ?3)",
            params![bid.listing_id, bid.amount_usd, bid.placed_at.to_rfc3339()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent recommendation for a listing
    pub fn latest_for_listing(&self, listing_id: &str) -> Result<Option<StoredRecommendation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, listing_id, bid_usd, ask_usd, band_low_usd, band_high_usd, momentum_score, demand_score, computed_at
             FROM recommendations
             WHERE listing_id = ?1
             ORDER BY id DESC
             LIMIT 1",
        )?;

        let mut rows = stmt.query_map(params![listing_id], |row| {
            let computed_at_str: String = row.get(8)?;
            let computed_at = DateTime::parse_from_rfc3339(&computed_at_str)
                .unwrap()
                .with_timezone(&Utc);

            Ok(StoredRecommendation {
                id: row.get(0)?,
                listing_id: row.get(1)?,
                bid_usd: row.get(2)?,
                ask_usd: row.get(3)?,
                band_low_usd: row.get(4)?,
                band_high_usd: row.get(5)?,
                momentum_score: row.get(6)?,
                demand_score: row.get(7)?,
                computed_at,
            })
        })?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Count recommendations computed today
    pub fn count_recommendations_today(&self) -> Result<usize> {
        let today = Utc::now().format("%Y-%m-%d").to_string();

        let count: usize = self.conn.query_row(
            "SELECT COUNT(*) FROM recommendations WHERE DATE(computed_at) = ?1",
            params![today],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Count all stored bids
    pub fn count_bids(&self) -> Result<usize> {
        let count: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM bids", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Startup recovery: report what the store already holds.
pub fn recover_state(db: &RecommendationDatabase) -> Result<()> {
    use tracing::info;

    let today = db.count_recommendations_today()?;
    let bids = db.count_bids()?;
    info!(
        "Recovered state: {} recommendations today, {} bids on record",
        today, bids
    );

    Ok(())
}
