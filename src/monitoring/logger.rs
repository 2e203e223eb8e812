use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;

use crate::pricing::types::PromptPricingResult;

pub struct CsvLogger {
    log_path: String,
}

impl CsvLogger {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !std::path::Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(
                file,
                "timestamp,listing_id,bid_usd,ask_usd,band_low_usd,band_high_usd,momentum,demand"
            )?;
        }

        Ok(Self { log_path })
    }

    /// Log one recommendation to CSV
    pub fn log_recommendation(
        &self,
        listing_id: &str,
        result: &PromptPricingResult,
    ) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.log_path)?;

        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            Utc::now().to_rfc3339(),
            listing_id,
            result.recommended_bid_usd,
            result.recommended_ask_usd,
            result.bid_band_usd[0],
            result.bid_band_usd[1],
            result.momentum_score,
            result.demand_score
        )?;

        Ok(())
    }

    /// Log a free-form event row
    pub fn log_event(&self, event: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.log_path)?;

        writeln!(file, "{},EVENT,{},,,,,", Utc::now().to_rfc3339(), event)?;

        Ok(())
    }
}
