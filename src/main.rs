mod config;
mod exchange;
mod monitoring;
mod pricing;

use anyhow::Result;
use std::time::Duration;

use config::{Config, EnvConfig};
use exchange::board::ListingBoard;
use exchange::persistence::{recover_state, RecommendationDatabase};
use exchange::simulator::MarketSimulator;
use exchange::types::seed_listings;
use monitoring::logger::CsvLogger;
use pricing::benchmarks;
use pricing::engine::PricingEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("🚀 PromptHaat pricer starting...");

    // Load configuration
    let config = Config::load("config.toml")?;
    let env_config = EnvConfig::load()?;

    let dry_run = config.system.dry_run || env_config.dry_run;
    tracing::info!("Dry run mode: {}", dry_run);

    // Initialize database
    let database_path = env_config
        .database_path
        .unwrap_or_else(|| config.system.database_path.clone());
    tracing::info!("Initializing database: {}", database_path);
    let db = RecommendationDatabase::new(&database_path)?;
    recover_state(&db)?;

    // Load the static market benchmark table
    let benchmark_table = match &config.system.benchmarks_path {
        Some(path) => benchmarks::load(path)?,
        None => benchmarks::builtin(),
    };
    tracing::info!("Loaded {} market benchmarks", benchmark_table.len());

    // Restore the listing board, or seed it on first run
    let board = match ListingBoard::load_snapshot(&config.system.snapshot_path) {
        Ok(board) if !board.is_empty() => {
            tracing::info!("Restored {} listings from snapshot", board.len());
            board
        }
        _ => {
            tracing::info!("Seeding listing board");
            ListingBoard::from_listings(seed_listings())
        }
    };

    let engine = PricingEngine::new(config.pricing.clone(), benchmark_table);
    let simulator = MarketSimulator::new(config.exchange.clone());

    let csv_logger = if config.system.csv_logging {
        Some(CsvLogger::new(config.system.csv_log_path.clone())?)
    } else {
        None
    };

    let mut interval =
        tokio::time::interval(Duration::from_secs(config.exchange.tick_interval_secs));

    tracing::info!("✅ Pricer initialized, entering market tick loop");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for id in board.ids() {
                    let result = board.with_listing(&id, |listing| {
                        simulator.tick(listing);
                        engine.recommend(&listing.pricing_input())
                    });

                    let Some(result) = result else { continue };

                    tracing::info!(
                        "{}: bid ${:.2} / ask ${:.2} (momentum {:.2}, demand {:.2})",
                        id,
                        result.recommended_bid_usd,
                        result.recommended_ask_usd,
                        result.momentum_score,
                        result.demand_score
                    );

                    if !dry_run {
                        db.insert_recommendation(&id, &result)?;
                        if let Some(logger) = &csv_logger {
                            logger.log_recommendation(&id, &result)?;
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    board.save_snapshot(&config.system.snapshot_path)?;
    tracing::info!("✅ Board snapshot saved to {}", config.system.snapshot_path);

    Ok(())
}
