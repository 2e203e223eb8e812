use anyhow::{Context, Result};
use dashmap::DashMap;
use std::fs;

use crate::exchange::types::Listing;

/// Concurrent registry of live listings. Mutation happens through
/// `with_listing`, which holds the shard lock for the duration of the
/// closure; reads hand out clones.
pub struct ListingBoard {
    listings: DashMap<String, Listing>,
}

impl ListingBoard {
    pub fn new() -> Self {
        Self {
            listings: DashMap::new(),
        }
    }

    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let board = Self::new();
        for listing in listings {
            board.insert(listing);
        }
        board
    }

    pub fn insert(&self, listing: Listing) {
        self.listings.insert(listing.id.clone(), listing);
    }

    pub fn get(&self, id: &str) -> Option<Listing> {
        self.listings.get(id).map(|entry| entry.value().clone())
    }

    /// Run a closure against one listing under its shard lock.
    pub fn with_listing<F, R>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Listing) -> R,
    {
        self.listings.get_mut(id).map(|mut entry| f(&mut entry))
    }

    /// Listing ids, sorted for stable iteration order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.listings.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn snapshot(&self) -> Vec<Listing> {
        let mut listings: Vec<Listing> =
            self.listings.iter().map(|e| e.value().clone()).collect();
        listings.sort_by(|a, b| a.id.cmp(&b.id));
        listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Persist the board as JSON so listing state survives restarts.
    pub fn save_snapshot(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write board snapshot: {}", path))?;
        Ok(())
    }

    pub fn load_snapshot(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read board snapshot: {}", path))?;
        let listings: Vec<Listing> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse board snapshot: {}", path))?;
        Ok(Self::from_listings(listings))
    }
}

impl Default for ListingBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::types::seed_listings;

    #[test]
    fn test_insert_and_get() {
        let board = ListingBoard::from_listings(seed_listings());
        assert_eq!(board.len(), 3);

        let listing = board.get("enterprise-toolkit").unwrap();
        assert_eq!(listing.highest_bid_usd, 342.0);
        assert!(board.get("missing").is_none());
    }

    #[test]
    fn test_with_listing_mutates_in_place() {
        let board = ListingBoard::from_listings(seed_listings());

        let accepted = board
            .with_listing("enterprise-toolkit", |listing| listing.place_bid(350.0))
            .unwrap();
        assert!(accepted.is_ok());
        assert_eq!(board.get("enterprise-toolkit").unwrap().highest_bid_usd, 350.0);

        assert!(board.with_listing("missing", |_| ()).is_none());
    }

    #[test]
    fn test_snapshot_sorted_by_id() {
        let board = ListingBoard::from_listings(seed_listings());
        let snapshot = board.snapshot();
        let ids: Vec<&str> = snapshot.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "bangla-copywriting-pack",
                "enterprise-toolkit",
                "midjourney-brand-kit"
            ]
        );
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let board = ListingBoard::from_listings(seed_listings());
        let path = std::env::temp_dir().join("prompthaat_board_test.json");
        let path = path.to_str().unwrap().to_string();

        board.save_snapshot(&path).unwrap();
        let restored = ListingBoard::load_snapshot(&path).unwrap();

        assert_eq!(restored.len(), board.len());
        let original = board.get("midjourney-brand-kit").unwrap();
        let roundtrip = restored.get("midjourney-brand-kit").unwrap();
        assert_eq!(roundtrip.highest_bid_usd, original.highest_bid_usd);
        assert_eq!(roundtrip.bid_history_usd, original.bid_history_usd);
        assert_eq!(roundtrip.title_bn, original.title_bn);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_snapshot_errors() {
        assert!(ListingBoard::load_snapshot("/nonexistent/board.json").is_err());
    }
}
