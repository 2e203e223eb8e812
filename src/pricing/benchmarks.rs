use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::pricing::types::MarketPricingBenchmark;

#[derive(Debug, Deserialize)]
struct BenchmarkFile {
    benchmark: Vec<MarketPricingBenchmark>,
}

/// Load a benchmark table from a TOML file ([[benchmark]] entries).
pub fn load(path: &str) -> Result<Vec<MarketPricingBenchmark>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read benchmarks file: {}", path))?;

    let file: BenchmarkFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse benchmarks file: {}", path))?;

    Ok(file.benchmark)
}

/// Built-in comparables for prompt marketplaces, used when no benchmarks
/// file is configured. Figures are periodic manual surveys, not live data.
pub fn builtin() -> Vec<MarketPricingBenchmark> {
    vec![
        MarketPricingBenchmark {
            market: "PromptBase".to_string(),
            offering_en: "Curated Midjourney prompt bundles".to_string(),
            offering_bn: "বাছাই করা মিডজার্নি প্রম্পট বান্ডেল".to_string(),
            usd_range: [12.99, 89.99],
            usd_premium_anchor: Some(249.0),
            sample_size: 1840,
            notes: "Top sellers cluster near the range high".to_string(),
            source_url: "https://promptbase.com/marketplace".to_string(),
            last_updated: "2026-07-14".to_string(),
        },
        MarketPricingBenchmark {
            market: "PromptBase".to_string(),
            offering_en: "GPT system-prompt packs".to_string(),
            offering_bn: "জিপিটি সিস্টেম প্রম্পট প্যাক".to_string(),
            usd_range: [9.99, 59.99],
            usd_premium_anchor: Some(149.0),
            sample_size: 1260,
            notes: "High churn, prices stable quarter over quarter".to_string(),
            source_url: "https://promptbase.com/chatgpt".to_string(),
            last_updated: "2026-07-14".to_string(),
        },
        MarketPricingBenchmark {
            market: "Etsy".to_string(),
            offering_en: "AI art prompt collections".to_string(),
            offering_bn: "এআই আর্ট প্রম্পট সংগ্রহ".to_string(),
            usd_range: [4.49, 34.99],
            usd_premium_anchor: Some(79.0),
            sample_size: 640,
            notes: "Impulse-priced digital downloads".to_string(),
            source_url: "https://www.etsy.com/search?q=ai+prompts".to_string(),
            last_updated: "2026-06-30".to_string(),
        },
        MarketPricingBenchmark {
            market: "Gumroad".to_string(),
            offering_en: "Enterprise prompt engineering toolkits".to_string(),
            offering_bn: "এন্টারপ্রাইজ প্রম্পট ইঞ্জিনিয়ারিং টুলকিট".to_string(),
            usd_range: [49.0, 399.0],
            usd_premium_anchor: Some(899.0),
            sample_size: 210,
            notes: "Small sample, wide variance".to_string(),
            source_url: "https://gumroad.com/discover?query=prompt+toolkit".to_string(),
            last_updated: "2026-07-02".to_string(),
        },
        MarketPricingBenchmark {
            market: "Fiverr".to_string(),
            offering_en: "Custom prompt engineering gigs".to_string(),
            offering_bn: "কাস্টম প্রম্পট ইঞ্জিনিয়ারিং গিগ".to_string(),
            usd_range: [25.0, 240.0],
            usd_premium_anchor: Some(520.0),
            sample_size: 980,
            notes: "Service pricing, includes revisions".to_string(),
            source_url: "https://www.fiverr.com/categories/programming-tech/ai-coding/prompt-engineering".to_string(),
            last_updated: "2026-07-21".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_well_formed() {
        let table = builtin();
        assert!(!table.is_empty());

        for bench in &table {
            assert!(bench.usd_range[0] > 0.0);
            assert!(bench.usd_range[0] < bench.usd_range[1]);
            if let Some(anchor) = bench.usd_premium_anchor {
                assert!(anchor >= bench.usd_range[1]);
            }
            assert!(bench.sample_size > 0);
            assert!(!bench.offering_en.is_empty());
            assert!(!bench.offering_bn.is_empty());
        }
    }

    #[test]
    fn test_load_from_toml() {
        let raw = r#"
            [[benchmark]]
            market = "PromptBase"
            offering_en = "Test pack"
            offering_bn = "টেস্ট প্যাক"
            usd_range = [5.0, 20.0]
            usd_premium_anchor = 45.0
            sample_size = 12
            notes = ""
            source_url = "https://example.com"
            last_updated = "2026-01-01"

            [[benchmark]]
            market = "Etsy"
            offering_en = "No anchor pack"
            offering_bn = "অ্যাঙ্কর ছাড়া প্যাক"
            usd_range = [1.0, 9.0]
            sample_size = 4
            notes = ""
            source_url = "https://example.com"
            last_updated = "2026-01-01"
        "#;

        let path = std::env::temp_dir().join("prompthaat_benchmarks_test.toml");
        fs::write(&path, raw).unwrap();

        let table = load(path.to_str().unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].usd_premium_anchor, Some(45.0));
        assert_eq!(table[1].usd_premium_anchor, None);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load("/nonexistent/benchmarks.toml").is_err());
    }
}
