pub mod benchmarks;
pub mod engine;
pub mod types;
