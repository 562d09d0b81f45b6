//! Core business logic abstractions

pub mod catalogue;
pub mod config;
pub mod decode;
pub mod error;
pub mod log;
pub mod market;
pub mod measurement;

// Re-export main types for cleaner imports
pub use error::ExchangeError;
pub use market::{Category, CategoryBreakdown, Item, MarketSource, PriceHistory};
pub use measurement::PriceMeasurement;
