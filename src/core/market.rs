//! Marketplace abstractions and core types

use crate::core::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Display;

/// Letter used by upstream for items whose name does not start with a letter.
pub const NON_ALPHABETIC_BUCKET: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterCount {
    pub letter: String,
    pub items: u64,
}

impl LetterCount {
    /// The letter as it must appear in a request query string.
    pub fn encoded_letter(&self) -> Cow<'_, str> {
        urlencoding::encode(&self.letter)
    }
}

/// Number of items per starting letter in a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub entries: Vec<LetterCount>,
}

impl CategoryBreakdown {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.items).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl From<&str> for Trend {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "positive" => Trend::Positive,
            "negative" => Trend::Negative,
            "neutral" => Trend::Neutral,
            _ => Trend::Unknown,
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Trend::Positive => "positive",
                Trend::Negative => "negative",
                Trend::Neutral => "neutral",
                Trend::Unknown => "unknown",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTrend {
    pub trend: Trend,
    pub price: i64,
}

/// Relative change over a longer window, e.g. `"+3.0%"` over 30 days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceChange {
    pub trend: Trend,
    pub change: String,
}

/// An item as listed on one page of a category listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_name: Option<String>,
    pub current: PriceTrend,
    pub today: PriceTrend,
    pub members: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsPage {
    pub total: u64,
    pub items: Vec<ListedItem>,
}

/// The full record returned for a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_name: String,
    pub current: PriceTrend,
    pub today: PriceTrend,
    pub members: bool,
    pub day30: Option<PriceChange>,
    pub day90: Option<PriceChange>,
    pub day180: Option<PriceChange>,
}

/// An item with the price it had when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category_name: String,
    pub members: bool,
    pub price: i64,
}

impl Item {
    pub fn from_listing(listed: &ListedItem, category: &Category) -> Self {
        Item {
            id: listed.id,
            name: listed.name.clone(),
            category_name: category.name.clone(),
            members: listed.members,
            price: listed.current.price,
        }
    }
}

impl From<&ItemDetail> for Item {
    fn from(detail: &ItemDetail) -> Self {
        Item {
            id: detail.id,
            name: detail.name.clone(),
            category_name: detail.category_name.clone(),
            members: detail.members,
            price: detail.current.price,
        }
    }
}

/// Daily and averaged prices of an item keyed by day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistory {
    pub daily: HashMap<DateTime<Utc>, i64>,
    pub average: HashMap<DateTime<Utc>, i64>,
}

fn sorted_prices(prices: &HashMap<DateTime<Utc>, i64>, ascending: bool) -> Vec<(DateTime<Utc>, i64)> {
    let mut points: Vec<_> = prices.iter().map(|(dt, price)| (*dt, *price)).collect();
    if ascending {
        points.sort_by_key(|(dt, _)| *dt);
    } else {
        points.sort_by_key(|(dt, _)| std::cmp::Reverse(*dt));
    }
    points
}

impl PriceHistory {
    pub fn daily_prices(&self, ascending: bool) -> Vec<(DateTime<Utc>, i64)> {
        sorted_prices(&self.daily, ascending)
    }

    pub fn average_prices(&self, ascending: bool) -> Vec<(DateTime<Utc>, i64)> {
        sorted_prices(&self.average, ascending)
    }
}

/// Remote source of marketplace data.
///
/// Every call is expected to apply its own retry policy; callers await them
/// one at a time.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// All categories ordered by ascending id.
    async fn categories(&self) -> Result<Vec<Category>>;

    async fn category_breakdown(&self, category_id: i64) -> Result<CategoryBreakdown>;

    /// One page of a letter bucket. `letter` is already percent-encoded.
    async fn items_page(&self, category_id: i64, letter: &str, page: u32) -> Result<ItemsPage>;

    async fn item_detail(&self, item_id: i64) -> Result<ItemDetail>;

    async fn price_history(&self, item_id: i64) -> Result<PriceHistory>;
}
