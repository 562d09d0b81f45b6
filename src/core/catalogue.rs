//! Category lookups and the paginated item enumerator

use crate::core::error::{ExchangeError, Result};
use crate::core::market::{Category, CategoryBreakdown, Item, MarketSource};
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Returns the category with the given id.
pub async fn category_by_id(source: &dyn MarketSource, category_id: i64) -> Result<Category> {
    source
        .categories()
        .await?
        .into_iter()
        .find(|c| c.id == category_id)
        .ok_or_else(|| ExchangeError::NoSuchCategory(category_id.to_string()))
}

/// Returns the category an item is listed under, matched by name.
pub async fn category_for_item(source: &dyn MarketSource, item: &Item) -> Result<Category> {
    source
        .categories()
        .await?
        .into_iter()
        .find(|c| c.name == item.category_name)
        .ok_or_else(|| ExchangeError::NoSuchCategory(item.category_name.clone()))
}

/// Total number of items in a category according to its breakdown.
pub async fn category_total(source: &dyn MarketSource, category_id: i64) -> Result<u64> {
    Ok(source.category_breakdown(category_id).await?.total())
}

/// Fetches a single item with its current price.
pub async fn item(source: &dyn MarketSource, item_id: i64) -> Result<Item> {
    let detail = source.item_detail(item_id).await?;
    Ok(Item::from(&detail))
}

/// Daily prices of an item, newest first.
pub async fn historical_prices(
    source: &dyn MarketSource,
    item: &Item,
) -> Result<Vec<(DateTime<Utc>, i64)>> {
    Ok(source.price_history(item.id).await?.daily_prices(false))
}

/// Lists every item in a category.
pub async fn category_items(source: &dyn MarketSource, category: &Category) -> Result<Vec<Item>> {
    let breakdown = source.category_breakdown(category.id).await?;
    enumerate_items(source, category, &breakdown).await
}

/// Walks every letter bucket of `breakdown` page by page.
///
/// An empty page ends a bucket. The expected count only prevents one more
/// request once that many items were seen; a non-empty page is always taken
/// in full. Any failure discards everything collected so far.
#[instrument(skip(source, breakdown), fields(category_id = category.id))]
pub async fn enumerate_items(
    source: &dyn MarketSource,
    category: &Category,
    breakdown: &CategoryBreakdown,
) -> Result<Vec<Item>> {
    let mut items = Vec::new();

    for bucket in &breakdown.entries {
        let letter = bucket.encoded_letter();
        let mut count = 0u64;
        let mut page = 1u32;

        while count < bucket.items {
            let batch = source.items_page(category.id, &letter, page).await?;
            if batch.items.is_empty() {
                debug!(
                    letter = %bucket.letter,
                    page,
                    count,
                    expected = bucket.items,
                    "Empty page, bucket finished"
                );
                break;
            }

            count += batch.items.len() as u64;
            items.extend(
                batch
                    .items
                    .iter()
                    .map(|listed| Item::from_listing(listed, category)),
            );
            page += 1;
        }

        if count != bucket.items {
            debug!(
                letter = %bucket.letter,
                count,
                expected = bucket.items,
                "Bucket size differs from breakdown"
            );
        }
    }

    debug!(total = items.len(), "Enumerated category items");
    Ok(items)
}
