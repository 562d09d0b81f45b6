use super::{Target, user_error, write_measurement};
use crate::core::catalogue;
use crate::core::market::{Category, MarketSource};
use crate::core::measurement::PriceMeasurement;
use anyhow::Result;
use chrono::Utc;
use std::io::Write;
use tracing::info;

/// Emits one measurement per item using the price it currently lists at.
pub async fn run(source: &dyn MarketSource, target: Target, out: &mut dyn Write) -> Result<()> {
    match target {
        Target::Item(item_id) => {
            let item = catalogue::item(source, item_id).await.map_err(user_error)?;
            let category = catalogue::category_for_item(source, &item)
                .await
                .map_err(user_error)?;
            let measurement = PriceMeasurement::new(&item, &category, item.price, Utc::now());
            write_measurement(out, &measurement)
        }
        Target::Category(category_id) => {
            let category = catalogue::category_by_id(source, category_id)
                .await
                .map_err(user_error)?;
            poll_category(source, &category, out).await
        }
        Target::All => {
            for category in source.categories().await? {
                poll_category(source, &category, out).await?;
            }
            Ok(())
        }
    }
}

async fn poll_category(
    source: &dyn MarketSource,
    category: &Category,
    out: &mut dyn Write,
) -> Result<()> {
    let items = catalogue::category_items(source, category).await?;
    info!(category = %category.name, items = items.len(), "Polling category");

    let now = Utc::now();
    for item in &items {
        write_measurement(out, &PriceMeasurement::new(item, category, item.price, now))?;
    }
    Ok(())
}
