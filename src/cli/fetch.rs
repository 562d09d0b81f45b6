use super::{Target, user_error, write_measurement};
use crate::core::catalogue;
use crate::core::market::{Category, Item, MarketSource};
use crate::core::measurement::PriceMeasurement;
use anyhow::{Result, bail};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use std::io::Write;
use tracing::debug;

/// Days of history covered when no start is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1000;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Builds the range from command-line bounds.
    ///
    /// A specific `date` covers that single day and cannot be combined with
    /// `start` or `end`. Missing bounds default to the last
    /// [`DEFAULT_LOOKBACK_DAYS`] days up to `now`.
    pub fn from_bounds(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        match (start, end, date) {
            (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => {
                bail!("Simultaneous intervals and specific dates are not supported.")
            }
            (_, _, Some(date)) => Ok(DateRange {
                start: date,
                end: date + Duration::days(1),
            }),
            (start, end, None) => Ok(DateRange {
                start: start.unwrap_or(now - Duration::days(DEFAULT_LOOKBACK_DAYS)),
                end: end.unwrap_or(now),
            }),
        }
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        *dt >= self.start && *dt < self.end
    }
}

/// Parses `2020-06-06`, `2020-06-06T00:00:00` or `2020-06-06 00:00:00` as UTC.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid date {value:?}, expected YYYY-MM-DD[THH:MM:SS]"))
}

/// Emits historical daily prices inside `range` as measurements.
pub async fn run(
    source: &dyn MarketSource,
    range: DateRange,
    target: Target,
    out: &mut dyn Write,
) -> Result<()> {
    debug!(start = %range.start, end = %range.end, "Fetching historical prices");

    match target {
        Target::Item(item_id) => {
            let item = catalogue::item(source, item_id).await.map_err(user_error)?;
            let category = catalogue::category_for_item(source, &item)
                .await
                .map_err(user_error)?;
            write_history(source, &item, &category, &range, out).await
        }
        Target::Category(category_id) => {
            let category = catalogue::category_by_id(source, category_id)
                .await
                .map_err(user_error)?;
            fetch_category(source, &category, &range, out).await
        }
        Target::All => {
            for category in source.categories().await? {
                fetch_category(source, &category, &range, out).await?;
            }
            Ok(())
        }
    }
}

async fn fetch_category(
    source: &dyn MarketSource,
    category: &Category,
    range: &DateRange,
    out: &mut dyn Write,
) -> Result<()> {
    for item in catalogue::category_items(source, category).await? {
        write_history(source, &item, category, range, out).await?;
    }
    Ok(())
}

async fn write_history(
    source: &dyn MarketSource,
    item: &Item,
    category: &Category,
    range: &DateRange,
    out: &mut dyn Write,
) -> Result<()> {
    for (dt, price) in catalogue::historical_prices(source, item).await? {
        if range.contains(&dt) {
            write_measurement(out, &PriceMeasurement::new(item, category, price, dt))?;
        }
    }
    Ok(())
}
