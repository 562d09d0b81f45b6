use super::GrandExchangeProvider;
use crate::core::decode::{RawPrice, decode_timestamp};
use crate::core::error::{ExchangeError, Result};
use crate::core::market::PriceHistory;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct GraphResponse {
    daily: HashMap<String, RawPrice>,
    average: HashMap<String, RawPrice>,
}

/// Keys that land on the same second after truncation are rejected, since
/// either value could otherwise win.
fn decode_series(series: HashMap<String, RawPrice>) -> Result<HashMap<DateTime<Utc>, i64>> {
    let mut decoded = HashMap::with_capacity(series.len());
    for (key, price) in series {
        let timestamp = decode_timestamp(&key)?;
        if decoded.insert(timestamp, price.decode()?).is_some() {
            return Err(ExchangeError::MalformedTimestamp { raw: key });
        }
    }
    Ok(decoded)
}

impl GrandExchangeProvider {
    #[instrument(name = "PriceGraph", skip(self))]
    pub(super) async fn get_price_history(&self, item_id: i64) -> Result<PriceHistory> {
        let url = format!("{}/api/graph/{}.json", self.api_url, item_id);
        let response: GraphResponse = self.get_json(&url).await?;

        let history = PriceHistory {
            daily: decode_series(response.daily)?,
            average: decode_series(response.average)?,
        };
        debug!(
            daily = history.daily.len(),
            average = history.average.len(),
            "Decoded price graph"
        );
        Ok(history)
    }
}
