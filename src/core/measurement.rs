//! Time-series records emitted for downstream storage

use crate::core::market::{Category, Item};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MEASUREMENT_KIND: &str = "price";

/// One observed price of one item at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMeasurement {
    pub item_id: i64,
    pub category: String,
    pub members: bool,
    pub price: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct Tags<'a> {
    category: &'a str,
    item_id: i64,
    members: bool,
}

#[derive(Debug, Serialize)]
struct Fields {
    value: i64,
}

/// Flat point layout accepted by InfluxDB style stores.
#[derive(Debug, Serialize)]
pub struct MeasurementRecord<'a> {
    measurement: &'static str,
    tags: Tags<'a>,
    time: String,
    fields: Fields,
}

impl PriceMeasurement {
    pub fn new(item: &Item, category: &Category, price: i64, timestamp: DateTime<Utc>) -> Self {
        PriceMeasurement {
            item_id: item.id,
            category: category.name.clone(),
            members: item.members,
            price,
            timestamp,
        }
    }

    pub fn to_record(&self) -> MeasurementRecord<'_> {
        MeasurementRecord {
            measurement: MEASUREMENT_KIND,
            tags: Tags {
                category: &self.category,
                item_id: self.item_id,
                members: self.members,
            },
            time: self.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            fields: Fields { value: self.price },
        }
    }

    /// Serializes the measurement as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_record_layout() {
        let item = Item {
            id: 21787,
            name: "Steadfast boots".to_string(),
            category_name: "Miscellaneous".to_string(),
            members: true,
            price: 5_900_000,
        };
        let category = Category {
            id: 26,
            name: "Miscellaneous".to_string(),
        };
        let at = Utc.with_ymd_and_hms(2020, 7, 27, 13, 5, 9).unwrap()
            + chrono::Duration::milliseconds(750);

        let measurement = PriceMeasurement::new(&item, &category, item.price, at);
        let value: serde_json::Value = serde_json::from_str(&measurement.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "measurement": "price",
                "tags": {"category": "Miscellaneous", "item_id": 21787, "members": true},
                "time": "2020-07-27T13:05:09Z",
                "fields": {"value": 5_900_000}
            })
        );
    }
}
