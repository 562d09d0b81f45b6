use super::GrandExchangeProvider;
use crate::core::decode::{RawPrice, deserialize_flag};
use crate::core::error::Result;
use crate::core::market::{ItemsPage, ListedItem, PriceChange, PriceTrend, Trend};
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
pub(super) struct TrendResponse {
    trend: String,
    price: RawPrice,
}

impl TrendResponse {
    fn decode(&self) -> Result<PriceTrend> {
        Ok(PriceTrend {
            trend: Trend::from(self.trend.as_str()),
            price: self.price.decode()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ChangeResponse {
    trend: String,
    change: String,
}

impl From<ChangeResponse> for PriceChange {
    fn from(value: ChangeResponse) -> Self {
        PriceChange {
            trend: Trend::from(value.trend.as_str()),
            change: value.change,
        }
    }
}

/// Item record shared by the listing and detail endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct ItemResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub category_name: Option<String>,
    pub current: TrendResponse,
    pub today: TrendResponse,
    #[serde(deserialize_with = "deserialize_flag")]
    pub members: bool,
    pub day30: Option<ChangeResponse>,
    pub day90: Option<ChangeResponse>,
    pub day180: Option<ChangeResponse>,
}

impl ItemResponse {
    pub fn current(&self) -> Result<PriceTrend> {
        self.current.decode()
    }

    pub fn today(&self) -> Result<PriceTrend> {
        self.today.decode()
    }
}

impl TryFrom<ItemResponse> for ListedItem {
    type Error = crate::core::error::ExchangeError;

    fn try_from(value: ItemResponse) -> Result<Self> {
        Ok(ListedItem {
            current: value.current()?,
            today: value.today()?,
            id: value.id,
            name: value.name,
            description: value.description,
            category_name: value.category_name,
            members: value.members,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ItemsPageResponse {
    total: u64,
    items: Vec<ItemResponse>,
}

impl GrandExchangeProvider {
    #[instrument(name = "ItemsPage", skip(self))]
    pub(super) async fn get_items_page(
        &self,
        category_id: i64,
        letter: &str,
        page: u32,
    ) -> Result<ItemsPage> {
        let url = format!(
            "{}/api/catalogue/items.json?category={}&alpha={}&page={}",
            self.api_url, category_id, letter, page
        );
        let response: ItemsPageResponse = self.get_json(&url).await?;

        let items = response
            .items
            .into_iter()
            .map(ListedItem::try_from)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = items.len(), total = response.total, "Decoded items page");

        Ok(ItemsPage {
            total: response.total,
            items,
        })
    }
}
