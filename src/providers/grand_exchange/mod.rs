//! Client for the Grand Exchange catalogue service.
//!
//! The service mixes JSON endpoints (breakdowns, item pages, details, price
//! graphs) with an HTML catalogue page listing the categories. Every request
//! goes through the client's [`RetryPolicy`].

mod category;
mod details;
mod graph;
mod items;

use crate::core::config::{AppConfig, GrandExchangeConfig};
use crate::core::error::{ExchangeError, Result};
use crate::core::market::{
    Category, CategoryBreakdown, ItemDetail, ItemsPage, MarketSource, PriceHistory,
};
use crate::providers::util::RetryPolicy;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct GrandExchangeProvider {
    api_url: String,
    catalogue_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl GrandExchangeProvider {
    pub fn new(config: &GrandExchangeConfig, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|source| ExchangeError::Transport {
                url: config.api_url.clone(),
                source,
            })?;

        Ok(GrandExchangeProvider {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            catalogue_url: config.catalogue_url.trim_end_matches('/').to_string(),
            client,
            retry,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.providers.grand_exchange,
            RetryPolicy::from_config(&config.retry),
        )
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        debug!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ExchangeError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::UpstreamRejected {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| ExchangeError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches a page as text, retrying transient failures.
    async fn get_text(&self, url: &str) -> Result<String> {
        self.retry.run(|| self.fetch_body(url)).await
    }

    /// Fetches and parses a JSON document. The body is parsed inside the
    /// retried call so truncated payloads are fetched again.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.retry
            .run(|| async move {
                let body = self.fetch_body(url).await?;
                serde_json::from_str(&body).map_err(|source| ExchangeError::MalformedBody {
                    url: url.to_string(),
                    source,
                })
            })
            .await
    }
}

#[async_trait]
impl MarketSource for GrandExchangeProvider {
    async fn categories(&self) -> Result<Vec<Category>> {
        self.list_categories().await
    }

    async fn category_breakdown(&self, category_id: i64) -> Result<CategoryBreakdown> {
        self.get_category_breakdown(category_id).await
    }

    async fn items_page(&self, category_id: i64, letter: &str, page: u32) -> Result<ItemsPage> {
        self.get_items_page(category_id, letter, page).await
    }

    async fn item_detail(&self, item_id: i64) -> Result<ItemDetail> {
        self.get_item_detail(item_id).await
    }

    async fn price_history(&self, item_id: i64) -> Result<PriceHistory> {
        self.get_price_history(item_id).await
    }
}
