use super::GrandExchangeProvider;
use super::items::ItemResponse;
use crate::core::error::{ExchangeError, Result};
use crate::core::market::ItemDetail;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct DetailResponse {
    item: ItemResponse,
}

impl TryFrom<ItemResponse> for ItemDetail {
    type Error = ExchangeError;

    fn try_from(value: ItemResponse) -> Result<Self> {
        Ok(ItemDetail {
            current: value.current()?,
            today: value.today()?,
            id: value.id,
            name: value.name,
            description: value.description,
            category_name: value.category_name.unwrap_or_default(),
            members: value.members,
            day30: value.day30.map(Into::into),
            day90: value.day90.map(Into::into),
            day180: value.day180.map(Into::into),
        })
    }
}

impl GrandExchangeProvider {
    /// Fetches one item. Any error status means the id is unknown upstream.
    #[instrument(name = "ItemDetail", skip(self))]
    pub(super) async fn get_item_detail(&self, item_id: i64) -> Result<ItemDetail> {
        let url = format!(
            "{}/api/catalogue/detail.json?item={}",
            self.api_url, item_id
        );
        let response: DetailResponse = match self.get_json(&url).await {
            Ok(response) => response,
            Err(ExchangeError::UpstreamRejected { .. }) => {
                return Err(ExchangeError::NoSuchItem(item_id));
            }
            Err(err) => return Err(err),
        };

        ItemDetail::try_from(response.item)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::provider_for;
    use super::*;
    use crate::core::market::{MarketSource, Trend};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DETAIL_JSON: &str = r#"{
        "item": {
            "icon": "", "icon_large": "", "id": 21787, "type": "Miscellaneous",
            "typeIcon": "", "name": "Steadfast boots",
            "description": "A pair of powerful-looking boots.",
            "current": {"trend": "neutral", "price": "5.9m"},
            "today": {"trend": "negative", "price": "- 138.2k"},
            "members": "true",
            "day30": {"trend": "positive", "change": "+0.0%"},
            "day90": {"trend": "negative", "change": "-3.0%"},
            "day180": {"trend": "negative", "change": "-4.0%"}
        }
    }"#;

    #[tokio::test]
    async fn test_item_detail() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/catalogue/detail.json"))
            .and(query_param("item", "21787"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_JSON))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server.uri(), None);
        let detail = provider.item_detail(21787).await.unwrap();

        assert_eq!(detail.id, 21787);
        assert_eq!(detail.name, "Steadfast boots");
        assert_eq!(detail.category_name, "Miscellaneous");
        assert_eq!(detail.current.price, 5_900_000);
        assert_eq!(detail.today.price, -138_200);
        assert_eq!(detail.today.trend, Trend::Negative);
        assert!(detail.members);
        assert_eq!(detail.day90.as_ref().map(|c| c.change.as_str()), Some("-3.0%"));
        assert_eq!(detail.day30.unwrap().trend, Trend::Positive);
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/catalogue/detail.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server.uri(), None);
        let result = provider.item_detail(1).await;
        assert!(matches!(result, Err(ExchangeError::NoSuchItem(1))));
    }
}
