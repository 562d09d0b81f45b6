use super::GrandExchangeProvider;
use crate::core::error::{ExchangeError, Result};
use crate::core::market::{Category, CategoryBreakdown, LetterCount};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static CATEGORY_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".categories a").expect("category selector is valid"));

#[derive(Debug, Deserialize)]
struct BreakdownResponse {
    alpha: Vec<LetterCountResponse>,
}

#[derive(Debug, Deserialize)]
struct LetterCountResponse {
    letter: String,
    items: u64,
}

/// Extracts categories from the catalogue page, ordered by id.
///
/// Each link's text is the name and its href ends in `=<id>`. When an id
/// shows up twice the later name wins.
fn parse_categories(html: &str) -> Result<Vec<Category>> {
    let document = Html::parse_document(html);
    let mut categories = BTreeMap::new();

    for link in document.select(&CATEGORY_LINKS) {
        let href = link.value().attr("href").unwrap_or_default();
        let id = href
            .rsplit('=')
            .next()
            .and_then(|tail| tail.trim().parse::<i64>().ok())
            .ok_or_else(|| ExchangeError::MalformedCategoryLink {
                href: href.to_string(),
            })?;
        let name = link.text().collect::<String>().trim().to_string();

        categories.insert(id, name);
    }

    Ok(categories
        .into_iter()
        .map(|(id, name)| Category { id, name })
        .collect())
}

impl GrandExchangeProvider {
    #[instrument(name = "CategoryList", skip(self))]
    pub(super) async fn list_categories(&self) -> Result<Vec<Category>> {
        let url = format!("{}/catalogue", self.catalogue_url);
        // Parsing happens outside the retried call: a bad link will not fix itself
        let html = self.get_text(&url).await?;
        let categories = parse_categories(&html)?;
        debug!(count = categories.len(), "Parsed categories");
        Ok(categories)
    }

    #[instrument(name = "CategoryBreakdown", skip(self))]
    pub(super) async fn get_category_breakdown(&self, category_id: i64) -> Result<CategoryBreakdown> {
        let url = format!(
            "{}/api/catalogue/category.json?category={}",
            self.api_url, category_id
        );
        let response: BreakdownResponse = self.get_json(&url).await?;

        Ok(CategoryBreakdown {
            entries: response
                .alpha
                .into_iter()
                .map(|entry| LetterCount {
                    letter: entry.letter,
                    items: entry.items,
                })
                .collect(),
        })
    }
}
