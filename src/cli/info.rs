use super::{ui, user_error};
use crate::core::catalogue;
use crate::core::market::{Item, ItemDetail, MarketSource, PriceChange};
use anyhow::Result;
use comfy_table::Cell;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoCommand {
    ListCategories { with_counts: bool },
    Item(i64),
    Category(i64),
}

pub async fn run(source: &dyn MarketSource, command: InfoCommand, out: &mut dyn Write) -> Result<()> {
    match command {
        InfoCommand::ListCategories { with_counts } => list_categories(source, with_counts, out).await,
        InfoCommand::Item(item_id) => {
            let detail = source.item_detail(item_id).await.map_err(user_error)?;
            writeln!(out, "{}", ui::style_text(&detail_summary(&detail), ui::StyleType::Highlight))?;
            Ok(())
        }
        InfoCommand::Category(category_id) => {
            let category = catalogue::category_by_id(source, category_id)
                .await
                .map_err(user_error)?;
            let spinner = ui::new_spinner(&format!("Listing {}", category.name));
            let items = catalogue::category_items(source, &category).await;
            spinner.finish_and_clear();

            for item in items? {
                writeln!(out, "{}", ui::style_text(&item_summary(&item), ui::StyleType::Highlight))?;
            }
            Ok(())
        }
    }
}

async fn list_categories(source: &dyn MarketSource, with_counts: bool, out: &mut dyn Write) -> Result<()> {
    let categories = source.categories().await?;

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("ID"), ui::header_cell("Category")];
    if with_counts {
        header.push(ui::header_cell("Items"));
    }
    table.set_header(header);

    let spinner = with_counts.then(|| ui::new_spinner("Counting items"));
    for category in &categories {
        let mut row = vec![ui::number_cell(category.id), Cell::new(&category.name)];
        if with_counts {
            let total = catalogue::category_total(source, category.id).await?;
            row.push(ui::number_cell(total));
        }
        table.add_row(row);
    }
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    writeln!(out, "{table}")?;
    Ok(())
}

pub fn item_summary(item: &Item) -> String {
    format!(
        "{} ({}):\ncategory: {}\nmembers: {}\n\nprice: {}\n",
        item.name, item.id, item.category_name, item.members, item.price
    )
}

fn change_line(label: &str, change: &Option<PriceChange>) -> Option<String> {
    change
        .as_ref()
        .map(|c| format!("{label}: {} ({})", c.change, c.trend))
}

pub fn detail_summary(detail: &ItemDetail) -> String {
    let mut summary = item_summary(&Item::from(detail));
    summary.push_str(&format!("today: {} ({})\n", detail.today.price, detail.today.trend));
    for line in [
        change_line("30 days", &detail.day30),
        change_line("90 days", &detail.day90),
        change_line("180 days", &detail.day180),
    ]
    .into_iter()
    .flatten()
    {
        summary.push_str(&line);
        summary.push('\n');
    }
    if !detail.description.is_empty() {
        summary.push('\n');
        summary.push_str(&detail.description);
        summary.push('\n');
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::market::{PriceTrend, Trend};

    fn boots() -> ItemDetail {
        ItemDetail {
            id: 21787,
            name: "Steadfast boots".to_string(),
            description: "A pair of powerful-looking boots.".to_string(),
            category_name: "Miscellaneous".to_string(),
            current: PriceTrend {
                trend: Trend::Neutral,
                price: 5_900_000,
            },
            today: PriceTrend {
                trend: Trend::Negative,
                price: -138_200,
            },
            members: true,
            day30: Some(PriceChange {
                trend: Trend::Positive,
                change: "+0.0%".to_string(),
            }),
            day90: None,
            day180: None,
        }
    }

    #[test]
    fn test_item_summary() {
        let item = Item::from(&boots());
        assert_eq!(
            item_summary(&item),
            "Steadfast boots (21787):\ncategory: Miscellaneous\nmembers: true\n\nprice: 5900000\n"
        );
    }

    #[test]
    fn test_detail_summary_includes_changes() {
        let summary = detail_summary(&boots());
        assert!(summary.contains("today: -138200 (negative)"));
        assert!(summary.contains("30 days: +0.0% (positive)"));
        assert!(!summary.contains("90 days"));
        assert!(summary.ends_with("A pair of powerful-looking boots.\n"));
    }
}
