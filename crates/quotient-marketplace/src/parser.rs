//! Search-results parsing.
//!
//! The marketplace renders one big results table: region header rows
//! ("Americas", "Europe", "Asia/Other"), section subheaders ("In Stock",
//! "Brokered"), then 16+-cell data rows. The parser walks the rows in
//! order, tracking the current region and section, and emits one
//! `ListingRecord` per qualifying in-stock data row. Brokered rows are the
//! only rows dropped here; regional and distributor filtering is selection
//! policy, not parsing.

use crate::error::{MarketplaceError, Result};
use crate::selectors::{columns, SiteSelectors};
use quotient_core::{ListingRecord, Region};
use scraper::{ElementRef, Html, Selector};

/// Header rows span the table and have only a handful of cells.
const HEADER_ROW_MAX_CELLS: usize = 4;

/// Data rows carry at least this many cells.
const DATA_ROW_MIN_CELLS: usize = 16;

/// Parses marketplace search-results HTML into listing records.
pub struct ListingParser {
    rows: Selector,
    cells: Selector,
    supplier_link: Selector,
    authorized_marker: Selector,
}

impl ListingParser {
    /// Build a parser from the configured selectors.
    ///
    /// # Errors
    /// Returns a parse error when a selector is not valid CSS.
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        let parse = |name: &str, css: &str| {
            Selector::parse(css)
                .map_err(|e| MarketplaceError::Parse(format!("invalid {name} selector: {e}")))
        };

        Ok(Self {
            rows: parse("results rows", &selectors.results_rows)?,
            cells: parse("results cells", &selectors.results_cells)?,
            supplier_link: parse("supplier link", &selectors.supplier_link)?,
            authorized_marker: parse("authorized marker", &selectors.authorized_marker)?,
        })
    }

    /// Parse a results page for the searched part.
    #[must_use]
    pub fn parse(&self, html: &str, searched_part: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);

        let mut region: Option<Region> = None;
        let mut in_stock_section = false;
        let mut records = Vec::new();

        for row in document.select(&self.rows) {
            let cells: Vec<ElementRef<'_>> = row.select(&self.cells).collect();
            let row_text = text_of(&row).to_lowercase();

            if cells.len() <= HEADER_ROW_MAX_CELLS {
                if row_text.contains("americas") {
                    region = Some(Region::Americas);
                } else if row_text.contains("europe") {
                    region = Some(Region::Europe);
                } else if row_text.contains("asia") || row_text.contains("other") {
                    region = Some(Region::AsiaOther);
                }

                if row_text.contains("in stock") || row_text.contains("in-stock") {
                    in_stock_section = true;
                } else if row_text.contains("brokered") {
                    in_stock_section = false;
                }
                continue;
            }

            if cells.len() < DATA_ROW_MIN_CELLS || !in_stock_section {
                continue;
            }
            let Some(region) = region else {
                continue;
            };

            let supplier_cell = &cells[columns::SUPPLIER];
            let Some(link) = supplier_cell.select(&self.supplier_link).next() else {
                continue;
            };
            let supplier = text_of(&link);
            if supplier.is_empty() {
                continue;
            }

            let authorized_distributor = supplier_cell
                .select(&self.authorized_marker)
                .next()
                .is_some();

            let date_code = cells
                .get(columns::DATE_CODE)
                .map(|c| text_of(c))
                .unwrap_or_default();

            let available_quantity = cells
                .get(columns::QUANTITY)
                .map(|c| parse_quantity(&text_of(c)))
                .unwrap_or(0);

            let part_variant = cells
                .get(columns::PART)
                .map(|c| text_of(c))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| searched_part.to_string());

            records.push(ListingRecord {
                part_variant,
                supplier,
                region,
                available_quantity,
                date_code,
                authorized_distributor,
                min_order_value: None,
            });
        }

        tracing::debug!(
            part = searched_part,
            rows = records.len(),
            "parsed search results"
        );
        records
    }
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse a quantity cell like "1,500 pcs" to its leading integer.
fn parse_quantity(text: &str) -> u32 {
    let cleaned = text.replace(',', "");
    let digits: String = cleaned
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
