//! Site selectors for the marketplace UI.
//!
//! Kept in one serde-friendly struct so a site markup change is a config
//! edit, not a code change. Defaults match the marketplace as last verified.

use serde::{Deserialize, Serialize};

/// CSS selectors and link texts for the marketplace pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSelectors {
    /// Text of the login link on the landing page
    pub login_link_text: String,
    /// Account number field on the login form
    pub account_input: String,
    /// User name field on the login form
    pub username_input: String,
    /// Password field on the login form
    pub password_input: String,
    /// Part number field on the search form
    pub search_input: String,
    /// Search submit button
    pub search_button: String,
    /// Rows of the search results table
    pub results_rows: String,
    /// Cells within a results row
    pub results_cells: String,
    /// Supplier link within the supplier cell
    pub supplier_link: String,
    /// Marker class identifying authorized distributors
    pub authorized_marker: String,
    /// Text of the e-mail RFQ link in the supplier popup
    pub rfq_link_text: String,
    /// Part selection checkbox on the RFQ form
    pub part_checkbox: String,
    /// Quantity field on the RFQ form
    pub quantity_input: String,
    /// Comments field on the RFQ form
    pub comments_input: String,
    /// Send button on the RFQ form
    pub send_button: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            login_link_text: "Login".to_string(),
            account_input: "#AccountNumber".to_string(),
            username_input: "#UserName".to_string(),
            password_input: "#Password".to_string(),
            search_input: "#PartsSearched_0__PartNumber".to_string(),
            search_button: "#btnSearch".to_string(),
            results_rows: "table#trv_0 tbody tr".to_string(),
            results_cells: "td".to_string(),
            supplier_link: "a".to_string(),
            authorized_marker: ".ncauth".to_string(),
            rfq_link_text: "E-Mail RFQ".to_string(),
            part_checkbox: "#Parts_0__Selected".to_string(),
            quantity_input: "#Parts_0__Quantity".to_string(),
            comments_input: "#Comments".to_string(),
            send_button: "input[value='Send RFQ']".to_string(),
        }
    }
}

/// Column positions in the results table.
pub mod columns {
    /// Part number as matched by the marketplace
    pub const PART: usize = 0;
    /// Date code
    pub const DATE_CODE: usize = 4;
    /// Available quantity
    pub const QUANTITY: usize = 8;
    /// Supplier name link
    pub const SUPPLIER: usize = 15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let selectors = SiteSelectors::default();
        let toml_str = toml::to_string(&selectors).expect("serialize selectors");
        let parsed: SiteSelectors = toml::from_str(&toml_str).expect("parse selectors");
        assert_eq!(parsed.search_input, selectors.search_input);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let parsed: SiteSelectors =
            toml::from_str("search_button = \"#searchNow\"").expect("parse selectors");
        assert_eq!(parsed.search_button, "#searchNow");
        assert_eq!(parsed.account_input, "#AccountNumber");
    }
}
