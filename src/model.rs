use serde::{Deserialize, Serialize};
use std::fmt;

/// Detail-page fields that could not be read for a product.
pub const NO_INFORMATION: &str = "No information for this product";

/// Marketplace price that no layout variant surfaced.
pub const PRICE_NOT_AVAILABLE: &str = "not available";

/// Identifier produced when the raw EAN text has no label/value shape.
pub const IDENTIFIER_FALLBACK: &str = "information for this product";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub display_price_text: String,
    pub product_link: String,
    pub availability: String,
    pub age_range: String,
    pub ean_raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn fallback() -> Self {
        Identifier(IDENTIFIER_FALLBACK.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceRecord {
    pub identifier: Identifier,
    pub title: String,
    pub price: String,
    pub strike_price: String,
}

impl MarketplaceRecord {
    /// Placeholder keeping one entry per searched identifier when the search
    /// or sort interaction fails before any field can be read.
    pub fn empty(identifier: Identifier) -> Self {
        Self {
            identifier,
            title: String::new(),
            price: String::new(),
            strike_price: String::new(),
        }
    }
}

// Field order doubles as the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub identifier: Identifier,
    pub retailer_price: String,
    pub retailer_title: String,
    pub retailer_link: String,
    pub retailer_availability: String,
    pub retailer_age_range: String,
    pub marketplace_price: String,
    pub marketplace_strike_price: String,
    pub marketplace_title: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub products_listed: usize,
    pub prices_listed: usize,
    pub detail_link_misses: usize,
    pub specs_table_misses: usize,
    pub identifier_fallbacks: usize,
    pub searches: usize,
    pub search_misses: usize,
    pub joined_rows: usize,
    pub files_written: usize,
}
