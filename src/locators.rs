use crate::browser::{BrowserSession, Locator};
use tracing::debug;

/// Ordered candidate locators for one logical field. Order encodes decreasing
/// preference; the list must never be empty.
#[derive(Debug, Clone)]
pub struct FieldLocators {
    pub field: &'static str,
    pub candidates: Vec<Locator>,
}

impl FieldLocators {
    pub fn new(field: &'static str, candidates: Vec<Locator>) -> Self {
        debug_assert!(
            !candidates.is_empty(),
            "candidate list for {field} must not be empty"
        );
        Self { field, candidates }
    }

    fn xpaths(field: &'static str, expressions: &[&str]) -> Self {
        Self::new(
            field,
            expressions.iter().map(|e| Locator::xpath(e)).collect(),
        )
    }
}

/// Tries each candidate strictly in order and returns the first text that
/// resolves. Exhaustion is a legitimate outcome, not an error: heterogeneous
/// page layouts mean most candidates miss most of the time.
pub fn resolve_text<S: BrowserSession + ?Sized>(
    session: &mut S,
    field: &FieldLocators,
) -> Option<String> {
    for (rank, candidate) in field.candidates.iter().enumerate() {
        if let Some(text) = session.read_text(candidate) {
            debug!(field = field.field, rank, "locator candidate matched");
            return Some(text);
        }
    }
    debug!(
        field = field.field,
        candidates = field.candidates.len(),
        "all locator candidates missed"
    );
    None
}

// --- Retailer listing and detail pages ---

pub fn listing_names() -> Locator {
    Locator::css(".product-name")
}

pub fn listing_prices() -> Locator {
    Locator::css(".price-box")
}

pub fn detail_extra_info() -> Locator {
    Locator::css(".extra-info")
}

/// The specifications tab sits in one of two places depending on which detail
/// template the product page uses.
pub fn detail_tab_variants() -> [Locator; 2] {
    [
        Locator::xpath(r#"//*[@id="top"]/body/div[2]/div/div[2]/div/div[2]/div[4]/div[2]/ul/li[3]"#),
        Locator::xpath(r#"//*[@id="top"]/body/div[2]/div/div[2]/div/div[2]/div[4]/div[3]/ul/li[3]"#),
    ]
}

// Rows 5 and 8 of the specifications table hold the age range and the EAN.
// Fixed positions, both template variants share the table markup.
pub fn specs_age_row() -> Locator {
    Locator::xpath(r#"//*[@id="product-attribute-specs-table"]/tbody/tr[5]"#)
}

pub fn specs_ean_row() -> Locator {
    Locator::xpath(r#"//*[@id="product-attribute-specs-table"]/tbody/tr[8]"#)
}

// --- Marketplace search and result pages ---

pub fn search_box() -> Locator {
    Locator::css("#twotabsearchtextbox")
}

pub fn search_button() -> Locator {
    Locator::css(".nav-input")
}

// Opening the sort menu and confirming the non-relevance option; sponsored
// slots stay pinned under relevance sort but not under this one.
pub fn sort_menu_option() -> Locator {
    Locator::xpath(r#"//*[@id="s-result-sort-select"]/option[2]"#)
}

pub fn sort_confirm() -> Locator {
    Locator::xpath(r#"//*[@id="s-result-sort-select_1"]"#)
}

pub fn marketplace_title() -> FieldLocators {
    FieldLocators::xpaths(
        "marketplace_title",
        &[
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[1]/div/div/div/h2/a/span"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[1]/div/div/div[1]/h2/a/span"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[1]/div/div/div/h2/a/span"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[1]/div/div/div[1]/h2/a/span"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[1]/div/div/div[1]/h2/a/span"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/h2"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/h2/a/span"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/h2/a/span"#,
        ],
    )
}

pub fn marketplace_price() -> FieldLocators {
    FieldLocators::xpaths(
        "marketplace_price",
        &[
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[1]/span[2]/span[1]"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[1]/span[2]/span[1]"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[1]/span[2]/span[1]"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[1]/span[2]/span[1]"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[4]/div/div/a/span[1]/span[2]/span[1]"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[4]/div/div/a/span[1]/span[2]/span[1]"#,
        ],
    )
}

pub fn marketplace_strike_price() -> FieldLocators {
    FieldLocators::xpaths(
        "marketplace_strike_price",
        &[
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[2]/span[2]"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[4]/div/div/a/span[2]/span[2]"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[1]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[2]/span[2]"#,
            r#"//*[@id="search"]/div[1]/div[1]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[2]/span[2]"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[2]/span[2]"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[2]/div[2]/div/div[2]/div[1]/div/div[1]/div/div/a/span[2]/span[2]"#,
            r#"//*[@id="search"]/div[1]/div[2]/div/span[3]/div[2]/div[2]/div/span/div/div/div[4]/div/div/a/span[2]/span[2]"#,
        ],
    )
}
