use crate::browser::{BrowserSession, Locator};
use crate::locators;
use crate::model::{NO_INFORMATION, ProductRecord, RunReport};
use crate::pacing::{Pacer, PacingPolicy, ms};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Walks the retailer's unpaginated "show all" category listing and visits
/// each product's detail page. Owns its browser session for its whole
/// lifetime.
pub struct RetailerExtractor<S: BrowserSession> {
    session: S,
    pacing: PacingPolicy,
}

impl<S: BrowserSession> RetailerExtractor<S> {
    pub fn open(mut session: S, listing_url: &str, pacing: PacingPolicy) -> Result<Self> {
        session.navigate(listing_url)?;
        info!(url = listing_url, "retailer listing opened");
        Ok(Self { session, pacing })
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// One `ProductRecord` per listed product, whatever the detail page
    /// yields. Downstream joining is positional, so a per-product failure
    /// must produce a placeholder, never an omission.
    pub fn extract(
        &mut self,
        pacer: &mut dyn Pacer,
        limit: Option<usize>,
        report: &mut RunReport,
    ) -> Vec<ProductRecord> {
        let names = self.session.read_all_texts(&locators::listing_names());
        let prices = self.session.read_all_texts(&locators::listing_prices());
        report.products_listed = names.len();
        report.prices_listed = prices.len();
        if names.len() != prices.len() {
            warn!(
                names = names.len(),
                prices = prices.len(),
                "listing name and price counts differ; zipping to the shorter"
            );
        }

        let mut count = names.len().min(prices.len());
        if let Some(limit) = limit {
            count = count.min(limit);
        }

        let mut records = Vec::with_capacity(count);
        for (name, price) in names.into_iter().zip(prices).take(count) {
            records.push(self.visit_detail(name, price, pacer, report));
        }

        info!(products = records.len(), "retailer extraction complete");
        records
    }

    fn visit_detail(
        &mut self,
        name: String,
        display_price_text: String,
        pacer: &mut dyn Pacer,
        report: &mut RunReport,
    ) -> ProductRecord {
        let link_locator = Locator::link_text(&name);
        let Some(link) = self.session.read_attribute(&link_locator, "href") else {
            report.detail_link_misses += 1;
            debug!(product = %name, "detail link not found on listing");
            // Link-miss branch: empty placeholders, no navigation happened.
            return ProductRecord {
                name,
                display_price_text,
                product_link: String::new(),
                availability: String::new(),
                age_range: String::new(),
                ean_raw: String::new(),
            };
        };

        pacer.pause(ms(self.pacing.listing_pause_ms));
        if !self.session.click(&link_locator) {
            report.detail_link_misses += 1;
            debug!(product = %name, "detail link found but click failed");
            return ProductRecord {
                name,
                display_price_text,
                product_link: link,
                availability: String::new(),
                age_range: String::new(),
                ean_raw: String::new(),
            };
        }

        let (availability, age_range, ean_raw) = self.read_detail_fields(pacer, report);

        // Back to the listing regardless of what the detail page yielded, so
        // the next product's link lookup starts from the right page.
        pacer.pause(ms(self.pacing.back_pause_ms));
        self.session.go_back();

        ProductRecord {
            name,
            display_price_text,
            product_link: link,
            availability,
            age_range,
            ean_raw,
        }
    }

    fn read_detail_fields(
        &mut self,
        pacer: &mut dyn Pacer,
        report: &mut RunReport,
    ) -> (String, String, String) {
        let Some(availability) = self.session.read_text(&locators::detail_extra_info()) else {
            // Availability-miss branch: both table fields default without a
            // specifications-table attempt. Deliberately not the same defaults
            // as the link-miss branch.
            return (
                String::new(),
                NO_INFORMATION.to_string(),
                NO_INFORMATION.to_string(),
            );
        };

        pacer.pause(ms(self.pacing.tab_pause_ms));
        match self.read_specs_rows() {
            Some((age_range, ean_raw)) => (availability, age_range, ean_raw),
            None => {
                report.specs_table_misses += 1;
                (
                    availability,
                    NO_INFORMATION.to_string(),
                    NO_INFORMATION.to_string(),
                )
            }
        }
    }

    /// A variant only counts when the tab click and both row reads succeed;
    /// a partial table is treated as the wrong template.
    fn read_specs_rows(&mut self) -> Option<(String, String)> {
        for tab in locators::detail_tab_variants() {
            if !self.session.click(&tab) {
                continue;
            }
            let Some(age_range) = self.session.read_text(&locators::specs_age_row()) else {
                continue;
            };
            let Some(ean_raw) = self.session.read_text(&locators::specs_ean_row()) else {
                continue;
            };
            return Some((age_range, ean_raw));
        }
        None
    }
}
