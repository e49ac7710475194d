use crate::browser::BrowserSession;
use crate::locators::{self, resolve_text};
use crate::model::{Identifier, MarketplaceRecord, PRICE_NOT_AVAILABLE, RunReport};
use crate::pacing::{Pacer, PacingPolicy, ms};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Searches the marketplace once per identifier and reads the top organic
/// result through the layout-variant tables.
pub struct MarketplaceExtractor<S: BrowserSession> {
    session: S,
    base_url: String,
    pacing: PacingPolicy,
}

impl<S: BrowserSession> MarketplaceExtractor<S> {
    pub fn open(mut session: S, base_url: &str, pacing: PacingPolicy) -> Result<Self> {
        session.navigate(base_url)?;
        info!(url = base_url, "marketplace opened");
        Ok(Self {
            session,
            base_url: base_url.to_string(),
            pacing,
        })
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Exactly one record per identifier, in input order. The positional join
    /// downstream depends on that cardinality.
    pub fn search_all(
        &mut self,
        identifiers: &[Identifier],
        pacer: &mut dyn Pacer,
        report: &mut RunReport,
    ) -> Vec<MarketplaceRecord> {
        let mut records = Vec::with_capacity(identifiers.len());
        for (index, identifier) in identifiers.iter().enumerate() {
            pacer.pause(ms(self.pacing.search_pause_ms));
            records.push(self.search_one(identifier, pacer, report));
            report.searches += 1;

            for cooldown in self.pacing.cooldowns_after(index + 1) {
                info!(
                    searched = index + 1,
                    seconds = cooldown.as_secs(),
                    "cooldown pause"
                );
                pacer.pause(cooldown);
            }
        }
        info!(records = records.len(), "marketplace extraction complete");
        records
    }

    fn search_one(
        &mut self,
        identifier: &Identifier,
        pacer: &mut dyn Pacer,
        report: &mut RunReport,
    ) -> MarketplaceRecord {
        if !self.submit_search(identifier, pacer) {
            report.search_misses += 1;
            warn!(identifier = %identifier, "search interaction failed; recording empty result");
            return MarketplaceRecord::empty(identifier.clone());
        }

        if !self.apply_sort(pacer) {
            report.search_misses += 1;
            warn!(identifier = %identifier, "sort interaction failed; recording empty result");
            return MarketplaceRecord::empty(identifier.clone());
        }

        let title = resolve_text(&mut self.session, &locators::marketplace_title())
            .unwrap_or_default();
        let price = resolve_text(&mut self.session, &locators::marketplace_price())
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());
        let strike_price =
            resolve_text(&mut self.session, &locators::marketplace_strike_price())
                .unwrap_or_default();

        if title.is_empty() {
            debug!(identifier = %identifier, "no title variant matched");
        }

        MarketplaceRecord {
            identifier: identifier.clone(),
            title,
            price,
            strike_price,
        }
    }

    fn submit_search(&mut self, identifier: &Identifier, pacer: &mut dyn Pacer) -> bool {
        let search_box = locators::search_box();

        // A stale search box is re-acquired once after returning to the base
        // page; a second miss gives up on this identifier.
        let mut focused = self.session.click(&search_box);
        if !focused {
            debug!(identifier = %identifier, "search box missing; returning to base page");
            if self.session.navigate(&self.base_url).is_err() {
                return false;
            }
            focused = self.session.click(&search_box);
        }
        if !focused {
            return false;
        }
        pacer.pause(ms(self.pacing.focus_pause_ms));

        if !self.session.clear_and_type(&search_box, identifier.as_str()) {
            return false;
        }
        pacer.pause(ms(self.pacing.type_pause_ms));

        if !self.session.click(&locators::search_button()) {
            return false;
        }
        pacer.pause(ms(self.pacing.submit_pause_ms));

        true
    }

    /// Forces a non-relevance sort through two sequential UI interactions.
    /// Sponsored slots stay pinned top under relevance sort; under any other
    /// sort key the true top organic match lands at a stable position.
    fn apply_sort(&mut self, pacer: &mut dyn Pacer) -> bool {
        if !self.session.click(&locators::sort_menu_option()) {
            return false;
        }
        pacer.pause(ms(self.pacing.sort_pause_ms));

        if !self.session.click(&locators::sort_confirm()) {
            return false;
        }
        pacer.pause(ms(self.pacing.sort_pause_ms));

        true
    }
}
