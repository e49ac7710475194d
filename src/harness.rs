use crate::browser::Locator;
use crate::config::{
    ExportConfig, LimitsConfig, MarketplaceConfig, RetailerConfig, RunConfig,
};
use crate::locators;
use crate::pacing::{NoopPacer, PacingPolicy};
use crate::pipeline::run_with_sessions;
use crate::scripted::{ClickEffect, PageFixture, ScriptedSession};
use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use walkdir::WalkDir;

pub const LISTING_URL: &str = "https://retailer.test/lego?limit=all";
pub const MARKET_URL: &str = "https://market.test/";

const CITY_DETAIL: &str = "https://retailer.test/lego/city";
const CASTLE_DETAIL: &str = "https://retailer.test/lego/castle";
const RESULTS_TEMPLATE: &str = "https://market.test/s?k={query}";

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub out_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct HarnessReport {
    pub products_listed: usize,
    pub identifier_fallbacks: usize,
    pub searches: usize,
    pub search_misses: usize,
    pub joined_rows: usize,
    pub csv_files: usize,
}

/// Runs the full pipeline against built-in scripted fixtures with no pacing:
/// a smoke check of every stage without touching a browser or the network.
pub fn run_harness(options: &HarnessOptions) -> Result<HarnessReport> {
    if options.out_dir.exists() {
        std::fs::remove_dir_all(&options.out_dir)?;
    }

    let config = fixture_config();
    let mut pacer = NoopPacer;
    let outcome = run_with_sessions(
        &config,
        retailer_fixture(),
        marketplace_fixture(),
        &mut pacer,
        &options.out_dir,
        false,
        None,
        Local::now().date_naive(),
    )?;

    let mut csv_files = 0usize;
    for entry in WalkDir::new(&options.out_dir) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("csv")
        {
            csv_files += 1;
        }
    }

    Ok(HarnessReport {
        products_listed: outcome.report.products_listed,
        identifier_fallbacks: outcome.report.identifier_fallbacks,
        searches: outcome.report.searches,
        search_misses: outcome.report.search_misses,
        joined_rows: outcome.report.joined_rows,
        csv_files,
    })
}

pub fn fixture_config() -> RunConfig {
    RunConfig {
        retailer: RetailerConfig {
            listing_url: LISTING_URL.to_string(),
        },
        marketplace: MarketplaceConfig {
            base_url: MARKET_URL.to_string(),
        },
        export: ExportConfig::default(),
        pacing: PacingPolicy::default(),
        limits: LimitsConfig::default(),
    }
}

/// Two products: one with a straightforward detail page, one whose
/// specifications tab sits at the second template position.
pub fn retailer_fixture() -> ScriptedSession {
    let mut session = ScriptedSession::new();

    let [tab_primary, tab_secondary] = locators::detail_tab_variants();

    session.insert_page(
        LISTING_URL,
        PageFixture::default()
            .with_texts(
                locators::listing_names(),
                &["LEGO City Set", "LEGO Castle Set"],
            )
            .with_texts(
                locators::listing_prices(),
                &["19,99 €", "39,99 € 49,99 €"],
            )
            .with_attribute(
                Locator::link_text("LEGO City Set"),
                "href",
                CITY_DETAIL,
            )
            .with_click(
                Locator::link_text("LEGO City Set"),
                ClickEffect::Navigate(CITY_DETAIL.to_string()),
            )
            .with_attribute(
                Locator::link_text("LEGO Castle Set"),
                "href",
                CASTLE_DETAIL,
            )
            .with_click(
                Locator::link_text("LEGO Castle Set"),
                ClickEffect::Navigate(CASTLE_DETAIL.to_string()),
            ),
    );

    session.insert_page(
        CITY_DETAIL,
        PageFixture::default()
            .with_text(locators::detail_extra_info(), "Auf Lager")
            .with_click(tab_primary.clone(), ClickEffect::Stay)
            .with_text(locators::specs_age_row(), "Empfohlenes Alter 6-12")
            .with_text(locators::specs_ean_row(), "EAN 5702016668247"),
    );

    session.insert_page(
        CASTLE_DETAIL,
        PageFixture::default()
            .with_text(locators::detail_extra_info(), "Lieferzeit 2-3 Tage")
            .with_click(tab_secondary, ClickEffect::Stay)
            .with_text(locators::specs_age_row(), "Empfohlenes Alter 9-14")
            .with_text(locators::specs_ean_row(), "EAN 5702015591234"),
    );

    session
}

/// Search results for both fixture EANs. The search box only exists on the
/// base page, so the second search exercises the stale-control recovery. The
/// castle result only matches a lower-priority title variant and carries no
/// price, exercising the fallback chain and the price sentinel.
pub fn marketplace_fixture() -> ScriptedSession {
    let mut session = ScriptedSession::new();

    session.insert_page(
        MARKET_URL,
        PageFixture::default()
            .with_click(locators::search_box(), ClickEffect::Stay)
            .with_typeable(locators::search_box())
            .with_click(
                locators::search_button(),
                ClickEffect::NavigateToTyped(RESULTS_TEMPLATE.to_string()),
            ),
    );

    let title = locators::marketplace_title();
    let price = locators::marketplace_price();
    let strike = locators::marketplace_strike_price();

    session.insert_page(
        "https://market.test/s?k=5702016668247",
        PageFixture::default()
            .with_click(locators::sort_menu_option(), ClickEffect::Stay)
            .with_click(locators::sort_confirm(), ClickEffect::Stay)
            .with_text(title.candidates[0].clone(), "LEGO City Polizeistation")
            .with_text(price.candidates[0].clone(), "17,49 €")
            .with_text(strike.candidates[0].clone(), "24,99 €"),
    );

    session.insert_page(
        "https://market.test/s?k=5702015591234",
        PageFixture::default()
            .with_click(locators::sort_menu_option(), ClickEffect::Stay)
            .with_click(locators::sort_confirm(), ClickEffect::Stay)
            .with_text(title.candidates[2].clone(), "LEGO Burg der Ritter"),
    );

    session
}
