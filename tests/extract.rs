use anyhow::Result;
use brickprice::browser::{BrowserSession, Locator};
use brickprice::join::join_datasets;
use brickprice::locators::{self, FieldLocators, resolve_text};
use brickprice::marketplace::MarketplaceExtractor;
use brickprice::model::{
    IDENTIFIER_FALLBACK, Identifier, MarketplaceRecord, NO_INFORMATION, PRICE_NOT_AVAILABLE,
    ProductRecord, RunReport,
};
use brickprice::normalize::normalize_ean;
use brickprice::pacing::{NoopPacer, PacingPolicy, RecordingPacer};
use brickprice::retailer::RetailerExtractor;
use brickprice::scripted::{ClickEffect, Interaction, PageFixture, ScriptedSession};
use std::time::Duration;

const PAGE: &str = "https://fixture.test/page";

fn product(i: usize) -> ProductRecord {
    ProductRecord {
        name: format!("product-{i}"),
        display_price_text: format!("price-{i}"),
        product_link: format!("link-{i}"),
        availability: format!("availability-{i}"),
        age_range: format!("age-{i}"),
        ean_raw: format!("EAN {i}"),
    }
}

fn offer(i: usize) -> MarketplaceRecord {
    MarketplaceRecord {
        identifier: Identifier(i.to_string()),
        title: format!("offer-{i}"),
        price: format!("offer-price-{i}"),
        strike_price: String::new(),
    }
}

#[test]
fn resolve_returns_first_matching_candidate_and_short_circuits() -> Result<()> {
    let candidates = FieldLocators::new(
        "fixture_field",
        vec![
            Locator::css(".missing-a"),
            Locator::css(".present"),
            Locator::css(".also-present"),
        ],
    );

    let mut session = ScriptedSession::new();
    session.insert_page(
        PAGE,
        PageFixture::default()
            .with_text(Locator::css(".present"), "second candidate")
            .with_text(Locator::css(".also-present"), "third candidate"),
    );
    session.navigate(PAGE)?;

    assert_eq!(
        resolve_text(&mut session, &candidates),
        Some("second candidate".to_string())
    );

    // Two attempts only: the third candidate must never be looked up.
    let reads: Vec<_> = session
        .log
        .iter()
        .filter(|entry| matches!(entry, Interaction::ReadText(_)))
        .collect();
    assert_eq!(reads.len(), 2);
    assert_eq!(
        reads[1],
        &Interaction::ReadText(Locator::css(".present"))
    );

    Ok(())
}

#[test]
fn resolve_exhausted_list_returns_none_after_trying_every_candidate() -> Result<()> {
    let candidates = FieldLocators::new(
        "fixture_field",
        vec![
            Locator::css(".missing-a"),
            Locator::css(".missing-b"),
            Locator::css(".missing-c"),
        ],
    );

    let mut session = ScriptedSession::new();
    session.insert_page(PAGE, PageFixture::default());
    session.navigate(PAGE)?;

    assert_eq!(resolve_text(&mut session, &candidates), None);

    let reads = session
        .log
        .iter()
        .filter(|entry| matches!(entry, Interaction::ReadText(_)))
        .count();
    assert_eq!(reads, 3);

    Ok(())
}

#[test]
fn normalize_splits_label_from_value() {
    assert_eq!(
        normalize_ean("EAN 5702016668247"),
        Identifier("5702016668247".to_string())
    );
}

#[test]
fn normalize_degrades_to_fallback_on_malformed_input() {
    assert_eq!(normalize_ean(""), Identifier::fallback());
    assert_eq!(normalize_ean("malformed-no-separator"), Identifier::fallback());
    // The detail-page sentinel happens to split into exactly the fallback.
    assert_eq!(normalize_ean(NO_INFORMATION), Identifier::fallback());
}

#[test]
fn sentinels_are_pairwise_distinct() {
    assert_ne!(NO_INFORMATION, PRICE_NOT_AVAILABLE);
    assert_ne!(NO_INFORMATION, IDENTIFIER_FALLBACK);
    assert_ne!(PRICE_NOT_AVAILABLE, IDENTIFIER_FALLBACK);
}

#[test]
fn join_truncates_to_shortest_input() {
    let products: Vec<_> = (0..5).map(product).collect();
    let identifiers: Vec<_> = (0..5).map(|i| Identifier(i.to_string())).collect();
    let offers: Vec<_> = (0..4).map(offer).collect();

    let joined = join_datasets(&products, &identifiers, &offers);
    assert_eq!(joined.len(), 4);

    // Accepted behavior: rows that survive truncation stay aligned.
    for (i, row) in joined.iter().enumerate() {
        assert_eq!(row.retailer_title, format!("product-{i}"));
        assert_eq!(row.identifier, Identifier(i.to_string()));
        assert_eq!(row.marketplace_title, format!("offer-{i}"));
    }
}

#[test]
fn join_of_empty_inputs_is_empty() {
    assert!(join_datasets(&[], &[], &[]).is_empty());
    assert!(join_datasets(&[product(0)], &[], &[offer(0)]).is_empty());
}

#[test]
fn join_preserves_positions_for_equal_lengths() {
    let products: Vec<_> = (0..3).map(product).collect();
    let identifiers: Vec<_> = (0..3).map(|i| Identifier(i.to_string())).collect();
    let offers: Vec<_> = (0..3).map(offer).collect();

    let joined = join_datasets(&products, &identifiers, &offers);
    assert_eq!(joined.len(), 3);
    for (i, row) in joined.iter().enumerate() {
        assert_eq!(row.identifier, Identifier(i.to_string()));
        assert_eq!(row.retailer_price, format!("price-{i}"));
        assert_eq!(row.retailer_link, format!("link-{i}"));
        assert_eq!(row.retailer_availability, format!("availability-{i}"));
        assert_eq!(row.retailer_age_range, format!("age-{i}"));
        assert_eq!(row.marketplace_price, format!("offer-price-{i}"));
    }
}

#[test]
fn cooldown_schedule_fires_on_tenth_and_fiftieth_search() {
    let policy = PacingPolicy::default();

    assert!(policy.cooldowns_after(1).is_empty());
    assert!(policy.cooldowns_after(9).is_empty());
    assert!(policy.cooldowns_after(49).is_empty());
    assert_eq!(
        policy.cooldowns_after(10),
        vec![Duration::from_millis(policy.cooldown_every_10_ms)]
    );
    assert_eq!(
        policy.cooldowns_after(20),
        vec![Duration::from_millis(policy.cooldown_every_10_ms)]
    );
    assert_eq!(
        policy.cooldowns_after(50),
        vec![
            Duration::from_millis(policy.cooldown_every_10_ms),
            Duration::from_millis(policy.cooldown_every_50_ms),
        ]
    );
}

// --- Retailer extractor ---

const LISTING: &str = "https://retailer.test/lego?limit=all";
const DETAIL_A: &str = "https://retailer.test/lego/a";
const DETAIL_C: &str = "https://retailer.test/lego/c";

/// Three products: A succeeds fully, B has no link on the listing, C reaches
/// its detail page but the extra-info block is missing.
fn retailer_session() -> ScriptedSession {
    let mut session = ScriptedSession::new();
    let [tab_primary, _] = locators::detail_tab_variants();

    session.insert_page(
        LISTING,
        PageFixture::default()
            .with_texts(
                locators::listing_names(),
                &["LEGO Set A", "LEGO Set B", "LEGO Set C"],
            )
            .with_texts(locators::listing_prices(), &["10,00 €", "20,00 €", "30,00 €"])
            .with_attribute(Locator::link_text("LEGO Set A"), "href", DETAIL_A)
            .with_click(
                Locator::link_text("LEGO Set A"),
                ClickEffect::Navigate(DETAIL_A.to_string()),
            )
            .with_attribute(Locator::link_text("LEGO Set C"), "href", DETAIL_C)
            .with_click(
                Locator::link_text("LEGO Set C"),
                ClickEffect::Navigate(DETAIL_C.to_string()),
            ),
    );

    session.insert_page(
        DETAIL_A,
        PageFixture::default()
            .with_text(locators::detail_extra_info(), "Auf Lager")
            .with_click(tab_primary, ClickEffect::Stay)
            .with_text(locators::specs_age_row(), "Alter 6-12")
            .with_text(locators::specs_ean_row(), "EAN 5702016668247"),
    );

    // Detail C has neither the extra-info block nor a specifications tab.
    session.insert_page(DETAIL_C, PageFixture::default());

    session
}

#[test]
fn retailer_emits_one_record_per_listed_product_with_branch_defaults() -> Result<()> {
    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor =
        RetailerExtractor::open(retailer_session(), LISTING, PacingPolicy::default())?;

    let records = extractor.extract(&mut pacer, None, &mut report);
    assert_eq!(records.len(), 3);

    // A: full success.
    assert_eq!(records[0].product_link, DETAIL_A);
    assert_eq!(records[0].availability, "Auf Lager");
    assert_eq!(records[0].age_range, "Alter 6-12");
    assert_eq!(records[0].ean_raw, "EAN 5702016668247");

    // B: link miss, all empty-string defaults.
    assert_eq!(records[1].name, "LEGO Set B");
    assert_eq!(records[1].product_link, "");
    assert_eq!(records[1].availability, "");
    assert_eq!(records[1].age_range, "");
    assert_eq!(records[1].ean_raw, "");

    // C: availability miss, sentinel defaults for the table fields.
    assert_eq!(records[2].product_link, DETAIL_C);
    assert_eq!(records[2].availability, "");
    assert_eq!(records[2].age_range, NO_INFORMATION);
    assert_eq!(records[2].ean_raw, NO_INFORMATION);

    assert_eq!(report.products_listed, 3);
    assert_eq!(report.detail_link_misses, 1);

    // Back on the listing after the pass.
    let session = extractor.into_session();
    assert_eq!(session.current_url(), LISTING);

    Ok(())
}

#[test]
fn retailer_availability_miss_skips_the_specs_table_attempt() -> Result<()> {
    let mut session = ScriptedSession::new();
    session.insert_page(
        LISTING,
        PageFixture::default()
            .with_texts(locators::listing_names(), &["LEGO Set C"])
            .with_texts(locators::listing_prices(), &["30,00 €"])
            .with_attribute(Locator::link_text("LEGO Set C"), "href", DETAIL_C)
            .with_click(
                Locator::link_text("LEGO Set C"),
                ClickEffect::Navigate(DETAIL_C.to_string()),
            ),
    );
    session.insert_page(DETAIL_C, PageFixture::default());

    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor = RetailerExtractor::open(session, LISTING, PacingPolicy::default())?;
    extractor.extract(&mut pacer, None, &mut report);

    let session = extractor.into_session();
    let [tab_primary, tab_secondary] = locators::detail_tab_variants();
    let tab_clicks = session
        .log
        .iter()
        .filter(|entry| {
            matches!(entry, Interaction::Click(locator)
                if *locator == tab_primary || *locator == tab_secondary)
        })
        .count();
    assert_eq!(tab_clicks, 0);
    // Not a table miss: the table was never attempted.
    assert_eq!(report.specs_table_misses, 0);

    Ok(())
}

#[test]
fn retailer_specs_table_miss_defaults_both_fields_after_both_variants() -> Result<()> {
    let mut session = ScriptedSession::new();
    session.insert_page(
        LISTING,
        PageFixture::default()
            .with_texts(locators::listing_names(), &["LEGO Set D"])
            .with_texts(locators::listing_prices(), &["40,00 €"])
            .with_attribute(Locator::link_text("LEGO Set D"), "href", DETAIL_A)
            .with_click(
                Locator::link_text("LEGO Set D"),
                ClickEffect::Navigate(DETAIL_A.to_string()),
            ),
    );
    // Availability present, but neither tab variant exists.
    session.insert_page(
        DETAIL_A,
        PageFixture::default().with_text(locators::detail_extra_info(), "Auf Lager"),
    );

    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor = RetailerExtractor::open(session, LISTING, PacingPolicy::default())?;
    let records = extractor.extract(&mut pacer, None, &mut report);

    assert_eq!(records[0].availability, "Auf Lager");
    assert_eq!(records[0].age_range, NO_INFORMATION);
    assert_eq!(records[0].ean_raw, NO_INFORMATION);
    assert_eq!(report.specs_table_misses, 1);

    let session = extractor.into_session();
    let [tab_primary, tab_secondary] = locators::detail_tab_variants();
    let attempted: Vec<_> = session
        .log
        .iter()
        .filter(|entry| {
            matches!(entry, Interaction::Click(locator)
                if *locator == tab_primary || *locator == tab_secondary)
        })
        .collect();
    assert_eq!(attempted.len(), 2);

    Ok(())
}

#[test]
fn retailer_limit_caps_the_detail_pass() -> Result<()> {
    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor =
        RetailerExtractor::open(retailer_session(), LISTING, PacingPolicy::default())?;

    let records = extractor.extract(&mut pacer, Some(1), &mut report);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "LEGO Set A");
    // The listing counts still reflect the full page.
    assert_eq!(report.products_listed, 3);

    Ok(())
}

// --- Marketplace extractor ---

const MARKET: &str = "https://market.test/";
const RESULTS_TEMPLATE: &str = "https://market.test/s?k={query}";

fn market_base_page() -> PageFixture {
    PageFixture::default()
        .with_click(locators::search_box(), ClickEffect::Stay)
        .with_typeable(locators::search_box())
        .with_click(
            locators::search_button(),
            ClickEffect::NavigateToTyped(RESULTS_TEMPLATE.to_string()),
        )
}

fn sortable(page: PageFixture) -> PageFixture {
    page.with_click(locators::sort_menu_option(), ClickEffect::Stay)
        .with_click(locators::sort_confirm(), ClickEffect::Stay)
}

#[test]
fn marketplace_takes_lower_priority_title_variant_when_earlier_ones_miss() -> Result<()> {
    let title = locators::marketplace_title();

    let mut session = ScriptedSession::new();
    session.insert_page(MARKET, market_base_page());
    // Only the third-priority title candidate exists; the first two must be
    // confirmed absent by the fixture for the test to mean anything.
    session.insert_page(
        "https://market.test/s?k=5702016668247",
        sortable(
            PageFixture::default().with_text(title.candidates[2].clone(), "LEGO City Set"),
        ),
    );

    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor = MarketplaceExtractor::open(session, MARKET, PacingPolicy::default())?;
    let records = extractor.search_all(
        &[Identifier("5702016668247".to_string())],
        &mut pacer,
        &mut report,
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "LEGO City Set");
    assert_eq!(records[0].price, PRICE_NOT_AVAILABLE);
    assert_eq!(records[0].strike_price, "");

    let session = extractor.into_session();
    let attempted_titles: Vec<_> = session
        .log
        .iter()
        .filter_map(|entry| match entry {
            Interaction::ReadText(locator) if title.candidates.contains(locator) => Some(locator),
            _ => None,
        })
        .collect();
    assert_eq!(attempted_titles.len(), 3);
    assert_eq!(attempted_titles[2], &title.candidates[2]);

    Ok(())
}

#[test]
fn marketplace_sort_miss_yields_empty_record_but_keeps_cardinality() -> Result<()> {
    let mut session = ScriptedSession::new();
    session.insert_page(MARKET, market_base_page());
    // Results page with the sort menu but no confirm control.
    session.insert_page(
        "https://market.test/s?k=111",
        PageFixture::default().with_click(locators::sort_menu_option(), ClickEffect::Stay),
    );
    let title = locators::marketplace_title();
    session.insert_page(
        "https://market.test/s?k=222",
        sortable(PageFixture::default().with_text(title.candidates[0].clone(), "LEGO Okay")),
    );

    let identifiers = vec![
        Identifier("111".to_string()),
        Identifier("222".to_string()),
    ];
    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor = MarketplaceExtractor::open(session, MARKET, PacingPolicy::default())?;
    let records = extractor.search_all(&identifiers, &mut pacer, &mut report);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], MarketplaceRecord::empty(Identifier("111".to_string())));
    assert_eq!(records[1].title, "LEGO Okay");
    assert_eq!(report.searches, 2);
    assert_eq!(report.search_misses, 1);

    Ok(())
}

#[test]
fn marketplace_reacquires_search_box_after_leaving_base_page() -> Result<()> {
    let title = locators::marketplace_title();

    let mut session = ScriptedSession::new();
    session.insert_page(MARKET, market_base_page());
    // Results pages carry no search box, so the second search has to go back
    // to the base page first.
    session.insert_page(
        "https://market.test/s?k=111",
        sortable(PageFixture::default().with_text(title.candidates[0].clone(), "LEGO One")),
    );
    session.insert_page(
        "https://market.test/s?k=222",
        sortable(PageFixture::default().with_text(title.candidates[0].clone(), "LEGO Two")),
    );

    let identifiers = vec![
        Identifier("111".to_string()),
        Identifier("222".to_string()),
    ];
    let mut report = RunReport::default();
    let mut pacer = NoopPacer;
    let mut extractor = MarketplaceExtractor::open(session, MARKET, PacingPolicy::default())?;
    let records = extractor.search_all(&identifiers, &mut pacer, &mut report);

    assert_eq!(records[0].title, "LEGO One");
    assert_eq!(records[1].title, "LEGO Two");
    assert_eq!(report.search_misses, 0);

    let session = extractor.into_session();
    let renavigations = session
        .log
        .iter()
        .filter(|entry| matches!(entry, Interaction::Navigate(url) if url == MARKET))
        .count();
    // Initial open plus one recovery before the second search.
    assert_eq!(renavigations, 2);

    Ok(())
}

#[test]
fn marketplace_cooldown_fires_after_tenth_search() -> Result<()> {
    let mut session = ScriptedSession::new();
    session.insert_page(MARKET, market_base_page());

    let identifiers: Vec<_> = (0..10).map(|i| Identifier(format!("id-{i}"))).collect();
    let policy = PacingPolicy::default();
    let cooldown = Duration::from_millis(policy.cooldown_every_10_ms);

    let mut report = RunReport::default();
    let mut pacer = RecordingPacer::default();
    let mut extractor = MarketplaceExtractor::open(session, MARKET, policy)?;
    let records = extractor.search_all(&identifiers, &mut pacer, &mut report);

    assert_eq!(records.len(), 10);
    let cooldowns = pacer.pauses.iter().filter(|d| **d == cooldown).count();
    assert_eq!(cooldowns, 1);
    assert_eq!(pacer.pauses.last(), Some(&cooldown));

    Ok(())
}
