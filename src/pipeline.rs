use crate::browser::BrowserSession;
use crate::chrome::ChromeSession;
use crate::config::{RunConfig, load_config};
use crate::export::export_run;
use crate::join::join_datasets;
use crate::marketplace::MarketplaceExtractor;
use crate::model::{IDENTIFIER_FALLBACK, Identifier, JoinedRecord, RunReport};
use crate::normalize::normalize_ean;
use crate::pacing::{Pacer, ThreadPacer};
use crate::retailer::RetailerExtractor;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub out_dir: PathBuf,
    pub dry_run: bool,
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub joined: Vec<JoinedRecord>,
}

/// Full production run: two Chrome sessions (one per extractor, sort state
/// and cookies are per session) and real sleeps.
pub fn run_scrape(options: &RunOptions) -> Result<RunReport> {
    let config = load_config(&options.config_path)?;
    let retailer_session = ChromeSession::launch()?;
    let marketplace_session = ChromeSession::launch()?;
    let mut pacer = ThreadPacer;

    let outcome = run_with_sessions(
        &config,
        retailer_session,
        marketplace_session,
        &mut pacer,
        &options.out_dir,
        options.dry_run,
        options.limit,
        Local::now().date_naive(),
    )?;

    Ok(outcome.report)
}

/// The session-generic core. Strictly sequential: the marketplace pass only
/// starts once the retailer pass has produced the identifiers it searches.
#[allow(clippy::too_many_arguments)]
pub fn run_with_sessions<R, M>(
    config: &RunConfig,
    retailer_session: R,
    marketplace_session: M,
    pacer: &mut dyn Pacer,
    out_dir: &Path,
    dry_run: bool,
    limit: Option<usize>,
    today: NaiveDate,
) -> Result<RunOutcome>
where
    R: BrowserSession,
    M: BrowserSession,
{
    let mut report = RunReport::default();
    let limit = limit.or(config.limits.max_products);

    let mut retailer = RetailerExtractor::open(
        retailer_session,
        &config.retailer.listing_url,
        config.pacing.clone(),
    )?;
    let products = retailer.extract(pacer, limit, &mut report);
    retailer.into_session().close()?;

    let identifiers: Vec<Identifier> = products
        .iter()
        .map(|product| normalize_ean(&product.ean_raw))
        .collect();
    report.identifier_fallbacks = identifiers
        .iter()
        .filter(|identifier| identifier.as_str() == IDENTIFIER_FALLBACK)
        .count();
    info!(
        identifiers = identifiers.len(),
        fallbacks = report.identifier_fallbacks,
        "identifiers normalized"
    );

    let mut marketplace = MarketplaceExtractor::open(
        marketplace_session,
        &config.marketplace.base_url,
        config.pacing.clone(),
    )?;
    let offers = marketplace.search_all(&identifiers, pacer, &mut report);
    marketplace.into_session().close()?;

    let joined = join_datasets(&products, &identifiers, &offers);
    report.joined_rows = joined.len();

    if dry_run {
        info!("dry run enabled; skipping export");
    } else {
        let written = export_run(
            out_dir,
            &config.export,
            &products,
            &identifiers,
            &offers,
            &joined,
            today,
        )?;
        report.files_written = written.len();
    }

    info!(
        products = report.products_listed,
        link_misses = report.detail_link_misses,
        searches = report.searches,
        search_misses = report.search_misses,
        joined = report.joined_rows,
        files = report.files_written,
        "run complete"
    );

    Ok(RunOutcome { report, joined })
}
