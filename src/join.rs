use crate::model::{Identifier, JoinedRecord, MarketplaceRecord, ProductRecord};
use tracing::warn;

/// Zips the three sequences position-wise, truncated to the shortest. Row i
/// of every input must refer to the same logical product; the extractors
/// guarantee that by emitting a placeholder per input instead of omitting
/// failures. A length mismatch therefore signals an upstream cardinality bug
/// and is logged, but the join itself stays silent-truncating.
pub fn join_datasets(
    retailer: &[ProductRecord],
    identifiers: &[Identifier],
    marketplace: &[MarketplaceRecord],
) -> Vec<JoinedRecord> {
    let len = retailer
        .len()
        .min(identifiers.len())
        .min(marketplace.len());

    if retailer.len() != len || identifiers.len() != len || marketplace.len() != len {
        warn!(
            retailer = retailer.len(),
            identifiers = identifiers.len(),
            marketplace = marketplace.len(),
            joined = len,
            "input lengths differ; truncating positionally to the shortest"
        );
    }

    (0..len)
        .map(|i| JoinedRecord {
            identifier: identifiers[i].clone(),
            retailer_price: retailer[i].display_price_text.clone(),
            retailer_title: retailer[i].name.clone(),
            retailer_link: retailer[i].product_link.clone(),
            retailer_availability: retailer[i].availability.clone(),
            retailer_age_range: retailer[i].age_range.clone(),
            marketplace_price: marketplace[i].price.clone(),
            marketplace_strike_price: marketplace[i].strike_price.clone(),
            marketplace_title: marketplace[i].title.clone(),
        })
        .collect()
}
