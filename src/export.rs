use crate::config::ExportConfig;
use crate::model::{Identifier, JoinedRecord, MarketplaceRecord, ProductRecord};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct RetailerRow<'a> {
    identifier: &'a str,
    price: &'a str,
    title: &'a str,
    link: &'a str,
    availability: &'a str,
    age_range: &'a str,
}

/// Writes the three run tables, each twice: a stable snapshot (`{base}.csv`)
/// and a date-stamped archive copy (`{base}-YYYY-MM-DD.csv`). Returns every
/// path written.
pub fn export_run(
    out_dir: &Path,
    export: &ExportConfig,
    retailer: &[ProductRecord],
    identifiers: &[Identifier],
    marketplace: &[MarketplaceRecord],
    joined: &[JoinedRecord],
    today: NaiveDate,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir {}", out_dir.display()))?;

    let retailer_rows: Vec<RetailerRow<'_>> = identifiers
        .iter()
        .zip(retailer)
        .map(|(identifier, record)| RetailerRow {
            identifier: identifier.as_str(),
            price: &record.display_price_text,
            title: &record.name,
            link: &record.product_link,
            availability: &record.availability,
            age_range: &record.age_range,
        })
        .collect();

    let mut written = Vec::new();
    written.extend(write_snapshot_and_dated(
        out_dir,
        &export.retailer_base,
        &retailer_rows,
        today,
    )?);
    written.extend(write_snapshot_and_dated(
        out_dir,
        &export.marketplace_base,
        marketplace,
        today,
    )?);
    written.extend(write_snapshot_and_dated(
        out_dir,
        &export.joined_base,
        joined,
        today,
    )?);

    Ok(written)
}

fn write_snapshot_and_dated<T: Serialize>(
    out_dir: &Path,
    base: &str,
    rows: &[T],
    today: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let snapshot = out_dir.join(format!("{base}.csv"));
    let dated = out_dir.join(format!("{base}-{}.csv", today.format("%Y-%m-%d")));

    write_csv(&snapshot, rows)?;
    write_csv(&dated, rows)?;

    info!(
        base,
        rows = rows.len(),
        snapshot = %snapshot.display(),
        dated = %dated.display(),
        "table exported"
    );

    Ok(vec![snapshot, dated])
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create csv {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush csv {}", path.display()))?;
    Ok(())
}
