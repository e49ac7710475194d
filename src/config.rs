use crate::pacing::PacingPolicy;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub retailer: RetailerConfig,
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub pacing: PacingPolicy,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetailerConfig {
    /// The category listing in "show all" mode; no pagination handling exists.
    pub listing_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_retailer_base")]
    pub retailer_base: String,
    #[serde(default = "default_marketplace_base")]
    pub marketplace_base: String,
    #[serde(default = "default_joined_base")]
    pub joined_base: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            retailer_base: default_retailer_base(),
            marketplace_base: default_marketplace_base(),
            joined_base: default_joined_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LimitsConfig {
    /// Caps the detail-page pass; handy for partial runs against live sites.
    #[serde(default)]
    pub max_products: Option<usize>,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.retailer.listing_url).with_context(|| {
            format!("invalid retailer.listing_url {}", self.retailer.listing_url)
        })?;
        Url::parse(&self.marketplace.base_url)
            .with_context(|| format!("invalid marketplace.base_url {}", self.marketplace.base_url))?;

        for (key, base) in [
            ("export.retailer_base", &self.export.retailer_base),
            ("export.marketplace_base", &self.export.marketplace_base),
            ("export.joined_base", &self.export.joined_base),
        ] {
            if base.trim().is_empty() {
                bail!("{key} must not be empty");
            }
            if base.contains(['/', '\\']) {
                bail!("{key} must not contain path separators");
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<RunConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: RunConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse toml in {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

fn default_retailer_base() -> String {
    "toys-for-fun".to_string()
}

fn default_marketplace_base() -> String {
    "amazon".to_string()
}

fn default_joined_base() -> String {
    "joined".to_string()
}
