pub mod browser;
pub mod chrome;
pub mod config;
pub mod export;
pub mod harness;
pub mod join;
pub mod locators;
pub mod marketplace;
pub mod model;
pub mod normalize;
pub mod pacing;
pub mod pipeline;
pub mod retailer;
pub mod scripted;
