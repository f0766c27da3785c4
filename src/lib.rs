//! Normalization, filtering and summary statistics for geotagged bear
//! sighting reports published as a shared spreadsheet.

pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod filter;
pub mod labels;
pub mod normalize;
pub mod recent;
pub mod record;
pub mod stats;
pub mod store;
