pub mod mock;
pub mod provider;
pub mod types;

use crate::config::Settings;
use anyhow::Result;
use std::sync::Arc;

pub use provider::SalesDataSource;

/// Builds the sales source selected by `RADAR_DATA_SOURCE`.
pub fn source_from_settings(settings: &Settings) -> Result<Arc<dyn SalesDataSource>> {
    match settings.data_source.as_str() {
        "mock" => Ok(Arc::new(mock::MockSalesSource)),
        "http" => Ok(Arc::new(provider::HttpJsonSalesSource::from_settings(
            settings,
        )?)),
        other => anyhow::bail!("RADAR_DATA_SOURCE must be mock or http (got {other:?})"),
    }
}
