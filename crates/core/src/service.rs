use crate::domain::radar::{Nation, RadarData};
use crate::ingest::SalesDataSource;
use crate::ranking::pipeline::rank_models;
use crate::storage::cache::RadarCache;
use crate::time::month::Month;
use anyhow::Context;
use std::sync::Arc;

/// Serves radar payloads: cached when available, otherwise fetched from the
/// sales source for the month and its predecessor and ranked.
#[derive(Clone)]
pub struct RadarService {
    source: Arc<dyn SalesDataSource>,
    cache: RadarCache,
}

impl RadarService {
    pub fn new(source: Arc<dyn SalesDataSource>, cache: RadarCache) -> Self {
        Self { source, cache }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.source_name()
    }

    pub fn cache(&self) -> &RadarCache {
        &self.cache
    }

    pub async fn get_radar_data(
        &self,
        month: Month,
        nation: Nation,
    ) -> anyhow::Result<Arc<RadarData>> {
        if let Some(hit) = self.cache.get(month, nation).await {
            tracing::debug!(%month, %nation, "radar cache hit");
            return Ok(hit);
        }

        let data = self.compute(month, nation).await?;
        tracing::info!(
            %month,
            %nation,
            source = self.source.source_name(),
            models_len = data.models.len(),
            "computed radar data"
        );
        Ok(self.cache.insert(data).await)
    }

    /// Runs the ranking without consulting or filling the cache.
    pub async fn compute(&self, month: Month, nation: Nation) -> anyhow::Result<RadarData> {
        let baseline_month = month.prev();
        let (current, baseline) = tokio::try_join!(
            self.source.fetch_month_sales(month, nation),
            self.source.fetch_month_sales(baseline_month, nation),
        )
        .with_context(|| format!("failed to fetch sales for {month}/{nation}"))?;

        Ok(RadarData {
            month,
            nation,
            models: rank_models(&current.records, &baseline.records),
            fetched_at: chrono::Utc::now(),
        })
    }
}
