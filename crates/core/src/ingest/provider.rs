use crate::config::Settings;
use crate::domain::radar::{Nation, SalesRecord};
use crate::ingest::types::MonthlySales;
use crate::time::month::Month;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/v1/model_sales_monthly";
const DEFAULT_RETRIES: u32 = 3;
const MAX_RETRIES: u32 = 8;

#[async_trait::async_trait]
pub trait SalesDataSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_month_sales(&self, month: Month, nation: Nation) -> Result<MonthlySales>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonSalesSource {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
    retries: u32,
}

impl HttpJsonSalesSource {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_data_provider_base_url()?.to_string();
        let path = settings
            .data_provider_sales_path
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                settings.data_provider_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
            .build()
            .context("failed to build sales provider http client")?;

        Ok(Self {
            http,
            base_url,
            api_key: settings.data_provider_api_key.clone(),
            path,
            retries: settings
                .data_provider_retries
                .unwrap_or(DEFAULT_RETRIES)
                .clamp(1, MAX_RETRIES),
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once(&self, month: Month, nation: Nation) -> Result<MonthlySales> {
        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .query(&[("month", month.to_string()), ("nation", nation.to_string())])
            .send()
            .await
            .context("sales provider request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read sales provider response")?;
        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("sales provider response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("sales provider HTTP {status}: {raw_json}");
        }

        serde_json::from_value::<MonthlySales>(raw_json)
            .context("failed to parse sales provider response into MonthlySales")
    }
}

#[async_trait::async_trait]
impl SalesDataSource for HttpJsonSalesSource {
    fn source_name(&self) -> &'static str {
        "external_http_json"
    }

    async fn fetch_month_sales(&self, month: Month, nation: Nation) -> Result<MonthlySales> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(month, nation).await {
                Ok(sales) => {
                    validate_monthly_sales(&sales, month, nation)?;
                    return Ok(sales);
                }
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, %month, %nation, error = %err, "sales fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Checks a provider payload before it reaches the ranking pipeline.
pub fn validate_monthly_sales(sales: &MonthlySales, month: Month, nation: Nation) -> Result<()> {
    anyhow::ensure!(
        sales.month == month,
        "provider month mismatch: expected {month}, got {}",
        sales.month
    );
    anyhow::ensure!(
        sales.nation == nation,
        "provider nation mismatch: expected {nation}, got {}",
        sales.nation
    );

    let mut seen = HashSet::with_capacity(sales.records.len());
    for record in &sales.records {
        validate_record(record)?;
        anyhow::ensure!(
            seen.insert(record.key()),
            "duplicate model in provider payload: {}",
            record.key()
        );
    }

    Ok(())
}

fn validate_record(record: &SalesRecord) -> Result<()> {
    anyhow::ensure!(!record.brand.trim().is_empty(), "brand must be non-empty");
    anyhow::ensure!(
        !record.model_name.trim().is_empty(),
        "modelName must be non-empty"
    );
    anyhow::ensure!(
        i64::try_from(record.sales).is_ok(),
        "sales out of range for {}: {}",
        record.key(),
        record.sales
    );
    Ok(())
}
