pub mod domain;
pub mod ingest;
pub mod ranking;
pub mod service;
pub mod storage;
pub mod time;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub port: u16,
        pub sentry_dsn: Option<String>,
        /// `mock` or `http`.
        pub data_source: String,
        pub data_provider_base_url: Option<String>,
        pub data_provider_api_key: Option<String>,
        pub data_provider_sales_path: Option<String>,
        pub data_provider_timeout_secs: Option<u64>,
        pub data_provider_retries: Option<u32>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                port: DEFAULT_PORT,
                sentry_dsn: None,
                data_source: "mock".to_string(),
                data_provider_base_url: None,
                data_provider_api_key: None,
                data_provider_sales_path: None,
                data_provider_timeout_secs: None,
                data_provider_retries: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(s) => s
                    .parse()
                    .with_context(|| format!("PORT must be a port number (got {s:?})"))?,
                Err(_) => DEFAULT_PORT,
            };

            Ok(Self {
                port,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                data_source: std::env::var("RADAR_DATA_SOURCE")
                    .ok()
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "mock".to_string()),
                data_provider_base_url: std::env::var("DATA_PROVIDER_BASE_URL").ok(),
                data_provider_api_key: std::env::var("DATA_PROVIDER_API_KEY").ok(),
                data_provider_sales_path: std::env::var("DATA_PROVIDER_SALES_PATH").ok(),
                data_provider_timeout_secs: std::env::var("DATA_PROVIDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok()),
                data_provider_retries: std::env::var("DATA_PROVIDER_RETRIES")
                    .ok()
                    .and_then(|s| s.parse().ok()),
            })
        }

        pub fn require_data_provider_base_url(&self) -> anyhow::Result<&str> {
            self.data_provider_base_url
                .as_deref()
                .context("DATA_PROVIDER_BASE_URL is required")
        }
    }

}
