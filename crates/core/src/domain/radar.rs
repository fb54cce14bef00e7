use crate::time::month::Month;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nation {
    Domestic,
    Export,
}

impl Nation {
    pub const ALL: [Nation; 2] = [Nation::Domestic, Nation::Export];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nation::Domestic => "domestic",
            Nation::Export => "export",
        }
    }
}

impl fmt::Display for Nation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic" => Ok(Nation::Domestic),
            "export" => Ok(Nation::Export),
            other => anyhow::bail!("nation must be domestic or export (got {other:?})"),
        }
    }
}

/// Identifies a model within one month's data set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey {
    pub brand: String,
    pub model_name: String,
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.brand, self.model_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub brand: String,
    pub model_name: String,
    pub sales: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
}

impl SalesRecord {
    pub fn new(brand: impl Into<String>, model_name: impl Into<String>, sales: u64) -> Self {
        Self {
            brand: brand.into(),
            model_name: model_name.into(),
            sales,
            original_url: None,
        }
    }

    pub fn key(&self) -> ModelKey {
        ModelKey {
            brand: self.brand.clone(),
            model_name: self.model_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedModel {
    pub rank: u32,
    /// `None` when the model is absent from the baseline month.
    pub prev_rank: Option<u32>,
    pub model_name: String,
    pub brand: String,
    pub sales: u64,
    pub prev_sales: u64,
    pub mom_abs: i64,
    pub mom_pct: f64,
    pub rank_change: i64,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
}

impl RankedModel {
    pub fn is_new_entry(&self) -> bool {
        self.prev_sales == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarData {
    pub month: Month,
    pub nation: Nation,
    pub models: Vec<RankedModel>,
    pub fetched_at: DateTime<Utc>,
}

pub const DEFAULT_MIN_SALES: u64 = 300;

/// Dashboard pre-filters applied before selecting rising models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarFilters {
    #[serde(default = "default_min_sales")]
    pub min_sales: u64,
    #[serde(default)]
    pub exclude_new_entries: bool,
}

fn default_min_sales() -> u64 {
    DEFAULT_MIN_SALES
}

impl Default for RadarFilters {
    fn default() -> Self {
        Self {
            min_sales: DEFAULT_MIN_SALES,
            exclude_new_entries: false,
        }
    }
}
