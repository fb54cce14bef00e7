use crate::domain::radar::{RadarFilters, RankedModel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Size of the dashboard's "rising models" list.
pub const RISING_TOP_N: usize = 20;

/// Models the dashboard lists as rising: pre-filtered by `filters`, then
/// restricted to `mom_abs > 0`, ordered by descending score and cut to
/// `limit`. Equal scores keep pipeline (rank) order.
pub fn rising_models(
    models: &[RankedModel],
    filters: &RadarFilters,
    limit: usize,
) -> Vec<RankedModel> {
    let mut out: Vec<RankedModel> = models
        .iter()
        .filter(|m| m.sales >= filters.min_sales)
        .filter(|m| !(filters.exclude_new_entries && m.is_new_entry()))
        .filter(|m| m.mom_abs > 0)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    out.truncate(limit);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadarStats {
    pub total: usize,
    pub rising: usize,
    pub falling: usize,
}

impl RadarStats {
    pub fn from_models(models: &[RankedModel]) -> Self {
        Self {
            total: models.len(),
            rising: models.iter().filter(|m| m.mom_abs > 0).count(),
            falling: models.iter().filter(|m| m.mom_abs < 0).count(),
        }
    }
}
