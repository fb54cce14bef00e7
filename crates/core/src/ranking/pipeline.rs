use crate::domain::radar::{ModelKey, RankedModel, SalesRecord};
use crate::ranking::weights::{
    MOM_ABS_WEIGHT, MOM_PCT_CLIP, MOM_PCT_WEIGHT, NEW_ENTRY_MOM_PCT, RANK_CHANGE_WEIGHT,
};
use crate::ranking::zscore::z_scores;
use std::collections::HashMap;

/// Returns record indices ordered by descending sales. Equal sales keep
/// their input order (`sort_by` is stable).
fn sales_order(records: &[SalesRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[b].sales.cmp(&records[a].sales));
    order
}

/// 1-based sales rank of every record, indexed like `records`.
pub fn assign_ranks(records: &[SalesRecord]) -> Vec<u32> {
    let mut ranks = vec![0u32; records.len()];
    for (pos, idx) in sales_order(records).into_iter().enumerate() {
        ranks[idx] = pos as u32 + 1;
    }
    ranks
}

/// Month-over-month percent change as a fraction. A model with no baseline
/// sales reports `NEW_ENTRY_MOM_PCT` if it sold anything this month.
pub fn mom_pct(sales: u64, prev_sales: u64) -> f64 {
    if prev_sales > 0 {
        (sales as f64 - prev_sales as f64) / prev_sales as f64
    } else if sales > 0 {
        NEW_ENTRY_MOM_PCT
    } else {
        0.0
    }
}

/// Signed sales delta, saturating at the `i64` bounds.
fn mom_abs(sales: u64, prev_sales: u64) -> i64 {
    let delta = i128::from(sales) - i128::from(prev_sales);
    i64::try_from(delta).unwrap_or(if delta > 0 { i64::MAX } else { i64::MIN })
}

/// Ranks `current` against `baseline` and scores the rising models.
///
/// The output holds every current-month model, ordered by rank. Baseline
/// models that disappeared this month are not reported.
pub fn rank_models(current: &[SalesRecord], baseline: &[SalesRecord]) -> Vec<RankedModel> {
    let prev_ranks = assign_ranks(baseline);
    let prev: HashMap<ModelKey, (u64, u32)> = baseline
        .iter()
        .zip(prev_ranks)
        .map(|(r, rank)| (r.key(), (r.sales, rank)))
        .collect();

    let mut models: Vec<RankedModel> = sales_order(current)
        .into_iter()
        .enumerate()
        .map(|(pos, idx)| {
            let r = &current[idx];
            let rank = pos as u32 + 1;
            let (prev_sales, prev_rank) = match prev.get(&r.key()) {
                Some(&(sales, prev)) => (sales, Some(prev)),
                None => (0, None),
            };
            let rank_change = prev_rank.map_or(0, |p| i64::from(p) - i64::from(rank));

            RankedModel {
                rank,
                prev_rank,
                model_name: r.model_name.clone(),
                brand: r.brand.clone(),
                sales: r.sales,
                prev_sales,
                mom_abs: mom_abs(r.sales, prev_sales),
                mom_pct: mom_pct(r.sales, prev_sales),
                rank_change,
                score: 0.0,
                original_url: r.original_url.clone(),
            }
        })
        .collect();

    apply_scores(&mut models);
    models
}

/// Scores candidates (`mom_abs > 0`) in place; everyone else keeps 0.
fn apply_scores(models: &mut [RankedModel]) {
    let candidates: Vec<usize> = models
        .iter()
        .enumerate()
        .filter(|(_, m)| m.mom_abs > 0)
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let z_abs = candidate_z(models, &candidates, |m| m.mom_abs as f64);
    let z_pct = candidate_z(models, &candidates, |m| m.mom_pct.min(MOM_PCT_CLIP));
    let z_rank = candidate_z(models, &candidates, |m| m.rank_change as f64);

    for (j, &i) in candidates.iter().enumerate() {
        models[i].score =
            MOM_ABS_WEIGHT * z_abs[j] + MOM_PCT_WEIGHT * z_pct[j] + RANK_CHANGE_WEIGHT * z_rank[j];
    }
}

fn candidate_z(
    models: &[RankedModel],
    candidates: &[usize],
    signal: impl Fn(&RankedModel) -> f64,
) -> Vec<f64> {
    let values: Vec<f64> = candidates.iter().map(|&i| signal(&models[i])).collect();
    z_scores(&values)
}
