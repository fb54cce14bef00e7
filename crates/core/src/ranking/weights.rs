//! Fixed constants of the rising-model score.
//!
//! score = MOM_ABS_WEIGHT * z(momAbs)
//!       + MOM_PCT_WEIGHT * z(min(momPct, MOM_PCT_CLIP))
//!       + RANK_CHANGE_WEIGHT * z(rankChange)

pub const MOM_ABS_WEIGHT: f64 = 0.55;
pub const MOM_PCT_WEIGHT: f64 = 0.35;
pub const RANK_CHANGE_WEIGHT: f64 = 0.10;

/// `momPct` reported for a model that sold nothing in the baseline month.
/// Must stay equal to `MOM_PCT_CLIP`.
pub const NEW_ENTRY_MOM_PCT: f64 = 5.0;

/// Upper bound applied to `momPct` before it enters the score.
pub const MOM_PCT_CLIP: f64 = 5.0;
