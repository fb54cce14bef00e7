use crate::domain::radar::{Nation, SalesRecord};
use crate::time::month::Month;
use serde::{Deserialize, Serialize};

/// One month of per-model sales for one market, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: Month,
    pub nation: Nation,
    pub records: Vec<SalesRecord>,
}
