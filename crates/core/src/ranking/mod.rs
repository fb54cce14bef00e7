pub mod pipeline;
pub mod view;
pub mod weights;
pub mod zscore;
