pub mod query;
pub mod radar;
