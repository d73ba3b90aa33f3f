pub mod date_range;
pub mod query_params;
