// Series ingestion: normalization with built-in fallback data, and CSV loading
pub mod csv_parser;
pub mod normalizer;

pub use normalizer::{fallback_series, normalize};
