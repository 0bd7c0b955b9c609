// Data model and formatting helpers shared by the chart engine and its consumers.
pub mod models;
pub mod utils;

pub use models::{CandlestickPoint, Series};
pub use utils::NumberFormat;
