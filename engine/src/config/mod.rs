// Chart configuration, loaded from JSON with embedded defaults
pub mod settings;

pub use settings::ChartSettings;
