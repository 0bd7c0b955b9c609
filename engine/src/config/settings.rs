// Chart settings, loaded from the embedded default.json or a user-supplied file
use crate::data::csv_parser::CsvSeriesLoader;
use crate::error::{check_dimension, ChartError, Result};
use crate::geometry::{GeometryEngine, ViewportDimensions};
use crate::scale::ScaleCalculator;
use serde::{Deserialize, Serialize};
use shared::NumberFormat;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ChartSettings {
    pub viewport: ViewportSettings,
    pub margins: MarginSettings,
    pub scale: ScaleSettings,
    pub candle: CandleSettings,
    pub volume: VolumeSettings,
    pub labels: NumberFormat,
    pub data: DataSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
    pub candle_width: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            candle_width: 12.0,
        }
    }
}

// Fixed insets reserved for the axis gutters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginSettings {
    pub left: f64,
    pub top: f64,
}

impl Default for MarginSettings {
    fn default() -> Self {
        Self { left: 20.0, top: 20.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub padding_ratio: f64,
    pub snap_step: f64,
    pub label_count: usize,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            padding_ratio: 0.10,
            snap_step: 100.0,
            label_count: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandleSettings {
    pub min_body_height: f64,
}

impl Default for CandleSettings {
    fn default() -> Self {
        Self { min_body_height: 2.0 }
    }
}

// `reference_volume` units are drawn `reference_height` pixels tall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    pub reference_volume: f64,
    pub reference_height: f64,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            reference_volume: 250.0,
            reference_height: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub csv_delimiter: char,
    // Number separators of the input files, independent of the axis label format
    pub thousand_separator: char,
    pub decimal_separator: char,
    pub date_format: String,
    pub time_format: String,
    pub label_format: String, // used when a date column is present
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_delimiter: ';',
            thousand_separator: '.',
            decimal_separator: ',',
            date_format: "%d/%m/%Y".to_string(),
            time_format: "%H:%M:%S".to_string(),
            label_format: "%d/%m/%Y %H:%M:%S".to_string(),
        }
    }
}

// Beyond this the f64 labels only show rounding noise
const MAX_FRACTION_DIGITS: usize = 10;

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::ConfigError(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )))
    }
}

impl ChartSettings {
    pub fn load_default() -> Result<Self> {
        Self::from_json_str(include_str!("../../config/default.json"))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: ChartSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading chart settings");
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension("viewport.width", self.viewport.width)?;
        check_dimension("viewport.height", self.viewport.height)?;
        check_dimension("viewport.candle_width", self.viewport.candle_width)?;

        check_non_negative("scale.padding_ratio", self.scale.padding_ratio)?;
        check_non_negative("candle.min_body_height", self.candle.min_body_height)?;
        check_non_negative("volume.reference_height", self.volume.reference_height)?;
        check_non_negative("margins.left", self.margins.left)?;
        check_non_negative("margins.top", self.margins.top)?;
        if !(self.scale.snap_step.is_finite() && self.scale.snap_step > 0.0) {
            return Err(ChartError::ConfigError(format!(
                "scale.snap_step must be positive, got {}",
                self.scale.snap_step
            )));
        }
        if self.scale.label_count < 2 {
            return Err(ChartError::ConfigError(format!(
                "scale.label_count must be at least 2, got {}",
                self.scale.label_count
            )));
        }
        if !(self.volume.reference_volume.is_finite() && self.volume.reference_volume > 0.0) {
            return Err(ChartError::ConfigError(format!(
                "volume.reference_volume must be positive, got {}",
                self.volume.reference_volume
            )));
        }
        if self.labels.max_fraction_digits > MAX_FRACTION_DIGITS {
            return Err(ChartError::ConfigError(format!(
                "labels.max_fraction_digits must be at most {}, got {}",
                MAX_FRACTION_DIGITS, self.labels.max_fraction_digits
            )));
        }
        if self.labels.thousand_separator == self.labels.decimal_separator {
            return Err(ChartError::ConfigError(format!(
                "labels: thousand and decimal separators are both '{}'",
                self.labels.decimal_separator
            )));
        }
        if self.data.thousand_separator == self.data.decimal_separator {
            return Err(ChartError::ConfigError(format!(
                "data: thousand and decimal separators are both '{}'",
                self.data.decimal_separator
            )));
        }
        if !self.data.csv_delimiter.is_ascii() {
            return Err(ChartError::ConfigError(format!(
                "data.csv_delimiter must be a single ASCII character, got '{}'",
                self.data.csv_delimiter
            )));
        }
        Ok(())
    }

    pub fn viewport(&self) -> ViewportDimensions {
        ViewportDimensions {
            width: self.viewport.width,
            height: self.viewport.height,
            candle_width: self.viewport.candle_width,
        }
    }

    pub fn scale_calculator(&self) -> ScaleCalculator {
        ScaleCalculator {
            padding_ratio: self.scale.padding_ratio,
            snap_step: self.scale.snap_step,
            label_count: self.scale.label_count,
            format: self.labels,
        }
    }

    pub fn geometry_engine(&self) -> GeometryEngine {
        GeometryEngine {
            left_margin: self.margins.left,
            top_inset: self.margins.top,
            min_body_height: self.candle.min_body_height,
            reference_volume: self.volume.reference_volume,
            reference_height: self.volume.reference_height,
        }
    }

    pub fn csv_loader(&self) -> CsvSeriesLoader {
        CsvSeriesLoader {
            delimiter: self.data.csv_delimiter as u8,
            thousand_separator: self.data.thousand_separator,
            decimal_separator: self.data.decimal_separator,
            date_format: self.data.date_format.clone(),
            time_format: self.data.time_format.clone(),
            label_format: self.data.label_format.clone(),
        }
    }
}
