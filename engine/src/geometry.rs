//! Pixel-space shapes for each candle.
//!
//! Screen convention: origin at the top-left, Y grows downward, so a higher
//! price maps to a smaller Y. The plot area starts at (`left_margin`, `top_inset`).

use crate::error::{check_dimension, Result};
use crate::scale::PriceScale;
use serde::Serialize;
use shared::{CandlestickPoint, Series};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportDimensions {
    /// Content width, gutters excluded by the caller.
    pub width: f64,
    pub height: f64,
    pub candle_width: f64,
}

impl Default for ViewportDimensions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            candle_width: 12.0,
        }
    }
}

impl ViewportDimensions {
    pub fn with_width(self, width: f64) -> Result<Self> {
        Ok(Self {
            width: check_dimension("width", width)?,
            ..self
        })
    }

    pub fn with_height(self, height: f64) -> Result<Self> {
        Ok(Self {
            height: check_dimension("height", height)?,
            ..self
        })
    }
}

/// Derived shapes for one point. Recomputed on every layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleGeometry {
    /// Left edge of the body.
    pub x: f64,
    pub wick_top: f64,
    pub wick_height: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub is_bullish: bool,
    pub volume_bar_height: f64,
    pub source_point: CandlestickPoint,
}

/// Price to Y conversion for one scale and viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMapper {
    min_price: f64,
    range: f64,
    height: f64,
    top_inset: f64,
}

impl PriceMapper {
    pub fn new(scale: &PriceScale, height: f64, top_inset: f64) -> Self {
        Self {
            min_price: scale.min_price,
            range: scale.range(),
            height,
            top_inset,
        }
    }

    pub fn to_y(&self, price: f64) -> f64 {
        if self.range == 0.0 {
            // Zero-range scale: everything sits on the vertical midpoint
            return self.height / 2.0 + self.top_inset;
        }
        self.height - ((price - self.min_price) / self.range * self.height) + self.top_inset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryEngine {
    pub left_margin: f64,
    pub top_inset: f64,
    pub min_body_height: f64,
    pub reference_volume: f64,
    pub reference_height: f64,
}

impl Default for GeometryEngine {
    fn default() -> Self {
        Self {
            left_margin: 20.0,
            top_inset: 20.0,
            min_body_height: 2.0,
            reference_volume: 250.0,
            reference_height: 60.0,
        }
    }
}

impl GeometryEngine {
    /// Horizontal slot width per candle.
    pub fn spacing(&self, viewport: &ViewportDimensions, count: usize) -> f64 {
        if count == 0 {
            return viewport.width;
        }
        viewport.width / count as f64
    }

    pub fn price_mapper(&self, scale: &PriceScale, viewport: &ViewportDimensions) -> PriceMapper {
        PriceMapper::new(scale, viewport.height, self.top_inset)
    }

    // Fixed reference scale, not fitted to the series' own volume range
    pub fn volume_bar_height(&self, volume: f64) -> f64 {
        volume / self.reference_volume * self.reference_height
    }

    /// One shape per point, in series order. Pure: same inputs, same output.
    pub fn layout(&self, series: &Series, scale: &PriceScale, viewport: &ViewportDimensions) -> Vec<CandleGeometry> {
        let spacing = self.spacing(viewport, series.len());
        let mapper = self.price_mapper(scale, viewport);

        series
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let x = self.left_margin + i as f64 * spacing + (spacing - viewport.candle_width) / 2.0;

                let high_y = mapper.to_y(point.high);
                let low_y = mapper.to_y(point.low);
                let open_y = mapper.to_y(point.open);
                let close_y = mapper.to_y(point.close);

                CandleGeometry {
                    x,
                    wick_top: high_y,
                    wick_height: low_y - high_y,
                    body_top: open_y.min(close_y),
                    body_height: (close_y - open_y).abs().max(self.min_body_height),
                    is_bullish: point.is_bullish(),
                    volume_bar_height: self.volume_bar_height(point.volume),
                    source_point: point.clone(),
                }
            })
            .collect()
    }
}

/// [`GeometryEngine::layout`] with the default margins and volume scale.
pub fn layout(series: &Series, scale: &PriceScale, viewport: &ViewportDimensions) -> Vec<CandleGeometry> {
    GeometryEngine::default().layout(series, scale, viewport)
}
