// Candlestick chart layout engine
//
// Turns an OHLCV series and a viewport into pixel-space candle shapes and
// axis labels. Painting is left to whatever consumes the geometry.

pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod scale;

pub use config::ChartSettings;
pub use error::{ChartError, Result};
pub use geometry::{layout, CandleGeometry, GeometryEngine, PriceMapper, ViewportDimensions};
pub use interaction::InteractionAdapter;
pub use layout::{AxisLabels, ChartLayout, LayoutController, LayoutState};
pub use scale::{compute_scale, PriceScale, ScaleCalculator};
pub use shared::{CandlestickPoint, Series};
