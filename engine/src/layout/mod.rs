//! Owns the viewport and the published layout.
//!
//! Both triggers, a new series and a new width, run the same pass:
//! normalize, compute the scale, lay out the candles, then swap the whole
//! [`ChartLayout`] in one assignment. Invalid dimensions are ignored and the
//! last valid layout is kept.

pub mod resize;

use crate::config::ChartSettings;
use crate::data::normalize;
use crate::error::ChartError;
use crate::geometry::{CandleGeometry, GeometryEngine, ViewportDimensions};
use crate::scale::{PriceScale, ScaleCalculator};
use resize::{ResizeListener, ResizeSignal, SubscriptionId};
use serde::Serialize;
use shared::{CandlestickPoint, Series};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisLabels {
    pub y_axis: Vec<String>,
    pub x_axis: Vec<String>,
}

/// Everything one layout pass produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub scale: PriceScale,
    pub axis_labels: AxisLabels,
    pub geometry: Vec<CandleGeometry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutState {
    Uninitialized,
    Ready(ChartLayout),
}

pub struct LayoutController {
    series: Option<Series>,
    viewport: ViewportDimensions,
    scale_calculator: ScaleCalculator,
    geometry_engine: GeometryEngine,
    state: LayoutState,
    subscription: Option<SubscriptionId>,
}

impl Default for LayoutController {
    fn default() -> Self {
        Self::new(ViewportDimensions::default())
    }
}

impl LayoutController {
    pub fn new(viewport: ViewportDimensions) -> Self {
        Self::with_components(viewport, ScaleCalculator::default(), GeometryEngine::default())
    }

    pub fn with_components(
        viewport: ViewportDimensions,
        scale_calculator: ScaleCalculator,
        geometry_engine: GeometryEngine,
    ) -> Self {
        Self {
            series: None,
            viewport,
            scale_calculator,
            geometry_engine,
            state: LayoutState::Uninitialized,
            subscription: None,
        }
    }

    pub fn from_settings(settings: &ChartSettings) -> Self {
        Self::with_components(settings.viewport(), settings.scale_calculator(), settings.geometry_engine())
    }

    /// Replaces the data and re-lays out. `None` or an empty series falls back
    /// to the built-in dataset.
    pub fn set_series(&mut self, series: Option<Series>) {
        self.series = Some(normalize(series));
        self.relayout();
    }

    /// `width` is the content width; margins are the caller's concern.
    /// Returns whether the update was applied.
    pub fn set_viewport_width(&mut self, width: f64) -> bool {
        let updated = self.viewport.with_width(width);
        self.apply_viewport(updated)
    }

    pub fn set_viewport_height(&mut self, height: f64) -> bool {
        let updated = self.viewport.with_height(height);
        self.apply_viewport(updated)
    }

    fn apply_viewport(&mut self, updated: Result<ViewportDimensions, ChartError>) -> bool {
        match updated {
            Ok(viewport) => {
                self.viewport = viewport;
                self.relayout();
                true
            }
            Err(e) => {
                warn!(error = %e, "ignoring viewport update, keeping last layout");
                false
            }
        }
    }

    fn relayout(&mut self) {
        // A width change before any data lays out the fallback series.
        let series = self.series.get_or_insert_with(|| normalize(None));

        let scale = self.scale_calculator.compute_scale(series);
        if scale.is_degenerate() {
            debug!(price = scale.min_price, "zero price range, candles pinned to vertical midpoint");
        }
        let geometry = self.geometry_engine.layout(series, &scale, &self.viewport);
        let axis_labels = AxisLabels {
            y_axis: scale.labels.clone(),
            x_axis: series.iter().map(|p| p.time.clone()).collect(),
        };

        debug!(
            points = geometry.len(),
            width = self.viewport.width,
            min_price = scale.min_price,
            max_price = scale.max_price,
            "layout pass complete"
        );

        self.state = LayoutState::Ready(ChartLayout {
            scale,
            axis_labels,
            geometry,
        });
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LayoutState::Ready(_))
    }

    pub fn layout(&self) -> Option<&ChartLayout> {
        match &self.state {
            LayoutState::Ready(layout) => Some(layout),
            LayoutState::Uninitialized => None,
        }
    }

    /// Published shapes in series order; empty before the first layout.
    pub fn geometry(&self) -> &[CandleGeometry] {
        self.layout().map(|l| l.geometry.as_slice()).unwrap_or(&[])
    }

    pub fn axis_labels(&self) -> AxisLabels {
        self.layout().map(|l| l.axis_labels.clone()).unwrap_or_default()
    }

    pub fn scale(&self) -> Option<&PriceScale> {
        self.layout().map(|l| &l.scale)
    }

    pub fn viewport(&self) -> ViewportDimensions {
        self.viewport
    }

    pub fn series(&self) -> Option<&Series> {
        self.series.as_ref()
    }

    pub fn geometry_engine(&self) -> &GeometryEngine {
        &self.geometry_engine
    }

    /// The point a published shape was built from.
    pub fn data_at(&self, geometry_index: usize) -> Option<&CandlestickPoint> {
        self.geometry().get(geometry_index).map(|g| &g.source_point)
    }

    /// Registers `controller` for resize notifications; undone by [`LayoutController::dispose`].
    pub fn attach(controller: &Rc<RefCell<LayoutController>>, signal: &mut ResizeSignal) -> SubscriptionId {
        let id = signal.subscribe(controller);
        let previous = controller.borrow_mut().subscription.replace(id);
        if let Some(previous) = previous {
            signal.unsubscribe(previous);
        }
        id
    }

    /// Detaches from `signal` and releases the series and layout.
    pub fn dispose(&mut self, signal: &mut ResizeSignal) {
        if let Some(id) = self.subscription.take() {
            signal.unsubscribe(id);
        }
        self.series = None;
        self.state = LayoutState::Uninitialized;
        info!("layout controller disposed");
    }
}

impl ResizeListener for LayoutController {
    fn on_resize(&mut self, content_width: f64) {
        self.set_viewport_width(content_width);
    }
}
