// Resolves pointer events on drawn shapes back to their data points.
// Tooltip display and placement belong to the presentation layer.
use crate::geometry::CandleGeometry;
use crate::layout::LayoutController;
use shared::CandlestickPoint;

/// Point behind the shape at `geometry_index`, if that shape exists.
pub fn data_at(geometry: &[CandleGeometry], geometry_index: usize) -> Option<&CandlestickPoint> {
    geometry.get(geometry_index).map(|g| &g.source_point)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionAdapter {
    hovered: Option<usize>,
}

impl InteractionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_entered<'a>(
        &mut self,
        controller: &'a LayoutController,
        geometry_index: usize,
    ) -> Option<&'a CandlestickPoint> {
        self.hovered = Some(geometry_index);
        data_at(controller.geometry(), geometry_index)
    }

    pub fn pointer_left(&mut self) {
        self.hovered = None;
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered
    }

    /// Looked up against the current layout, so an index left stale by a
    /// smaller relayout resolves to `None`.
    pub fn hovered_point<'a>(&self, controller: &'a LayoutController) -> Option<&'a CandlestickPoint> {
        self.hovered.and_then(|i| data_at(controller.geometry(), i))
    }
}
