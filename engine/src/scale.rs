// Price range derivation and y-axis label generation
use serde::Serialize;
use shared::{NumberFormat, Series};
use tracing::warn;

/// Visible price range after padding and snapping, with its axis labels.
///
/// Always produced whole by [`ScaleCalculator::compute_scale`]; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceScale {
    pub min_price: f64,
    pub max_price: f64,
    /// Label values, top to bottom (descending).
    pub levels: Vec<f64>,
    /// `levels` formatted for display.
    pub labels: Vec<String>,
}

impl PriceScale {
    pub fn range(&self) -> f64 {
        self.max_price - self.min_price
    }

    // A flat series can snap min and max to the same hundred
    pub fn is_degenerate(&self) -> bool {
        self.range() == 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleCalculator {
    pub padding_ratio: f64,
    pub snap_step: f64,
    pub label_count: usize,
    pub format: NumberFormat,
}

impl Default for ScaleCalculator {
    fn default() -> Self {
        Self {
            padding_ratio: 0.10,
            snap_step: 100.0,
            label_count: 7,
            format: NumberFormat::default(),
        }
    }
}

impl ScaleCalculator {
    pub fn compute_scale(&self, series: &Series) -> PriceScale {
        let (raw_min, raw_max) = series
            .iter()
            .flat_map(|p| p.prices())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), price| (lo.min(price), hi.max(price)));

        // Empty series or non-finite prices: keep the scale finite.
        let (raw_min, raw_max) = if raw_min.is_finite() && raw_max.is_finite() {
            (raw_min, raw_max)
        } else {
            warn!(
                points = series.len(),
                raw_min, raw_max, "no finite price range, falling back to a zero scale"
            );
            (0.0, 0.0)
        };

        let padding = (raw_max - raw_min) * self.padding_ratio;
        let min_price = ((raw_min - padding) / self.snap_step).floor() * self.snap_step;
        let max_price = ((raw_max + padding) / self.snap_step).ceil() * self.snap_step;

        let levels = self.levels(min_price, max_price);
        let labels = levels.iter().map(|&v| self.format.format(v)).collect();

        PriceScale {
            min_price,
            max_price,
            levels,
            labels,
        }
    }

    fn levels(&self, min_price: f64, max_price: f64) -> Vec<f64> {
        let count = self.label_count.max(2);
        let step = (max_price - min_price) / (count - 1) as f64;
        (0..count)
            .map(|i| {
                // Pin the last label so rounding cannot drift past min_price.
                if i == count - 1 {
                    min_price
                } else {
                    max_price - step * i as f64
                }
            })
            .collect()
    }
}

/// [`ScaleCalculator::compute_scale`] with the default padding, snapping and label count.
pub fn compute_scale(series: &Series) -> PriceScale {
    ScaleCalculator::default().compute_scale(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fallback_series;
    use shared::CandlestickPoint;

    fn create_point(low: f64, high: f64) -> CandlestickPoint {
        CandlestickPoint::new("t", low, high, low, high, 0.0)
    }

    #[test]
    fn test_fallback_scale() {
        // raw 41750..42800, padding 105 -> 41645..42905 -> snapped 41600..43000
        let scale = compute_scale(&fallback_series());
        assert_eq!(scale.min_price, 41600.0);
        assert_eq!(scale.max_price, 43000.0);
        assert_eq!(
            scale.labels,
            vec!["43,000", "42,766.667", "42,533.333", "42,300", "42,066.667", "41,833.333", "41,600"]
        );
    }

    #[test]
    fn test_labels_descend_from_max_to_min() {
        let series = Series::new(vec![create_point(1234.0, 5678.0)]);
        let scale = compute_scale(&series);
        assert_eq!(scale.levels.len(), 7);
        assert_eq!(scale.levels[0], scale.max_price);
        assert_eq!(scale.levels[6], scale.min_price);
        assert!(scale.levels.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_flat_series_is_degenerate() {
        let series = Series::new(vec![CandlestickPoint::new("t", 100.0, 100.0, 100.0, 100.0, 0.0)]);
        let scale = compute_scale(&series);
        assert_eq!(scale.min_price, 100.0);
        assert_eq!(scale.max_price, 100.0);
        assert!(scale.is_degenerate());
        assert_eq!(scale.labels, vec!["100"; 7]);
    }

    #[test]
    fn test_flat_series_off_the_hundred_still_spans() {
        let series = Series::new(vec![CandlestickPoint::new("t", 150.0, 150.0, 150.0, 150.0, 0.0)]);
        let scale = compute_scale(&series);
        assert_eq!((scale.min_price, scale.max_price), (100.0, 200.0));
        assert!(!scale.is_degenerate());
    }

    #[test]
    fn test_custom_label_count_and_format() {
        let calc = ScaleCalculator {
            label_count: 3,
            format: NumberFormat::brazilian(),
            ..ScaleCalculator::default()
        };
        let series = Series::new(vec![create_point(1000.0, 3000.0)]);
        // padding 200 -> 800..3200
        let scale = calc.compute_scale(&series);
        assert_eq!(scale.labels, vec!["3.200", "2.000", "800"]);
    }

    #[test]
    fn test_infinite_price_stays_finite() {
        let series = Series::new(vec![CandlestickPoint::new("t", 100.0, f64::INFINITY, 90.0, 105.0, 1.0)]);
        let scale = compute_scale(&series);
        assert!(scale.min_price.is_finite() && scale.max_price.is_finite());
        assert!(scale.levels.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_empty_series_stays_finite() {
        let scale = compute_scale(&Series::default());
        assert!(scale.min_price.is_finite() && scale.max_price.is_finite());
        assert_eq!(scale.labels.len(), 7);
    }
}
