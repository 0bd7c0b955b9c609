use serde::{Deserialize, Serialize};

/// One OHLCV bucket. `time` is an opaque label rendered on the x axis.
///
/// `low <= open, close <= high` is expected but not enforced; see [`CandlestickPoint::is_consistent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickPoint {
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl CandlestickPoint {
    pub fn new(time: impl Into<String>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time: time.into(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // open, high, low, close
    pub fn prices(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }

    /// Strictly greater: a doji (open == close) is not bullish.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high && self.volume >= 0.0
    }
}

/// Chronologically ordered points; index 0 is the oldest and is drawn leftmost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<CandlestickPoint>);

impl Series {
    pub fn new(points: Vec<CandlestickPoint>) -> Self {
        Series(points)
    }

    pub fn points(&self) -> &[CandlestickPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CandlestickPoint> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandlestickPoint> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<CandlestickPoint> {
        self.0
    }
}

impl From<Vec<CandlestickPoint>> for Series {
    fn from(points: Vec<CandlestickPoint>) -> Self {
        Series(points)
    }
}

impl FromIterator<CandlestickPoint> for Series {
    fn from_iter<I: IntoIterator<Item = CandlestickPoint>>(iter: I) -> Self {
        Series(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a CandlestickPoint;
    type IntoIter = std::slice::Iter<'a, CandlestickPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
