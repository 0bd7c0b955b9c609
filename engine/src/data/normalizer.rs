use shared::{CandlestickPoint, Series};
use tracing::{debug, warn};

// Seven hourly candles used whenever no data is supplied.
// time, open, high, low, close, volume
const FALLBACK_POINTS: [(&str, f64, f64, f64, f64, f64); 7] = [
    ("10:00", 42100.0, 42350.0, 41950.0, 42280.0, 120.0),
    ("11:00", 42280.0, 42500.0, 42150.0, 42190.0, 180.0),
    ("12:00", 42190.0, 42300.0, 41800.0, 41900.0, 240.0),
    ("13:00", 41900.0, 42200.0, 41750.0, 42150.0, 150.0),
    ("14:00", 42150.0, 42650.0, 42100.0, 42600.0, 210.0),
    ("15:00", 42600.0, 42800.0, 42400.0, 42450.0, 170.0),
    ("16:00", 42450.0, 42700.0, 42350.0, 42680.0, 130.0),
];

pub fn fallback_series() -> Series {
    FALLBACK_POINTS
        .iter()
        .map(|&(time, open, high, low, close, volume)| CandlestickPoint::new(time, open, high, low, close, volume))
        .collect()
}

/// Guarantees a non-empty series. Missing or empty input is not an error:
/// it is replaced by [`fallback_series`].
pub fn normalize(input: Option<Series>) -> Series {
    match input {
        Some(series) if !series.is_empty() => {
            // Inconsistent OHLC is rendered as-is, just reported.
            for (index, point) in series.iter().enumerate().filter(|(_, p)| !p.is_consistent()) {
                warn!(index, time = %point.time, "point violates low <= open,close <= high; rendering as-is");
            }
            series
        }
        Some(_) => {
            debug!("empty series supplied, using fallback data");
            fallback_series()
        }
        None => {
            debug!("no series supplied, using fallback data");
            fallback_series()
        }
    }
}
