use serde::{Deserialize, Serialize};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV observation supplied by the upstream price feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Closing prices of `candles` in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Volumes of `candles` in order.
pub fn volumes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.volume).collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the feed contract: strictly increasing timestamps, finite prices and
/// non-negative volume.
///
/// The engine itself never calls this; feature extraction tolerates imperfect
/// input. Hosts use it to reject a broken feed before it reaches an engine.
pub fn validate_series(candles: &[Candle]) -> Result<(), EngineError> {
    for (index, candle) in candles.iter().enumerate() {
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(EngineError::InvalidSeries {
                index,
                reason: "non-finite price".to_string(),
            });
        }
        if !candle.volume.is_finite() || candle.volume < 0.0 {
            return Err(EngineError::InvalidSeries {
                index,
                reason: format!("volume {} is not a non-negative number", candle.volume),
            });
        }
        if index > 0 && candle.timestamp <= candles[index - 1].timestamp {
            return Err(EngineError::InvalidSeries {
                index,
                reason: format!(
                    "timestamp {} does not follow {}",
                    candle.timestamp,
                    candles[index - 1].timestamp
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(timestamp: i64, close: f64, volume: f64) -> Candle {
        Candle {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    #[test]
    fn valid_series_passes() {
        let candles: Vec<Candle> = (0..10).map(|i| candle(i * 60_000, 100.0, 5.0)).collect();
        assert!(validate_series(&candles).is_ok());
        assert!(validate_series(&[]).is_ok());
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let candles = vec![candle(0, 100.0, 1.0), candle(0, 101.0, 1.0)];
        match validate_series(&candles) {
            Err(EngineError::InvalidSeries { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidSeries, got {other:?}"),
        }
    }

    #[test]
    fn negative_volume_rejected() {
        let candles = vec![candle(0, 100.0, 1.0), candle(1, 101.0, -1.0)];
        assert!(validate_series(&candles).is_err());
    }

    #[test]
    fn nan_price_rejected() {
        let candles = vec![candle(0, f64::NAN, 1.0)];
        assert!(validate_series(&candles).is_err());
    }

    #[test]
    fn typical_price_is_hlc_mean() {
        let c = Candle {
            timestamp: 0,
            open: 10.0,
            high: 12.0,
            low: 9.0,
            close: 11.0,
            volume: 1.0,
        };
        assert!((c.typical_price() - 32.0 / 3.0).abs() < 1e-12);
    }
}
