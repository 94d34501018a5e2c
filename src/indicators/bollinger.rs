// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA, upper/lower = SMA ± k·σ. Band width is the normalised
// distance: BBW = (upper - lower) / middle * 100.
//
// The feature extractor averages BBW across its look-back windows.

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

/// Calculate Bollinger Bands over the last `period` closes.
///
/// Returns `None` when fewer than `period` data points are available, the
/// middle band is zero, or the width is non-finite.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerResult> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;

    if middle == 0.0 {
        return None;
    }

    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    let width = (upper - lower) / middle * 100.0;

    width.is_finite().then_some(BollingerResult {
        upper,
        middle,
        lower,
        width,
    })
}

/// Mean band width over `periods`, each capped to the available history.
///
/// Periods shorter than 2 after capping are skipped; 0.0 when nothing
/// qualifies.
pub fn mean_bandwidth(closes: &[f64], periods: &[usize], num_std: f64) -> f64 {
    let widths: Vec<f64> = periods
        .iter()
        .map(|&p| p.min(closes.len()))
        .filter(|&p| p >= 2)
        .filter_map(|p| calculate_bollinger(closes, p, num_std))
        .map(|bb| bb.width)
        .collect();

    if widths.is_empty() {
        0.0
    } else {
        widths.iter().sum::<f64>() / widths.len() as f64
    }
}
