//! End-to-end scenarios against the public engine API.

use adaptive_signal_engine::learning::MEMORY_CAPACITY;
use adaptive_signal_engine::{
    Candle, Direction, EngineConfig, PredictorKind, Regime, SignalEngine, SignalLabel,
};

fn series(prices: &[f64], start: i64) -> Vec<Candle> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| Candle {
            timestamp: start + i as i64 * 60_000,
            open: p,
            high: p * 1.001,
            low: p * 0.999,
            close: p,
            volume: 1_000.0,
        })
        .collect()
}

fn geometric(len: usize, step: f64) -> Vec<f64> {
    (0..len).map(|i| 100.0 * (1.0 + step).powi(i as i32)).collect()
}

/// Deterministic xorshift64 random walk.
fn random_walk(len: usize, seed: u64) -> Vec<f64> {
    let mut prices = Vec::with_capacity(len);
    let mut price = 100.0;
    let mut state = seed;
    for _ in 0..len {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        price += (state as f64 / u64::MAX as f64) - 0.5;
        prices.push(price);
    }
    prices
}

#[test]
fn flat_market_holds() {
    let mut engine = SignalEngine::default();
    let candles = series(&[250.0; 250], 0);

    let bundle = engine.extract_features(&candles);
    assert_eq!(bundle.entropy, 0.0);

    let signal = engine.generate_signal(&candles);
    assert_eq!(signal.regime, Regime::Ranging);
    assert_eq!(signal.label, SignalLabel::Hold);
    assert_eq!(signal.direction, Direction::Neutral);
    assert!(signal.prediction.abs() < 1e-9);
}

#[test]
fn steady_uptrend_is_bought() {
    let mut engine = SignalEngine::default();
    let signal = engine.generate_signal(&series(&geometric(250, 0.005), 0));

    assert_eq!(signal.regime, Regime::Trending);
    assert!(signal.prediction > 0.3, "prediction {}", signal.prediction);
    assert!(matches!(signal.label, SignalLabel::Buy | SignalLabel::StrongBuy));
    assert_eq!(signal.direction, Direction::Long);
    assert!(signal.confidence > 0.7);
    assert!(!signal.low_confidence);
}

#[test]
fn steady_downtrend_is_sold() {
    let mut engine = SignalEngine::default();
    let signal = engine.generate_signal(&series(&geometric(250, -0.005), 0));

    assert_eq!(signal.regime, Regime::Trending);
    assert!(signal.prediction < -0.3, "prediction {}", signal.prediction);
    assert!(matches!(signal.label, SignalLabel::Sell | SignalLabel::StrongSell));
    assert_eq!(signal.direction, Direction::Short);
}

#[test]
fn whipsaw_market_is_volatile() {
    let mut prices = vec![100.0];
    for i in 0..250 {
        let last = prices[prices.len() - 1];
        prices.push(if i % 2 == 0 { last * 1.08 } else { last * 0.92 });
    }
    let mut engine = SignalEngine::default();
    let signal = engine.generate_signal(&series(&prices, 0));
    assert_eq!(signal.regime, Regime::Volatile);
}

#[test]
fn random_walk_hurst_is_near_half() {
    let seeds = [
        123_456_789_u64,
        987_654_321,
        0x9E37_79B9_7F4A_7C15,
        0xD1B5_4A32_D192_ED03,
        0xA076_1D64_78BD_642F,
        0xE703_7ED1_A0B4_28DB,
        0x8EBC_6AF0_9C88_C6E3,
        0x5899_65CC_7537_4CC3,
    ];
    let engine = SignalEngine::default();
    let bundles: Vec<_> = seeds
        .iter()
        .map(|&seed| engine.extract_features(&series(&random_walk(1025, seed), 0)))
        .collect();
    let estimates: Vec<f64> = bundles.iter().map(|b| b.hurst).collect();
    let avg = estimates.iter().sum::<f64>() / estimates.len() as f64;
    assert!((avg - 0.5).abs() <= 0.1, "Hurst {avg:.4} from {estimates:?}");
    for b in &bundles {
        assert!((b.hurst + b.fractal_dimension - 2.0).abs() < 1e-12);
    }
}

#[test]
fn short_history_degrades_instead_of_failing() {
    let mut engine = SignalEngine::default();
    let signal = engine.generate_signal(&series(&[10.0, 10.2, 10.1, 10.4, 10.3], 0));
    assert!(signal.low_confidence);
    assert!(signal.prediction.is_finite());
    assert!((0.0..=1.0).contains(&signal.confidence));
}

#[test]
fn opposing_predictor_loses_weight() {
    // In a steady uptrend mean reversion votes short while the market keeps
    // rising; every positive outcome should cut its weight.
    let mut engine = SignalEngine::default();
    let initial = engine.weights().get(PredictorKind::MeanReversion);
    let mut previous = initial;

    for step in 0..10 {
        let candles = series(&geometric(250, 0.005), step * 60_000);
        let signal = engine.generate_signal(&candles);
        assert!(signal.votes.mean_reversion < 0.0);
        engine.learn(1.0).unwrap();

        let current = engine.weights().get(PredictorKind::MeanReversion);
        assert!(current < previous, "step {step}: {current} !< {previous}");
        previous = current;
    }
    assert!(previous < initial);
    assert!(engine.weights().get(PredictorKind::TrendFollowing) > 0.3);
}

#[test]
fn memory_is_bounded_fifo() {
    let mut engine = SignalEngine::new(EngineConfig::default());
    let prices = [10.0, 10.1, 10.05, 10.2, 10.15, 10.3, 10.25, 10.4];
    let total = MEMORY_CAPACITY as i64 + 5;

    for k in 0..total {
        engine.generate_signal(&series(&prices, k * 1_000_000));
    }

    let memories = engine.memories();
    assert_eq!(memories.len(), MEMORY_CAPACITY);
    let last_offset = (prices.len() as i64 - 1) * 60_000;
    assert_eq!(
        memories.iter().next().map(|r| r.timestamp),
        Some(5 * 1_000_000 + last_offset)
    );
    assert_eq!(
        memories.latest().map(|r| r.timestamp),
        Some((total - 1) * 1_000_000 + last_offset)
    );
}

#[test]
fn learned_state_is_per_instance() {
    let candles = series(&geometric(250, 0.005), 0);
    let mut btc = SignalEngine::default();
    let mut eth = SignalEngine::default();

    btc.generate_signal(&candles);
    btc.learn(-1.0).unwrap();
    eth.generate_signal(&candles);

    assert_ne!(btc.weights(), eth.weights());
    let a = btc.generate_signal(&candles);
    let b = eth.generate_signal(&candles);
    assert_ne!(a.prediction, b.prediction);
}
