use chrono::{Duration, NaiveDate};
use kline_indicators::indicators::{bollinger, cci, ema, macd, price_position, round_to, rsi};
use kline_indicators::{Bar, EngineConfig, IndicatorEngine, SessionState};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

/// Map arbitrary integers onto strictly positive, finite prices.
fn prices(raw: &[u16]) -> Vec<f64> {
    raw.iter().map(|&r| 1.0 + f64::from(r) / 100.0).collect()
}

fn bars(closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar {
            date: start + Duration::days(i as i64),
            open: c,
            high: c * 1.01,
            low: c * 0.99,
            close: c,
            volume: 10_000.0,
            amount: c * 10_000.0,
        })
        .collect()
}

// ---- calculator properties ---------------------------------------------

#[quickcheck]
fn ema_absent_iff_too_short(raw: Vec<u16>, period: u8) -> TestResult {
    if period == 0 {
        return TestResult::discard();
    }
    let closes = prices(&raw);
    let p = period as usize;
    TestResult::from_bool(ema(&closes, p, None, false).is_none() == (closes.len() < p))
}

#[quickcheck]
fn ema_ignores_live_price_when_not_blending(raw: Vec<u16>, period: u8, live: u16) -> TestResult {
    if period == 0 {
        return TestResult::discard();
    }
    let closes = prices(&raw);
    let p = period as usize;
    let live = Some(1.0 + f64::from(live));
    TestResult::from_bool(ema(&closes, p, live, false) == ema(&closes, p, None, false))
}

#[quickcheck]
fn rsi_stays_in_range(raw: Vec<u16>) -> TestResult {
    if raw.len() < 15 {
        return TestResult::discard();
    }
    let value = rsi(&prices(&raw), 14).unwrap();
    TestResult::from_bool((0.0..=100.0).contains(&value))
}

#[quickcheck]
fn rsi_of_non_decreasing_series_is_one_hundred(raw: Vec<u16>) -> TestResult {
    if raw.len() < 15 {
        return TestResult::discard();
    }
    let mut closes = prices(&raw);
    closes.sort_by(|a, b| a.total_cmp(b));
    TestResult::from_bool(rsi(&closes, 14) == Some(100.0))
}

#[quickcheck]
fn bollinger_bands_are_ordered(raw: Vec<u16>) -> TestResult {
    if raw.len() < 20 {
        return TestResult::discard();
    }
    let bb = bollinger(&prices(&raw), 20, 2.0).unwrap();
    let ordered = bb.upper >= bb.middle
        && bb.middle >= bb.lower
        && bb.history.iter().all(|b| b.upper >= b.middle && b.middle >= b.lower);
    TestResult::from_bool(ordered)
}

#[quickcheck]
fn macd_history_is_bounded(raw: Vec<u16>) -> TestResult {
    let closes = prices(&raw);
    let n = closes.len();
    match macd(&closes, 12, 26, 9, 60) {
        None => TestResult::from_bool(n < 35),
        Some(m) => TestResult::from_bool(m.history.len() <= 60 && m.history.len() <= n - 35 + 1),
    }
}

#[quickcheck]
fn cci_never_leaks_infinity(raw: Vec<u16>) -> bool {
    let closes = prices(&raw);
    match cci(&closes, &closes, &closes, 14) {
        None => closes.len() < 14,
        Some(c) => c.history.iter().chain([&c.value]).all(|v| v.map_or(true, f64::is_finite)),
    }
}

// ---- engine properties -------------------------------------------------

#[quickcheck]
fn engine_is_idempotent(raw: Vec<u16>, live: u16, open: bool, real_time: bool) -> TestResult {
    if raw.is_empty() {
        return TestResult::discard();
    }
    let engine = IndicatorEngine::new(EngineConfig::default()).unwrap();
    let series = bars(&prices(&raw));
    let session = if open { SessionState::Open } else { SessionState::Closed };
    let live = Some(1.0 + f64::from(live) / 100.0);

    let a = engine.compute_with_session(&series, live, real_time, session).unwrap();
    let b = engine.compute_with_session(&series, live, real_time, session).unwrap();
    let same = serde_json::to_string(&a).unwrap() == serde_json::to_string(&b).unwrap();
    TestResult::from_bool(same && a == b)
}

#[quickcheck]
fn engine_history_never_exceeds_bars(raw: Vec<u16>) -> TestResult {
    if raw.is_empty() {
        return TestResult::discard();
    }
    let engine = IndicatorEngine::new(EngineConfig::default()).unwrap();
    let series = bars(&prices(&raw));
    let n = series.len().min(60);
    let snap = engine
        .compute_with_session(&series, None, false, SessionState::Closed)
        .unwrap();

    let ema_ok = snap.ema.iter().all(|l| l.history.len() == (n + 1).saturating_sub(l.period));
    let dates_ok = snap.dates.len() == snap.longest_history() && snap.dates.len() <= n;
    TestResult::from_bool(ema_ok && dates_ok)
}

// ---- scenarios ---------------------------------------------------------

#[test]
fn scenario_ema_of_five_closes_is_their_mean() {
    let closes = [10.0, 10.5, 11.0, 10.8, 11.2];
    assert_eq!(ema(&closes, 5, None, false), Some(10.7));
    assert_eq!(format!("{:.4}", ema(&closes, 5, None, false).unwrap()), "10.7000");
}

#[test]
fn scenario_rsi_needs_fifteen_points() {
    let closes: Vec<f64> = (0..13).map(|i| if i % 2 == 0 { 20.0 } else { 21.0 }).collect();
    assert!(rsi(&closes, 14).is_none());
}

#[test]
fn scenario_flat_bollinger_has_no_price_position() {
    let closes = [8.88; 20];
    let bb = bollinger(&closes, 20, 2.0).unwrap();
    assert_eq!(bb.upper, bb.middle);
    assert_eq!(bb.middle, bb.lower);
    assert!(price_position(&bb.latest(), 8.88).is_none());
}

#[test]
fn scenario_flat_cci_window_is_absent() {
    let v = [3.2; 14];
    let c = cci(&v, &v, &v, 14).unwrap();
    assert!(c.value.is_none());
}

/// The real-time blend is a working approximation rather than a published
/// formula: the seed drops the oldest close and the live quote takes the
/// place of today's close. It is also applied during the midday recess, since
/// the session classifier reports Open from 09:30 until midnight. This test
/// pins the current behaviour so any change to it is deliberate.
#[test]
fn blended_ema_documented_approximation() {
    let closes = [10.0, 10.5, 11.0, 10.8, 11.2, 11.4];
    let live = 11.6;
    let mult = 2.0 / 6.0;

    let mut expected = (10.5 + 11.0 + 10.8 + 11.2) / 4.0;
    expected = (11.4 - expected) * mult + expected;
    expected = (live - expected) * mult + expected;

    assert_eq!(ema(&closes, 5, Some(live), true), Some(round_to(expected, 4)));
    assert_ne!(ema(&closes, 5, Some(live), true), ema(&closes, 5, None, false));
}

#[test]
fn engine_reports_flat_series_without_numeric_faults() {
    let engine = IndicatorEngine::new(EngineConfig::default()).unwrap();
    let mut series = bars(&[5.0; 40]);
    for bar in &mut series {
        bar.high = bar.close;
        bar.low = bar.close;
    }
    let snap = engine
        .compute_with_session(&series, Some(5.0), true, SessionState::Open)
        .unwrap();

    assert!(snap.cci.as_ref().unwrap().value.is_none());
    assert!(snap.price_position.is_none());
    assert_eq!(snap.rsi, Some(100.0));
    assert_eq!(snap.kdj.map(|k| k.k), Some(50.0));
    let json = serde_json::to_string(&kline_indicators::report::to_interchange(&snap)).unwrap();
    assert!(!json.contains("inf") && !json.contains("NaN"));
}
