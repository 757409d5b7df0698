// =============================================================================
// Snapshot formatter
// =============================================================================
//
// Two renderings of an `IndicatorSnapshot`:
//   * `to_interchange`: ordered JSON object for the prompt builder and chart
//     UI; a missing value is `null`, never 0 or "".
//   * `render_text`: one line per indicator for human-readable reports;
//     a missing value is the sentinel `-`.
// =============================================================================

use std::fmt::Write as _;

use serde_json::{json, Map, Value};

use crate::snapshot::IndicatorSnapshot;

/// Rendered in text reports wherever an indicator is unavailable.
pub const MISSING: &str = "-";

pub fn to_interchange(snapshot: &IndicatorSnapshot) -> Value {
    let mut out = Map::new();

    let dates: Vec<String> = snapshot
        .dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    out.insert("KLINE_DATES".into(), json!(dates));

    for line in &snapshot.ema {
        out.insert(format!("EMA{}", line.period), json!(line.current));
        out.insert(format!("EMA{}_HISTORY", line.period), json!(line.history));
    }

    out.insert(format!("RSI{}", snapshot.rsi_period), json!(snapshot.rsi));

    let kdj = snapshot.kdj;
    out.insert("K".into(), json!(kdj.map(|v| v.k)));
    out.insert("D".into(), json!(kdj.map(|v| v.d)));
    out.insert("J".into(), json!(kdj.map(|v| v.j)));

    let boll = snapshot.bollinger.as_ref();
    out.insert("BOLL_UPPER".into(), json!(boll.map(|b| b.upper)));
    out.insert("BOLL_MIDDLE".into(), json!(boll.map(|b| b.middle)));
    out.insert("BOLL_LOWER".into(), json!(boll.map(|b| b.lower)));
    out.insert(
        "BOLL_HISTORY".into(),
        json!(boll.map(|b| b.history.as_slice()).unwrap_or_default()),
    );

    if let Some(position) = snapshot.price_position {
        out.insert("PRICE_POSITION".into(), json!(percent(position)));
    }

    let macd = snapshot.macd.as_ref();
    out.insert("MACD_DIF".into(), json!(macd.map(|m| m.dif)));
    out.insert("MACD_DEA".into(), json!(macd.map(|m| m.dea)));
    out.insert("MACD_HIST".into(), json!(macd.map(|m| m.hist)));
    let macd_history: Vec<Value> = macd
        .map(|m| m.history.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|p| json!({ "DIF": p.dif, "DEA": p.dea, "MACD": p.hist }))
        .collect();
    out.insert("MACD_HISTORY".into(), Value::Array(macd_history));

    let cci = snapshot.cci.as_ref();
    out.insert("CCI".into(), json!(cci.and_then(|c| c.value)));
    out.insert(
        "CCI_HISTORY".into(),
        json!(cci.map(|c| c.history.as_slice()).unwrap_or_default()),
    );

    Value::Object(out)
}

/// Plain-text report, one indicator per line.
pub fn render_text(snapshot: &IndicatorSnapshot) -> String {
    let mut out = String::new();

    for line in &snapshot.ema {
        let _ = writeln!(out, "EMA{}: {}", line.period, fixed(line.current, 4));
    }

    let _ = writeln!(out, "RSI{}: {}", snapshot.rsi_period, fixed(snapshot.rsi, 2));

    let kdj = snapshot.kdj;
    let _ = writeln!(
        out,
        "KDJ: K={} D={} J={}",
        fixed(kdj.map(|v| v.k), 2),
        fixed(kdj.map(|v| v.d), 2),
        fixed(kdj.map(|v| v.j), 2)
    );

    let boll = snapshot.bollinger.as_ref();
    let _ = writeln!(
        out,
        "BOLL: upper={} middle={} lower={}",
        fixed(boll.map(|b| b.upper), 4),
        fixed(boll.map(|b| b.middle), 4),
        fixed(boll.map(|b| b.lower), 4)
    );

    let position = snapshot
        .price_position
        .map_or_else(|| MISSING.to_string(), percent);
    let _ = writeln!(out, "PRICE_POSITION: {position}");

    let macd = snapshot.macd.as_ref();
    let _ = writeln!(
        out,
        "MACD: DIF={} DEA={} HIST={}",
        fixed(macd.map(|m| m.dif), 4),
        fixed(macd.map(|m| m.dea), 4),
        fixed(macd.map(|m| m.hist), 4)
    );

    let _ = writeln!(
        out,
        "CCI: {}",
        fixed(snapshot.cci.as_ref().and_then(|c| c.value), 2)
    );

    out
}

/// Already rounded to 2 decimals; trailing zeros are not padded (`62.5%`).
fn percent(position: f64) -> String {
    format!("{position}%")
}

fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => MISSING.to_string(),
    }
}
