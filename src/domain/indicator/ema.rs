//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first input, then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! The recurrence runs from the first input; the first (n-1) outputs are masked.

/// EMA over an arbitrary sequence; `None` during the warm-up.
pub(crate) fn ema_of(input: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; input.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut ema = 0.0;

    for (i, &x) in input.iter().enumerate() {
        ema = if i == 0 { x } else { x * k + ema * (1.0 - k) };
        out.push((i + 1 >= period).then_some(ema));
    }

    out
}
