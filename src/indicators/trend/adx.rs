//! ADX (Average Directional Index) indicator

use crate::common::math;

/// Latest ADX reading with its directional components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdxReading {
    pub value: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub period: usize,
}

/// Calculate ADX over parallel high/low/close series.
///
/// ADX measures trend strength regardless of direction. Directional movement
/// and true range are smoothed with Wilder's method, DX is derived from the
/// smoothed +DI/-DI, and ADX is Wilder's average of DX. Needs `2 * period`
/// bars: `period` moves for the first DI and `period` DX values for the first ADX.
pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<AdxReading> {
    let len = highs.len();
    if period == 0 || len != lows.len() || len != closes.len() || len < 2 * period {
        return None;
    }

    let mut tr_values = Vec::with_capacity(len - 1);
    let mut plus_dm_values = Vec::with_capacity(len - 1);
    let mut minus_dm_values = Vec::with_capacity(len - 1);

    for i in 1..len {
        tr_values.push(math::true_range(highs[i], lows[i], Some(closes[i - 1])));

        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];
        plus_dm_values.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm_values.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
    }

    let tr_smoothed = math::wilder_sum(&tr_values, period);
    let plus_smoothed = math::wilder_sum(&plus_dm_values, period);
    let minus_smoothed = math::wilder_sum(&minus_dm_values, period);

    let mut dx_values = Vec::with_capacity(tr_smoothed.len());
    let mut last_di = (0.0, 0.0);
    for ((&tr, &plus), &minus) in tr_smoothed.iter().zip(&plus_smoothed).zip(&minus_smoothed) {
        let (plus_di, minus_di) = if tr > 0.0 {
            (100.0 * plus / tr, 100.0 * minus / tr)
        } else {
            (0.0, 0.0)
        };
        let di_sum = plus_di + minus_di;
        let dx = if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        };
        dx_values.push(dx);
        last_di = (plus_di, minus_di);
    }

    let value = *math::wilder_average(&dx_values, period).last()?;

    Some(AdxReading {
        value: value.clamp(0.0, 100.0),
        plus_di: last_di.0,
        minus_di: last_di.1,
        period,
    })
}

/// Calculate ADX with default period (14)
pub fn calculate_adx_default(highs: &[f64], lows: &[f64], closes: &[f64]) -> Option<AdxReading> {
    calculate_adx(highs, lows, closes, 14)
}
