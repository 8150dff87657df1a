use super::moving_average::calculate_sma;

/// Calculate Bollinger bands over the most recent `window` prices
///
/// Returns `(upper, lower)` as mid ± deviation * population standard
/// deviation. The window includes the most recent price, so a fresh close
/// widens the band it is compared against.
pub fn calculate_bollinger(prices: &[f64], window: usize, deviation: f64) -> Option<(f64, f64)> {
    if window == 0 || prices.len() < window {
        return None;
    }

    let mid = calculate_sma(prices, window)?;

    let variance: f64 = prices
        .iter()
        .rev()
        .take(window)
        .map(|p| (p - mid).powi(2))
        .sum::<f64>()
        / window as f64;
    let std = variance.sqrt();

    Some((mid + deviation * std, mid - deviation * std))
}
