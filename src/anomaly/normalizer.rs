/// Lower bound of the model's nominal score range (most anomalous)
pub const SCORE_MIN: f64 = -1.0;

/// Upper bound of the model's nominal score range (most normal)
pub const SCORE_MAX: f64 = 1.0;

/// Resolution used to absorb binary representation error before rounding
const TENTHS_SNAP: f64 = 1e6;

/// Map a raw model score onto the 1-10 display scale, 10 being most anomalous.
///
/// Out-of-range scores are clamped first. The result is rounded to one decimal,
/// halves away from zero. NaN is not a valid score; ingestion rejects it.
#[must_use]
pub fn to_ten_scale(score: f64) -> f64 {
    debug_assert!(!score.is_nan(), "anomaly score must not be NaN");
    let clamped = score.clamp(SCORE_MIN, SCORE_MAX);
    let tenths = 100.0 - (clamped + 1.0) * 45.0;
    // 41.499999999999996 must round like the decimal 41.5 it stands for
    let tenths = (tenths * TENTHS_SNAP).round() / TENTHS_SNAP;
    tenths.round() / 10.0
}
