//! In-play three-way outcome model for soccer.
//!
//! An Elo-style pre-match gap is adjusted for home advantage and the current
//! score, then scaled by how far the match has progressed: a lead late in the
//! game is worth more than the same lead at kick-off. The adjusted gap
//! ("effective diff") drives both the win/loss split and the draw share.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Home advantage in rating points (skipped at neutral venues).
pub const HOME_ADVANTAGE: f64 = 60.0;
/// Rating points per goal of lead.
pub const GOAL_VALUE: f64 = 50.0;
/// Steepness of the confidence ramp around the 45th minute.
pub const MINUTE_DECAY: f64 = 0.025;
/// Upper bound on the draw probability.
pub const MAX_DRAW: f64 = 0.55;

/// Live state of a match at the moment of prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchState {
    pub home_score: u32,
    pub away_score: u32,
    /// Minutes played, stoppage and extra time included
    pub minute: i32,
    pub is_neutral: bool,
}

/// Normalized home/draw/away probabilities plus the gap that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResult {
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    /// Rating gap after home, score and minute adjustments
    pub effective_diff: f64,
}

/// Predict the outcome of a match in progress.
///
/// Probabilities are rounded to 4 decimals and `effective_diff` to 2.
pub fn predict_outcome(
    r_home: f64,
    r_away: f64,
    state: &MatchState,
) -> Result<PredictionResult, AppError> {
    let raw = unrounded_outcome(r_home, r_away, state)?;
    Ok(PredictionResult {
        p_home: round_to(raw.p_home, 4),
        p_draw: round_to(raw.p_draw, 4),
        p_away: round_to(raw.p_away, 4),
        effective_diff: round_to(raw.effective_diff, 2),
    })
}

/// The model before output rounding.
fn unrounded_outcome(
    r_home: f64,
    r_away: f64,
    state: &MatchState,
) -> Result<PredictionResult, AppError> {
    let minute = f64::from(state.minute);

    let mut diff = r_home - r_away;
    if !state.is_neutral {
        diff += HOME_ADVANTAGE;
    }
    let goal_diff = i64::from(state.home_score) - i64::from(state.away_score);
    diff += goal_diff as f64 * GOAL_VALUE;

    // 0.7x early, 1.3x late
    let minute_factor = sigmoid((minute - 45.0) * MINUTE_DECAY);
    let effective_diff = diff * (0.7 + 0.6 * minute_factor);

    let p_home_raw = sigmoid(effective_diff / 400.0 * std::f64::consts::LN_10);
    let p_away_raw = 1.0 - p_home_raw;

    let p_draw = draw_probability(effective_diff, minute);
    let scale = 1.0 - p_draw;

    let (p_home, p_draw, p_away) = normalize(p_home_raw * scale, p_draw, p_away_raw * scale)?;

    Ok(PredictionResult {
        p_home,
        p_draw,
        p_away,
        effective_diff,
    })
}

/// Draw share: high when the sides are close, rising as full time nears.
fn draw_probability(effective_diff: f64, minute: f64) -> f64 {
    let closeness = (-effective_diff.abs() / 200.0).exp();
    let late_draw_boost = 0.1 + 0.2 * sigmoid((minute - 60.0) * 0.05);
    MAX_DRAW.min(closeness * late_draw_boost)
}

/// Rescale a probability triple to sum to one.
///
/// Fails with [`AppError::InvalidComputation`] when the sum is not positive
/// (NaN included), which the model above never produces for finite ratings.
pub fn normalize(p_home: f64, p_draw: f64, p_away: f64) -> Result<(f64, f64, f64), AppError> {
    let total = p_home + p_draw + p_away;
    if !(total > 0.0) {
        return Err(AppError::InvalidComputation);
    }
    Ok((p_home / total, p_draw / total, p_away / total))
}

/// Numerically stable logistic function.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Round to `decimals` places from the exact binary value, ties to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // An exact tie needs the decimal expansion to end at digit `decimals + 1`,
    // i.e. value * 2^(decimals + 1) must be an integer.
    let scaled = value * 2f64.powi(decimals as i32 + 1);
    let text = if scaled.fract() == 0.0 {
        let exact = format!("{:.*}", decimals + 1, value);
        match exact.strip_suffix('5') {
            Some(truncated) => {
                let kept: f64 = truncated.parse().unwrap_or(value);
                let last_odd = truncated
                    .chars()
                    .rev()
                    .find(char::is_ascii_digit)
                    .and_then(|c| c.to_digit(10))
                    .map_or(false, |d| d % 2 == 1);
                let step = 10f64.powi(-(decimals as i32));
                let target = if last_odd { kept + value.signum() * step } else { kept };
                format!("{:.*}", decimals, target)
            }
            None => format!("{:.*}", decimals, value),
        }
    } else {
        format!("{:.*}", decimals, value)
    };
    text.parse().unwrap_or(value)
}
