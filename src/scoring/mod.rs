//! Case scorer: violations + standing signals -> 1-10 case strength
//!
//! Sub-scores come from fixed point tables; the total is the arithmetic
//! sum clamped into 1-10. Settlement probability is a fixed monotonic
//! lookup from the total, never a caller-perturbable formula.

use crate::config::ScoringConfig;
use crate::core::errors::{EngineError, Result};
use crate::core::{CaseScore, Recommendation, StandingInputs, Violation};

/// Compute the case score.
pub fn score(
    violations: &[Violation],
    standing: &StandingInputs,
    willfulness_score: u8,
    documentation_complete: bool,
    config: &ScoringConfig,
) -> Result<CaseScore> {
    if willfulness_score > 100 {
        return Err(EngineError::calculation_input(format!(
            "willfulness score {willfulness_score} exceeds 100"
        )));
    }

    let standing = standing_points(standing);
    let violation_quality = violation_quality(violations, config);
    let willfulness = willfulness_bucket(willfulness_score, config);
    let documentation = u8::from(documentation_complete);

    let total = (standing + violation_quality + willfulness + documentation).clamp(1, 10);

    Ok(CaseScore {
        standing,
        violation_quality,
        willfulness,
        documentation,
        total,
        settlement_probability_pct: config.settlement_table[usize::from(total) - 1],
        recommendation: recommendation(total),
    })
}

/// One point per standing element: dissemination, concrete harm,
/// causation. All three are required for a viable claim, and the
/// sub-score reflects how much of that foundation is in place.
fn standing_points(inputs: &StandingInputs) -> u8 {
    u8::from(inputs.dissemination) + u8::from(inputs.concrete_harm) + u8::from(inputs.causation)
}

/// 0-4 from violation count, plus one point when the set contains a
/// litigation-grade violation by severity.
fn violation_quality(violations: &[Violation], config: &ScoringConfig) -> u8 {
    let base = match violations.len() {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };
    let strong = violations
        .iter()
        .any(|v| v.severity >= config.strong_severity_floor);
    (base + u8::from(strong)).min(4)
}

fn willfulness_bucket(willfulness_score: u8, config: &ScoringConfig) -> u8 {
    let [low, high] = config.willfulness_buckets;
    if willfulness_score < low {
        0
    } else if willfulness_score < high {
        1
    } else {
        2
    }
}

fn recommendation(total: u8) -> Recommendation {
    match total {
        0..=3 => Recommendation::Decline,
        4..=5 => Recommendation::Investigate,
        6..=8 => Recommendation::DemandLetter,
        _ => Recommendation::Litigate,
    }
}
