//! Deterministic damages calculator
//!
//! Pure function of the violation set, the caller's quantified harm items,
//! the willfulness score, and the configured tables. No clock, no
//! randomness: identical inputs produce bit-identical output, which the
//! legal-case audit trail depends on. Out-of-range inputs are caller bugs
//! and fail loudly; clamping here could misstate legal exposure.

use crate::config::DamagesConfig;
use crate::core::errors::{EngineError, Result};
use crate::core::{DamagesBand, DamagesEstimate, HarmItem, Violation};

/// Compute the three-scenario damages estimate.
pub fn calculate(
    violations: &[Violation],
    harm_items: &[HarmItem],
    willfulness_score: u8,
    config: &DamagesConfig,
) -> Result<DamagesEstimate> {
    validate_inputs(violations, harm_items, willfulness_score, config)?;

    let (statutory_low, statutory_mid, statutory_high) = statutory_totals(violations, config);
    // Actual damages are aggregated as supplied; the calculator never
    // invents harm figures, so the three bands carry the same subtotal.
    let actual_cents: i64 = harm_items.iter().map(|item| item.amount_cents).sum();

    let punitive_multiplier = if willfulness_score >= config.punitive_threshold {
        punitive_multiplier(violations, config)
    } else {
        0
    };

    let band = |statutory_cents: i64| DamagesBand {
        actual_cents,
        statutory_cents,
        punitive_cents: punitive_multiplier * (statutory_cents + actual_cents),
    };

    Ok(DamagesEstimate {
        conservative: band(statutory_low),
        moderate: band(statutory_mid),
        aggressive: band(statutory_high),
        attorney_fee_cents: attorney_fee(violations.len(), config),
        willfulness_score,
    })
}

fn validate_inputs(
    violations: &[Violation],
    harm_items: &[HarmItem],
    willfulness_score: u8,
    config: &DamagesConfig,
) -> Result<()> {
    if willfulness_score > 100 {
        return Err(EngineError::calculation_input(format!(
            "willfulness score {willfulness_score} exceeds 100"
        )));
    }
    if let Some(item) = harm_items.iter().find(|item| item.amount_cents < 0) {
        return Err(EngineError::calculation_input(format!(
            "harm item {:?} has a negative amount",
            item.description
        )));
    }
    if let Some(violation) = violations
        .iter()
        .find(|v| !config.statutory.contains_key(&v.section))
    {
        return Err(EngineError::calculation_input(format!(
            "no statutory band configured for section {}",
            violation.section
        )));
    }
    Ok(())
}

/// Per-violation statutory lookup, banded low / midpoint / high.
fn statutory_totals(violations: &[Violation], config: &DamagesConfig) -> (i64, i64, i64) {
    violations.iter().fold((0, 0, 0), |(low, mid, high), violation| {
        let band = config.statutory[&violation.section];
        (
            low + band.low_cents,
            mid + (band.low_cents + band.high_cents) / 2,
            high + band.high_cents,
        )
    })
}

/// Multiplier tier selected by reprehensibility-factor count: the number
/// of violations at or above the configured severity floor.
fn punitive_multiplier(violations: &[Violation], config: &DamagesConfig) -> i64 {
    let factors = violations
        .iter()
        .filter(|v| v.severity >= config.reprehensibility_severity_floor)
        .count();
    config
        .punitive_tiers
        .iter()
        .filter(|tier| factors >= tier.min_factors)
        .map(|tier| tier.multiplier)
        .max()
        .unwrap_or(0)
}

/// Hours-by-complexity lookup times the configured hourly rate.
fn attorney_fee(violation_count: usize, config: &DamagesConfig) -> i64 {
    let hours = config
        .fee_tiers
        .iter()
        .filter(|tier| violation_count >= tier.min_violations)
        .map(|tier| tier.hours)
        .max()
        .unwrap_or(0);
    hours * config.hourly_rate_cents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Bureau, ViolationSection};

    fn violation(section: ViolationSection, severity: u8) -> Violation {
        Violation {
            id: format!("{}-{severity}", section.tag()),
            section,
            account_id: Some("acct-1".to_string()),
            bureaus: vec![Bureau::Experian],
            evidence: "test".to_string(),
            severity,
        }
    }

    #[test]
    fn statutory_bands_sum_per_violation() {
        let violations = vec![
            violation(ViolationSection::Accuracy, 8),
            violation(ViolationSection::Investigation, 5),
        ];
        let estimate = calculate(&violations, &[], 10, &DamagesConfig::default()).unwrap();
        // two standard $100-$1,000 violations
        assert_eq!(estimate.conservative.statutory_cents, 200_00);
        assert_eq!(estimate.moderate.statutory_cents, 1_100_00);
        assert_eq!(estimate.aggressive.statutory_cents, 2_000_00);
        assert_eq!(estimate.conservative.punitive_cents, 0);
    }

    #[test]
    fn punitive_band_gates_on_willfulness_threshold() {
        let violations = vec![violation(ViolationSection::Accuracy, 8)];
        let config = DamagesConfig::default();

        let below = calculate(&violations, &[], 10, &config).unwrap();
        assert_eq!(below.moderate.punitive_cents, 0);

        let above = calculate(&violations, &[], 80, &config).unwrap();
        assert!(above.moderate.punitive_cents > 0);
        // one severity-8 factor selects the 1x tier
        assert_eq!(
            above.moderate.punitive_cents,
            above.moderate.statutory_cents
        );
    }

    #[test]
    fn reprehensibility_count_selects_higher_tiers() {
        let violations: Vec<Violation> = (0..4)
            .map(|_| violation(ViolationSection::Accuracy, 9))
            .collect();
        let estimate = calculate(&violations, &[], 90, &DamagesConfig::default()).unwrap();
        // four factors reach the 3x tier
        assert_eq!(
            estimate.aggressive.punitive_cents,
            3 * estimate.aggressive.statutory_cents
        );
    }

    #[test]
    fn actual_damages_aggregate_supplied_items_only() {
        let harm = vec![
            HarmItem {
                description: "mortgage rate differential".to_string(),
                amount_cents: 4_800_00,
            },
            HarmItem {
                description: "denied application fee".to_string(),
                amount_cents: 75_00,
            },
        ];
        let estimate = calculate(&[], &harm, 0, &DamagesConfig::default()).unwrap();
        for band in [estimate.conservative, estimate.moderate, estimate.aggressive] {
            assert_eq!(band.actual_cents, 4_875_00);
            assert_eq!(band.statutory_cents, 0);
        }
    }

    #[test]
    fn attorney_fee_uses_complexity_tiers() {
        let config = DamagesConfig::default();
        let few = calculate(&[violation(ViolationSection::Accuracy, 5)], &[], 0, &config).unwrap();
        assert_eq!(few.attorney_fee_cents, 20 * 400_00);

        let many: Vec<Violation> = (0..12)
            .map(|_| violation(ViolationSection::Accuracy, 5))
            .collect();
        let estimate = calculate(&many, &[], 0, &config).unwrap();
        assert_eq!(estimate.attorney_fee_cents, 80 * 400_00);
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let violations = vec![
            violation(ViolationSection::Accuracy, 8),
            violation(ViolationSection::FurnisherDuty, 4),
        ];
        let harm = vec![HarmItem {
            description: "documented denial".to_string(),
            amount_cents: 250_00,
        }];
        let config = DamagesConfig::default();
        let first = calculate(&violations, &harm, 40, &config).unwrap();
        let second = calculate(&violations, &harm, 40, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_inputs_fail_loudly() {
        let config = DamagesConfig::default();
        assert!(matches!(
            calculate(&[], &[], 101, &config),
            Err(EngineError::CalculationInput(_))
        ));
        let negative_harm = vec![HarmItem {
            description: "bad".to_string(),
            amount_cents: -1,
        }];
        assert!(matches!(
            calculate(&[], &negative_harm, 0, &config),
            Err(EngineError::CalculationInput(_))
        ));
    }
}
