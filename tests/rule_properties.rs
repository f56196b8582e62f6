//! Property tests for the analysis stages: rule-order independence,
//! damages determinism, and score-range guarantees.

use chrono::{Months, NaiveDate};
use fcra_engine::{
    damages, scoring, violations, Account, AccountStatus, AccountType, Bureau, BureauAccountView,
    CreditReport, EngineConfig, HarmItem, ParseStatus, PaymentHistoryEntry, PaymentStatus,
    Provider, StandingInputs, Violation, ViolationSection, HISTORY_MONTHS,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn capture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

fn history(marks: &[(usize, PaymentStatus)]) -> Vec<PaymentHistoryEntry> {
    let capture = capture_date();
    let mut grid: Vec<PaymentHistoryEntry> = (0..HISTORY_MONTHS)
        .map(|idx| PaymentHistoryEntry {
            month: capture
                .checked_sub_months(Months::new((HISTORY_MONTHS - 1 - idx) as u32))
                .unwrap(),
            status: PaymentStatus::Ok,
        })
        .collect();
    for (idx, status) in marks {
        grid[*idx].status = *status;
    }
    grid
}

fn view(
    record_id: &str,
    status: AccountStatus,
    balance_cents: Option<i64>,
    marks: &[(usize, PaymentStatus)],
) -> BureauAccountView {
    BureauAccountView {
        status,
        balance_cents,
        charge_off_balance_cents: None,
        payment_rating: None,
        last_activity: None,
        charged_off_on: None,
        dispute_noted_on: None,
        history: history(marks),
        source_record_id: record_id.to_string(),
    }
}

/// A report exercising several rules at once: a cross-bureau contradiction,
/// an isolated late mark, and a stale dispute.
fn busy_report() -> CreditReport {
    let mut bureaus = BTreeMap::new();
    bureaus.insert(
        Bureau::Experian,
        view("r1", AccountStatus::ChargedOff, Some(0), &[]),
    );
    bureaus.insert(
        Bureau::Equifax,
        view("r2", AccountStatus::Open, Some(117_800), &[]),
    );
    let mut disputed = view(
        "r3",
        AccountStatus::Disputed,
        Some(31_000),
        &[(10, PaymentStatus::Late30)],
    );
    disputed.dispute_noted_on = capture_date().checked_sub_days(chrono::Days::new(60));
    let mut tu = BTreeMap::new();
    tu.insert(Bureau::TransUnion, disputed);

    CreditReport {
        id: "report-prop".to_string(),
        provider: Provider::IdentityIq,
        captured_on: capture_date(),
        raw_source_sha256: "feedface".to_string(),
        parse_status: ParseStatus::Parsed,
        scores: Vec::new(),
        accounts: vec![
            Account {
                id: "acct-contradiction".to_string(),
                creditor: "CAPITAL ONE".to_string(),
                last4: Some("1234".to_string()),
                opened: NaiveDate::from_ymd_opt(2019, 4, 2),
                account_type: AccountType::Revolving,
                bureaus,
            },
            Account {
                id: "acct-disputed".to_string(),
                creditor: "FIRST PREMIER".to_string(),
                last4: Some("8861".to_string()),
                opened: NaiveDate::from_ymd_opt(2021, 1, 15),
                account_type: AccountType::Revolving,
                bureaus: tu,
            },
        ],
        inquiries: Vec::new(),
        personal_info: Vec::new(),
        missing_sections: Vec::new(),
        tie_breaks: Vec::new(),
    }
}

fn violation(id: &str, section: ViolationSection, severity: u8) -> Violation {
    Violation {
        id: id.to_string(),
        section,
        account_id: None,
        bureaus: vec![Bureau::Experian],
        evidence: "synthetic".to_string(),
        severity,
    }
}

proptest! {
    #[test]
    fn detect_is_invariant_under_rule_permutation(
        order in Just((0..violations::rule_catalog().len()).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let report = busy_report();
        let config = EngineConfig::default();
        let catalog = violations::rule_catalog();

        let mut permuted: Vec<Violation> = order
            .iter()
            .flat_map(|idx| (catalog[*idx].1)(&report, &config.detector))
            .collect();
        permuted.sort();
        permuted.dedup_by(|a, b| a.id == b.id);

        let canonical = violations::detect(&report, &config.detector);
        prop_assert_eq!(permuted, canonical);
    }

    #[test]
    fn damages_are_deterministic_and_band_ordered(
        willfulness in 0u8..=100,
        harm_amounts in proptest::collection::vec(0i64..1_000_000, 0..5)
    ) {
        let config = EngineConfig::default();
        let violations = vec![
            violation("v1", ViolationSection::Accuracy, 8),
            violation("v2", ViolationSection::Investigation, 5),
            violation("v3", ViolationSection::PermissiblePurpose, 3),
        ];
        let harm: Vec<HarmItem> = harm_amounts
            .iter()
            .map(|amount| HarmItem {
                description: "lost deposit".to_string(),
                amount_cents: *amount,
            })
            .collect();

        let first = damages::calculate(&violations, &harm, willfulness, &config.damages).unwrap();
        let second = damages::calculate(&violations, &harm, willfulness, &config.damages).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert!(first.conservative.total_cents() <= first.moderate.total_cents());
        prop_assert!(first.moderate.total_cents() <= first.aggressive.total_cents());
        // Punitive damages appear only at or above the configured threshold.
        if willfulness < config.damages.punitive_threshold {
            prop_assert_eq!(first.aggressive.punitive_cents, 0);
        }
    }

    #[test]
    fn case_score_total_stays_in_range(
        dissemination in any::<bool>(),
        concrete_harm in any::<bool>(),
        causation in any::<bool>(),
        documented in any::<bool>(),
        willfulness in 0u8..=100,
        violation_count in 0usize..12
    ) {
        let config = EngineConfig::default();
        let violations: Vec<Violation> = (0..violation_count)
            .map(|i| violation(&format!("v{i}"), ViolationSection::Accuracy, 8))
            .collect();
        let standing = StandingInputs { dissemination, concrete_harm, causation };

        let score = scoring::score(&violations, &standing, willfulness, documented, &config.scoring)
            .unwrap();
        prop_assert!((1..=10).contains(&score.total));
        prop_assert_eq!(
            score.settlement_probability_pct,
            config.scoring.settlement_table[usize::from(score.total) - 1]
        );
    }
}

#[test]
fn overrange_willfulness_fails_loudly_everywhere() {
    let config = EngineConfig::default();
    assert!(damages::calculate(&[], &[], 101, &config.damages).is_err());
    assert!(scoring::score(
        &[],
        &StandingInputs::default(),
        101,
        false,
        &config.scoring
    )
    .is_err());
}
