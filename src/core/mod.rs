//! Canonical data model for parsed credit reports and case analysis

pub mod errors;
pub mod types;

pub use errors::EngineError;
pub use types::{
    AccountStatus, AccountType, Bureau, ParseStatus, PaymentStatus, Provider, SectionKind,
    ViolationSection,
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of months every present payment-history grid must cover.
pub const HISTORY_MONTHS: usize = 24;

/// One parsed snapshot of a client's credit file from a single provider pull.
///
/// Immutable once parsed; a later pull supersedes it with a new report
/// rather than overwriting this one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreditReport {
    pub id: String,
    pub provider: Provider,
    pub captured_on: NaiveDate,
    /// SHA-256 of the raw source bytes; the blob itself is stored elsewhere
    /// and never mutated.
    pub raw_source_sha256: String,
    pub parse_status: ParseStatus,
    pub scores: Vec<BureauScore>,
    pub accounts: Vec<Account>,
    pub inquiries: Vec<Inquiry>,
    pub personal_info: Vec<PersonalInfoVariant>,
    /// Sections the adapter could not locate; their fields are absent, and
    /// their presence here is what demotes `parse_status` to `partial`.
    pub missing_sections: Vec<SectionKind>,
    /// Audit trail of same-bureau duplicate resolutions. Nothing is silently
    /// discarded during reconciliation.
    pub tie_breaks: Vec<TieBreak>,
}

impl CreditReport {
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }
}

/// A single bureau's score as captured on the report. At most one per
/// (report, bureau); `score` is absent when the vendor omitted or failed to
/// render it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BureauScore {
    pub bureau: Bureau,
    pub score: Option<u16>,
    pub captured_on: NaiveDate,
}

/// Canonical tradeline merged across bureaus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Deterministic id derived from the similarity key that grouped the
    /// underlying records.
    pub id: String,
    pub creditor: String,
    /// Last four digits of the account number; the full number never enters
    /// the model.
    pub last4: Option<String>,
    pub opened: Option<NaiveDate>,
    pub account_type: AccountType,
    /// Independently reported view per bureau. A bureau missing from this
    /// map did not report the account at all, which is distinct from a view
    /// reporting zero values.
    pub bureaus: BTreeMap<Bureau, BureauAccountView>,
}

impl Account {
    pub fn view(&self, bureau: Bureau) -> Option<&BureauAccountView> {
        self.bureaus.get(&bureau)
    }

    pub fn reporting_bureaus(&self) -> Vec<Bureau> {
        self.bureaus.keys().copied().collect()
    }
}

/// One bureau's independently reported state for an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BureauAccountView {
    pub status: AccountStatus,
    pub balance_cents: Option<i64>,
    /// Balance the furnisher reported at the moment of charge-off, when the
    /// vendor exposes it. Used to detect post-charge-off accrual.
    pub charge_off_balance_cents: Option<i64>,
    pub payment_rating: Option<String>,
    pub last_activity: Option<NaiveDate>,
    pub charged_off_on: Option<NaiveDate>,
    pub dispute_noted_on: Option<NaiveDate>,
    /// 24-month grid, oldest first, gapless by month. Months the bureau did
    /// not cover carry `unreported`.
    pub history: Vec<PaymentHistoryEntry>,
    /// Id of the raw extraction record this view came from, for audit
    /// lineage back to the source markup.
    pub source_record_id: String,
}

impl BureauAccountView {
    /// Checks the grid covers exactly [`HISTORY_MONTHS`] consecutive months.
    pub fn history_is_gapless(&self) -> bool {
        if self.history.len() != HISTORY_MONTHS {
            return false;
        }
        self.history.windows(2).all(|pair| {
            months_apart(pair[0].month, pair[1].month) == 1
        })
    }
}

fn months_apart(earlier: NaiveDate, later: NaiveDate) -> i32 {
    use chrono::Datelike;
    (later.year() - earlier.year()) * 12 + (later.month() as i32 - earlier.month() as i32)
}

/// One month of one bureau's payment grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    /// First day of the reported month.
    pub month: NaiveDate,
    pub status: PaymentStatus,
}

/// A hard inquiry as reported to one bureau. Two inquiries are the same
/// record only when (creditor, bureau, date) match exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    pub creditor: String,
    pub bureau: Bureau,
    pub date: NaiveDate,
    /// Inferred from context, not authoritative.
    pub permissible_purpose: bool,
}

/// Personal-information block as one bureau (or the vendor's combined
/// section) reported it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfoVariant {
    pub bureau: Option<Bureau>,
    pub names: Vec<String>,
    pub addresses: Vec<String>,
    pub ssn_last4: Option<String>,
}

/// Record of a same-bureau duplicate resolved during reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieBreak {
    pub account_id: String,
    pub bureau: Bureau,
    pub kept_record_id: String,
    pub discarded_record_id: String,
    pub reason: String,
}

/// A detected statutory-violation pattern. Immutable once created; re-runs
/// of the detector produce a new set rather than editing this one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub section: ViolationSection,
    /// Absent for report-level violations such as PII mismatches.
    pub account_id: Option<String>,
    pub bureaus: Vec<Bureau>,
    pub evidence: String,
    /// Willfulness contribution, 0-10.
    pub severity: u8,
}

/// Caller-supplied, already-quantified actual-harm line item. The damages
/// calculator aggregates these; it never invents harm figures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmItem {
    pub description: String,
    pub amount_cents: i64,
}

/// One scenario band of a damages estimate. All money is integer cents so
/// recomputation is bit-identical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagesBand {
    pub actual_cents: i64,
    pub statutory_cents: i64,
    pub punitive_cents: i64,
}

impl DamagesBand {
    pub fn total_cents(&self) -> i64 {
        self.actual_cents + self.statutory_cents + self.punitive_cents
    }
}

/// Deterministic damages estimate derived purely from a violation set,
/// harm items, and a willfulness score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamagesEstimate {
    pub conservative: DamagesBand,
    pub moderate: DamagesBand,
    pub aggressive: DamagesBand,
    /// Fee exposure estimate, outside the three bands.
    pub attorney_fee_cents: i64,
    pub willfulness_score: u8,
}

/// Standing-evidence flags supplied by the intake questionnaire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingInputs {
    pub dissemination: bool,
    pub concrete_harm: bool,
    pub causation: bool,
}

/// Recommendation tier derived from the total case score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Decline,
    Investigate,
    DemandLetter,
    Litigate,
}

/// Case-strength score. Derived from its inputs, recomputed on any change,
/// never hand-edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseScore {
    /// 0-3
    pub standing: u8,
    /// 0-4
    pub violation_quality: u8,
    /// 0-2
    pub willfulness: u8,
    /// 0-1
    pub documentation: u8,
    /// Clamped to 1-10 by construction.
    pub total: u8,
    pub settlement_probability_pct: u8,
    pub recommendation: Recommendation,
}

/// Full output of one analysis pass, versioned by (report id, analysis
/// timestamp).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseAnalysis {
    pub report: CreditReport,
    pub violations: Vec<Violation>,
    pub damages: DamagesEstimate,
    pub case_score: CaseScore,
    pub analyzed_at: DateTime<Utc>,
    pub engine_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn view_with_history(history: Vec<PaymentHistoryEntry>) -> BureauAccountView {
        BureauAccountView {
            status: AccountStatus::Open,
            balance_cents: Some(0),
            charge_off_balance_cents: None,
            payment_rating: None,
            last_activity: None,
            charged_off_on: None,
            dispute_noted_on: None,
            history,
            source_record_id: "test-0".to_string(),
        }
    }

    #[test]
    fn gapless_history_spans_year_boundary() {
        let mut entries = Vec::new();
        let mut cursor = month(2024, 3);
        for _ in 0..HISTORY_MONTHS {
            entries.push(PaymentHistoryEntry {
                month: cursor,
                status: PaymentStatus::Ok,
            });
            cursor = cursor
                .checked_add_months(chrono::Months::new(1))
                .unwrap();
        }
        assert!(view_with_history(entries).history_is_gapless());
    }

    #[test]
    fn gapped_history_is_rejected() {
        let mut entries: Vec<_> = (0..HISTORY_MONTHS as u32)
            .map(|i| PaymentHistoryEntry {
                month: month(2024, 1)
                    .checked_add_months(chrono::Months::new(i))
                    .unwrap(),
                status: PaymentStatus::Ok,
            })
            .collect();
        entries.remove(5);
        entries.push(PaymentHistoryEntry {
            month: month(2026, 6),
            status: PaymentStatus::Ok,
        });
        assert!(!view_with_history(entries).history_is_gapless());
    }

    #[test]
    fn damages_band_total_sums_subtotals() {
        let band = DamagesBand {
            actual_cents: 120_00,
            statutory_cents: 500_00,
            punitive_cents: 1_240_00,
        };
        assert_eq!(band.total_cents(), 1_860_00);
    }
}
