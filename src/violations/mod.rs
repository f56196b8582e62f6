//! Forensic rule catalog: canonical report -> statutory violation set
//!
//! Every rule is a pure function of the report and the detector config.
//! Rules never read each other's output, so the catalog can run in any
//! order and produce the same set; `detect` sorts the combined result so
//! the emitted order is deterministic as well.

use crate::config::DetectorConfig;
use crate::core::types::{AccountStatus, Bureau, ViolationSection};
use crate::core::{Account, BureauAccountView, CreditReport, Violation};

/// Severity assigned per rule, on the 0-10 willfulness-contribution scale.
const SEVERITY_CROSS_BUREAU: u8 = 8;
const SEVERITY_CHARGE_OFF_BALANCE: u8 = 6;
const SEVERITY_STALE_DISPUTE: u8 = 5;
const SEVERITY_UNVERIFIABLE_LATE: u8 = 4;
const SEVERITY_IMPERMISSIBLE_INQUIRY: u8 = 3;
const SEVERITY_PII_MISMATCH: u8 = 2;

pub type Rule = fn(&CreditReport, &DetectorConfig) -> Vec<Violation>;

/// The full catalog. Names are stable identifiers for logging and tests.
pub fn rule_catalog() -> Vec<(&'static str, Rule)> {
    vec![
        ("cross_bureau_impossibility", cross_bureau_impossibility),
        ("unverifiable_late_payment", unverifiable_late_payment),
        ("charge_off_balance_inconsistency", charge_off_balance_inconsistency),
        ("stale_dispute", stale_dispute),
        ("impermissible_inquiry", impermissible_inquiry),
        ("pii_mismatch", pii_mismatch),
    ]
}

/// Run every rule and return the combined set in deterministic order.
pub fn detect(report: &CreditReport, config: &DetectorConfig) -> Vec<Violation> {
    let mut violations: Vec<Violation> = rule_catalog()
        .into_iter()
        .flat_map(|(_, rule)| rule(report, config))
        .collect();
    violations.sort();
    violations.dedup_by(|a, b| a.id == b.id);
    violations
}

fn account_violation(
    account: &Account,
    section: ViolationSection,
    bureaus: Vec<Bureau>,
    slug: &str,
    evidence: String,
    severity: u8,
) -> Violation {
    Violation {
        id: format!("{}-{}-{slug}", section.tag(), account.id),
        section,
        account_id: Some(account.id.clone()),
        bureaus,
        evidence,
        severity,
    }
}

/// Two bureaus reporting mutually exclusive states for the same account:
/// one a written-off debt, the other an account open and in good standing.
/// One violation per offending bureau pair.
fn cross_bureau_impossibility(report: &CreditReport, _config: &DetectorConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for account in &report.accounts {
        let views: Vec<(&Bureau, &BureauAccountView)> = account.bureaus.iter().collect();
        for i in 0..views.len() {
            for j in (i + 1)..views.len() {
                let (first_bureau, first) = views[i];
                let (second_bureau, second) = views[j];
                let pair = if first.status.is_derogatory() && second.status.is_current() {
                    Some(((first_bureau, first), (second_bureau, second)))
                } else if second.status.is_derogatory() && first.status.is_current() {
                    Some(((second_bureau, second), (first_bureau, first)))
                } else {
                    None
                };
                let Some(((derog_bureau, derog), (current_bureau, current))) = pair else {
                    continue;
                };
                let mut bureaus = vec![*derog_bureau, *current_bureau];
                bureaus.sort();
                violations.push(account_violation(
                    account,
                    ViolationSection::Accuracy,
                    bureaus,
                    &format!(
                        "pair-{}-{}",
                        derog_bureau.display_name().to_lowercase(),
                        current_bureau.display_name().to_lowercase()
                    ),
                    format!(
                        "{creditor}: {derog_bureau} reports {derog_status:?} with balance {derog_balance}, while {current_bureau} reports {current_status:?} with balance {current_balance}; both states cannot be true of the same account",
                        creditor = account.creditor,
                        derog_status = derog.status,
                        derog_balance = fmt_cents(derog.balance_cents),
                        current_status = current.status,
                        current_balance = fmt_cents(current.balance_cents),
                    ),
                    SEVERITY_CROSS_BUREAU,
                ));
            }
        }
    }
    violations
}

/// A 30/60/90 mark whose following month shows no consequence at all (the
/// grid snaps straight back to current). A furnisher with documentary
/// proof of the delinquency would show an escalation or a sustained mark.
fn unverifiable_late_payment(report: &CreditReport, _config: &DetectorConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for account in &report.accounts {
        for (bureau, view) in &account.bureaus {
            for window in view.history.windows(2) {
                let (entry, next) = (window[0], window[1]);
                if !entry.status.is_late() {
                    continue;
                }
                if next.status.delinquency_rank() == 0 {
                    violations.push(account_violation(
                        account,
                        ViolationSection::FurnisherDuty,
                        vec![*bureau],
                        &format!(
                            "late-{}-{}",
                            bureau.display_name().to_lowercase(),
                            entry.month.format("%Y-%m")
                        ),
                        format!(
                            "{creditor}: {bureau} reports {status:?} for {month} with no escalation or consequence in the following month, suggesting the furnisher lacks documentation for the delinquency",
                            creditor = account.creditor,
                            status = entry.status,
                            month = entry.month.format("%B %Y"),
                        ),
                        SEVERITY_UNVERIFIABLE_LATE,
                    ));
                }
            }
        }
    }
    violations
}

/// A charged-off account whose reported balance grew past the balance at
/// charge-off. Charged-off balances do not accrue.
fn charge_off_balance_inconsistency(
    report: &CreditReport,
    _config: &DetectorConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for account in &report.accounts {
        for (bureau, view) in &account.bureaus {
            let (Some(balance), Some(at_charge_off)) =
                (view.balance_cents, view.charge_off_balance_cents)
            else {
                continue;
            };
            if view.status == AccountStatus::ChargedOff && balance > at_charge_off {
                violations.push(account_violation(
                    account,
                    ViolationSection::Accuracy,
                    vec![*bureau],
                    &format!("co-balance-{}", bureau.display_name().to_lowercase()),
                    format!(
                        "{creditor}: {bureau} reports a charged-off balance of {balance} against {original} at charge-off; a charged-off balance cannot grow",
                        creditor = account.creditor,
                        balance = fmt_cents(Some(balance)),
                        original = fmt_cents(Some(at_charge_off)),
                    ),
                    SEVERITY_CHARGE_OFF_BALANCE,
                ));
            }
        }
    }
    violations
}

/// A dispute notation older than the reinvestigation window with the
/// account still carrying it unresolved.
fn stale_dispute(report: &CreditReport, config: &DetectorConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    for account in &report.accounts {
        for (bureau, view) in &account.bureaus {
            let Some(noted_on) = view.dispute_noted_on else {
                continue;
            };
            let age_days = (report.captured_on - noted_on).num_days();
            if age_days > config.stale_dispute_days {
                violations.push(account_violation(
                    account,
                    ViolationSection::Investigation,
                    vec![*bureau],
                    &format!("stale-{}", bureau.display_name().to_lowercase()),
                    format!(
                        "{creditor}: dispute noted with {bureau} on {noted_on} is {age_days} days old with no recorded status change, exceeding the {limit}-day reinvestigation window",
                        creditor = account.creditor,
                        limit = config.stale_dispute_days,
                    ),
                    SEVERITY_STALE_DISPUTE,
                ));
            }
        }
    }
    violations
}

/// A hard inquiry with no inferable permissible purpose.
fn impermissible_inquiry(report: &CreditReport, _config: &DetectorConfig) -> Vec<Violation> {
    report
        .inquiries
        .iter()
        .filter(|inquiry| !inquiry.permissible_purpose)
        .map(|inquiry| Violation {
            id: format!(
                "permissible-purpose-{}-{}-{}",
                slugify(&inquiry.creditor),
                inquiry.bureau.display_name().to_lowercase(),
                inquiry.date,
            ),
            section: ViolationSection::PermissiblePurpose,
            account_id: None,
            bureaus: vec![inquiry.bureau],
            evidence: format!(
                "hard inquiry by {creditor} on {bureau} dated {date} shows no permissible purpose",
                creditor = inquiry.creditor,
                bureau = inquiry.bureau,
                date = inquiry.date,
            ),
            severity: SEVERITY_IMPERMISSIBLE_INQUIRY,
        })
        .collect()
}

/// Conflicting identity data across the report's personal-info blocks.
fn pii_mismatch(report: &CreditReport, _config: &DetectorConfig) -> Vec<Violation> {
    let mut violations = Vec::new();
    let bureaus: Vec<Bureau> = {
        let mut list: Vec<Bureau> = report
            .personal_info
            .iter()
            .filter_map(|variant| variant.bureau)
            .collect();
        list.sort();
        list.dedup();
        list
    };

    let mut ssn_values: Vec<&String> = report
        .personal_info
        .iter()
        .filter_map(|variant| variant.ssn_last4.as_ref())
        .collect();
    ssn_values.sort();
    ssn_values.dedup();
    if ssn_values.len() > 1 {
        violations.push(Violation {
            id: format!("pii-{}-ssn", report.id),
            section: ViolationSection::Pii,
            account_id: None,
            bureaus: bureaus.clone(),
            evidence: format!(
                "{} different SSN last-four values appear across the report's identity blocks",
                ssn_values.len()
            ),
            severity: SEVERITY_PII_MISMATCH,
        });
    }

    let mut primary_names: Vec<String> = report
        .personal_info
        .iter()
        .filter_map(|variant| variant.names.first())
        .map(|name| name.to_lowercase())
        .collect();
    primary_names.sort();
    primary_names.dedup();
    if primary_names.len() > 1 {
        violations.push(Violation {
            id: format!("pii-{}-name", report.id),
            section: ViolationSection::Pii,
            account_id: None,
            bureaus,
            evidence: format!(
                "{} different primary names appear across the report's identity blocks",
                primary_names.len()
            ),
            severity: SEVERITY_PII_MISMATCH,
        });
    }
    violations
}

fn fmt_cents(cents: Option<i64>) -> String {
    match cents {
        Some(value) => {
            let sign = if value < 0 { "-" } else { "" };
            format!("{sign}${}.{:02}", (value / 100).abs(), (value % 100).abs())
        }
        None => "unreported".to_string(),
    }
}

fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
