//! Cross-bureau reconciler: raw per-bureau records -> canonical report
//!
//! Grouping is by similarity key only. Records that match no key stay
//! singleton accounts: a false merge would corrupt the cross-bureau
//! contradiction evidence the violation detector depends on, so forced
//! merging is never attempted.

use crate::core::errors::Result;
use crate::core::types::{AccountType, Bureau, ParseStatus, Provider, SectionKind};
use crate::core::{
    Account, BureauAccountView, BureauScore, CreditReport, Inquiry, PaymentHistoryEntry,
    TieBreak, HISTORY_MONTHS,
};
use crate::extract::{RawAccountRecord, RawExtraction};
use chrono::{Months, NaiveDate};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

/// SHA-256 fingerprint over the normalized creditor and the last four
/// account digits. The full account number never reaches this function.
pub fn account_fingerprint(creditor: &str, last4: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_creditor(creditor).as_bytes());
    hasher.update(b"|");
    hasher.update(last4.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")[..16].to_string()
}

fn normalize_creditor(creditor: &str) -> String {
    creditor
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Similarity key for grouping: fingerprint when the masked number is
/// present, otherwise creditor + opened date + account type.
fn similarity_key(record: &RawAccountRecord) -> String {
    match &record.account_last4 {
        Some(last4) => format!("fp-{}", account_fingerprint(&record.creditor, last4)),
        None => format!(
            "fb-{}-{}-{:?}",
            normalize_creditor(&record.creditor),
            record
                .opened
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unopened".to_string()),
            record.account_type,
        ),
    }
}

/// Merge one or more extractions into a canonical report.
///
/// Guarantee: every input record lands in exactly one account's bureau map,
/// or in the tie-break audit trail. Nothing is lost or duplicated.
pub fn merge(extractions: Vec<RawExtraction>, raw_source_sha256: String) -> Result<CreditReport> {
    let provider = extractions
        .first()
        .map(|e| e.provider)
        .unwrap_or(Provider::IdentityIq);
    let captured_on = extractions
        .first()
        .map(|e| e.captured_on)
        .unwrap_or_default();

    let mut missing_sections: Vec<SectionKind> = Vec::new();
    let mut scores: Vec<BureauScore> = Vec::new();
    let mut inquiries: Vec<Inquiry> = Vec::new();
    let mut personal_info = Vec::new();
    let mut grouped: BTreeMap<String, Vec<RawAccountRecord>> = BTreeMap::new();

    for extraction in extractions {
        for kind in extraction.missing_sections {
            if !missing_sections.contains(&kind) {
                missing_sections.push(kind);
            }
        }
        for raw in extraction.scores {
            // At most one score per bureau; first capture wins.
            if !scores.iter().any(|s| s.bureau == raw.bureau) {
                scores.push(BureauScore {
                    bureau: raw.bureau,
                    score: raw.score,
                    captured_on: extraction.captured_on,
                });
            }
        }
        for raw in extraction.inquiries {
            let Some(date) = raw.date else {
                continue;
            };
            let inquiry = Inquiry {
                creditor: raw.creditor,
                bureau: raw.bureau,
                date,
                permissible_purpose: raw.permissible_purpose,
            };
            // Identity is exactly (creditor, bureau, date).
            if !inquiries.iter().any(|i| {
                i.creditor == inquiry.creditor
                    && i.bureau == inquiry.bureau
                    && i.date == inquiry.date
            }) {
                inquiries.push(inquiry);
            }
        }
        personal_info.extend(extraction.personal_info);
        for record in extraction.accounts {
            grouped.entry(similarity_key(&record)).or_default().push(record);
        }
    }

    let mut accounts = Vec::new();
    let mut tie_breaks = Vec::new();
    for (key, records) in grouped {
        let account_id = format!("acct-{key}");
        let account = build_account(account_id, records, captured_on, &mut tie_breaks);
        accounts.push(account);
    }
    accounts.sort_by(|a, b| a.id.cmp(&b.id));
    scores.sort_by_key(|s| s.bureau);
    inquiries.sort_by(|a, b| {
        (&a.creditor, a.bureau, a.date).cmp(&(&b.creditor, b.bureau, b.date))
    });

    let parse_status = if missing_sections.is_empty() {
        ParseStatus::Parsed
    } else {
        ParseStatus::Partial
    };

    Ok(CreditReport {
        id: format!(
            "report-{provider}-{captured_on}-{}",
            &raw_source_sha256[..raw_source_sha256.len().min(12)]
        ),
        provider,
        captured_on,
        raw_source_sha256,
        parse_status,
        scores,
        accounts,
        inquiries,
        personal_info,
        missing_sections,
        tie_breaks,
    })
}

fn build_account(
    account_id: String,
    records: Vec<RawAccountRecord>,
    captured_on: NaiveDate,
    tie_breaks: &mut Vec<TieBreak>,
) -> Account {
    let creditor = records[0].creditor.clone();
    let last4 = records.iter().find_map(|r| r.account_last4.clone());
    let opened = records.iter().filter_map(|r| r.opened).min();
    let account_type = records
        .iter()
        .map(|r| r.account_type)
        .find(|t| *t != AccountType::Unknown)
        .unwrap_or(AccountType::Unknown);

    // Group same-bureau duplicates for the documented tie-break: the more
    // recent date of last activity wins; the loser is kept in the audit
    // trail rather than silently vanished.
    let mut per_bureau: BTreeMap<Bureau, Vec<RawAccountRecord>> = BTreeMap::new();
    for record in records {
        per_bureau.entry(record.bureau).or_default().push(record);
    }

    let mut bureaus = BTreeMap::new();
    for (bureau, mut candidates) in per_bureau {
        let winner_idx = pick_winner(&candidates);
        let winner = candidates.remove(winner_idx);
        for loser in candidates {
            debug!(
                account = %account_id,
                %bureau,
                kept = %winner.id,
                discarded = %loser.id,
                "same-bureau duplicate resolved by last-activity tie-break"
            );
            tie_breaks.push(TieBreak {
                account_id: account_id.clone(),
                bureau,
                kept_record_id: winner.id.clone(),
                discarded_record_id: loser.id,
                reason: "more recent date of last activity preferred".to_string(),
            });
        }
        bureaus.insert(bureau, build_view(winner, captured_on));
    }

    Account {
        id: account_id,
        creditor,
        last4,
        opened,
        account_type,
        bureaus,
    }
}

/// Index of the record with the most recent last activity; records without
/// one lose to records with one, and a full tie keeps document order.
fn pick_winner(candidates: &[RawAccountRecord]) -> usize {
    let mut winner = 0;
    for (idx, candidate) in candidates.iter().enumerate().skip(1) {
        if candidate.last_activity > candidates[winner].last_activity {
            winner = idx;
        }
    }
    winner
}

fn build_view(record: RawAccountRecord, captured_on: NaiveDate) -> BureauAccountView {
    BureauAccountView {
        status: record.status,
        balance_cents: record.balance_cents,
        charge_off_balance_cents: record.charge_off_balance_cents,
        payment_rating: record.payment_rating,
        last_activity: record.last_activity,
        charged_off_on: record.charged_off_on,
        dispute_noted_on: record.dispute_noted_on,
        history: date_history(&record.history, captured_on),
        source_record_id: record.id,
    }
}

/// Assign calendar months to the 24-code grid, oldest first, ending at the
/// capture month.
fn date_history(
    codes: &[crate::core::PaymentStatus],
    captured_on: NaiveDate,
) -> Vec<PaymentHistoryEntry> {
    let capture_month = first_of_month(captured_on);
    codes
        .iter()
        .enumerate()
        .map(|(idx, status)| {
            let back = (HISTORY_MONTHS - 1 - idx) as u32;
            PaymentHistoryEntry {
                month: capture_month
                    .checked_sub_months(Months::new(back))
                    .unwrap_or(capture_month),
                status: *status,
            }
        })
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    use chrono::Datelike;
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}
