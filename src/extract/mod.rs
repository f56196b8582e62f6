//! Structural parser: labeled regions -> unmerged per-bureau raw records
//!
//! Pure extraction. Every function receives only the region it needs and
//! returns a value; no cursor or shared position survives between calls.
//! Missing optional fields become `None`, unknown vendor vocabulary maps
//! to explicit `Unknown` variants, and unparseable dates fail closed to
//! `None` with a log line. Nothing here fabricates a value that could be
//! mistaken for real data.

pub mod tables;

use crate::adapters::{Block, IntermediateTree, Region};
use crate::core::errors::Result;
use crate::core::types::{
    AccountStatus, AccountType, Bureau, PaymentStatus, Provider, SectionKind,
};
use crate::core::{PersonalInfoVariant, HISTORY_MONTHS};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tables::{FieldKind, ProviderTables, VendorTable};
use tracing::warn;

/// One bureau's score as found in the scores region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScore {
    pub bureau: Bureau,
    pub score: Option<u16>,
}

/// One bureau's rendition of one tradeline, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAccountRecord {
    /// Deterministic id in document order, kept for audit lineage.
    pub id: String,
    pub bureau: Bureau,
    pub creditor: String,
    pub account_last4: Option<String>,
    pub opened: Option<NaiveDate>,
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub balance_cents: Option<i64>,
    pub charge_off_balance_cents: Option<i64>,
    pub payment_rating: Option<String>,
    pub last_activity: Option<NaiveDate>,
    pub charged_off_on: Option<NaiveDate>,
    pub dispute_noted_on: Option<NaiveDate>,
    /// Exactly [`HISTORY_MONTHS`] codes, oldest first.
    pub history: Vec<PaymentStatus>,
}

/// One inquiry row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInquiry {
    pub creditor: String,
    pub bureau: Bureau,
    pub date: Option<NaiveDate>,
    pub permissible_purpose: bool,
}

/// Everything pulled from one document, still per-bureau and unmerged.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtraction {
    pub provider: Provider,
    pub captured_on: NaiveDate,
    pub scores: Vec<RawScore>,
    pub accounts: Vec<RawAccountRecord>,
    pub inquiries: Vec<RawInquiry>,
    pub personal_info: Vec<PersonalInfoVariant>,
    pub missing_sections: Vec<SectionKind>,
}

/// Extract raw records from an adapter's intermediate tree.
///
/// Sections the adapter reported missing are recovered as empty with the
/// kind recorded, which later demotes the report to `partial`.
pub fn extract(
    tree: &IntermediateTree,
    captured_on: NaiveDate,
    tables: &ProviderTables,
) -> Result<RawExtraction> {
    let provider = tree.provider;
    let table = tables.table(provider);

    let scores = match tree.region(SectionKind::Scores) {
        Ok(region) => extract_scores(region, provider),
        Err(_) => Vec::new(),
    };
    let accounts = match tree.region(SectionKind::Accounts) {
        Ok(region) => extract_accounts(region, provider, table),
        Err(_) => Vec::new(),
    };
    let inquiries = match tree.region(SectionKind::Inquiries) {
        Ok(region) => extract_inquiries(region, provider, table),
        Err(_) => Vec::new(),
    };
    let personal_info = match tree.region(SectionKind::PersonalInfo) {
        Ok(region) => extract_personal_info(region),
        Err(_) => Vec::new(),
    };

    Ok(RawExtraction {
        provider,
        captured_on,
        scores,
        accounts,
        inquiries,
        personal_info,
        missing_sections: tree.missing_sections().to_vec(),
    })
}

// --- scores ---------------------------------------------------------------

fn extract_scores(region: &Region, provider: Provider) -> Vec<RawScore> {
    let mut scores: Vec<RawScore> = Vec::new();
    for block in &region.blocks {
        for line in &block.lines {
            let cells = split_cells(line);
            let Some((label_idx, bureau)) = cells
                .iter()
                .enumerate()
                .find_map(|(i, cell)| Bureau::from_label(strip_score_suffix(cell)).map(|b| (i, b)))
            else {
                continue;
            };
            if scores.iter().any(|s| s.bureau == bureau) {
                warn!(%provider, %bureau, "duplicate score row ignored");
                continue;
            }
            let score = cells
                .iter()
                .skip(label_idx)
                .find_map(|cell| parse_score(cell));
            if score.is_none() {
                warn!(%provider, %bureau, %line, "score missing or out of range");
            }
            scores.push(RawScore { bureau, score });
        }
    }
    scores
}

fn strip_score_suffix(cell: &str) -> &str {
    let trimmed = cell.trim().trim_end_matches(':');
    trimmed
        .strip_suffix(" Score")
        .or_else(|| trimmed.strip_suffix(" score"))
        .unwrap_or(trimmed)
}

fn parse_score(cell: &str) -> Option<u16> {
    let digits: String = cell
        .split(':')
        .last()
        .unwrap_or(cell)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let value: u16 = digits.parse().ok()?;
    (300..=850).contains(&value).then_some(value)
}

// --- accounts -------------------------------------------------------------

/// Field values gathered for one bureau within one account block.
#[derive(Default, Clone)]
struct FieldSet {
    values: BTreeMap<FieldKind, String>,
    history: Vec<String>,
}

fn extract_accounts(
    region: &Region,
    provider: Provider,
    table: &VendorTable,
) -> Vec<RawAccountRecord> {
    let mut records = Vec::new();
    for block in &region.blocks {
        let parsed = match block.bureau {
            Some(bureau) => parse_single_bureau_block(block, bureau, table),
            None => parse_columnar_block(block, table),
        };
        let Some((creditor, field_sets)) = parsed else {
            continue;
        };
        for (bureau, fields) in field_sets {
            if fields.values.is_empty() && fields.history.is_empty() {
                // Bureau column present but entirely unreported: the bureau
                // does not carry this account. Absent, not zero.
                continue;
            }
            let seq = records.len();
            records.push(build_record(
                provider, seq, bureau, &creditor, fields, table,
            ));
        }
    }
    records
}

/// Columnar layout: one block per account, a header row naming the bureau
/// columns, field rows spanning all three.
fn parse_columnar_block(
    block: &Block,
    table: &VendorTable,
) -> Option<(String, Vec<(Bureau, FieldSet)>)> {
    let mut creditor: Option<String> = None;
    let mut columns: Vec<(Bureau, usize)> = Vec::new();
    let mut shared: BTreeMap<FieldKind, String> = BTreeMap::new();
    let mut per_bureau: BTreeMap<Bureau, FieldSet> = BTreeMap::new();
    let mut in_history = false;

    for line in &block.lines {
        let cells = split_cells(line);
        if in_history {
            if let Some(bureau) = Bureau::from_label(&cells[0]) {
                per_bureau.entry(bureau).or_default().history =
                    history_tokens(&cells[1..]);
            }
            continue;
        }
        if is_history_marker(line) {
            in_history = true;
            continue;
        }
        let bureau_cells: Vec<(usize, Bureau)> = cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| Bureau::from_label(cell).map(|b| (i, b)))
            .collect();
        if bureau_cells.len() >= 2 {
            columns = bureau_cells.into_iter().map(|(i, b)| (b, i)).collect();
            continue;
        }
        if let Some(kind) = lookup_field(table, &cells[0]) {
            if columns.is_empty() {
                // Field row before the bureau header applies to the whole
                // tradeline (typically the masked account number).
                if let Some(value) = cells.get(1).filter(|v| !is_sentinel(v)) {
                    shared.insert(kind, value.to_string());
                }
            } else {
                for (bureau, idx) in &columns {
                    if let Some(value) = cells.get(*idx).filter(|v| !is_sentinel(v)) {
                        per_bureau
                            .entry(*bureau)
                            .or_default()
                            .values
                            .insert(kind, value.to_string());
                    }
                }
            }
            continue;
        }
        if creditor.is_none() && !cells[0].is_empty() {
            creditor = Some(cells[0].to_string());
        }
    }

    let creditor = creditor?;
    let mut field_sets: Vec<(Bureau, FieldSet)> = Vec::new();
    for (bureau, mut fields) in per_bureau {
        for (kind, value) in &shared {
            fields.values.entry(*kind).or_insert_with(|| value.clone());
        }
        field_sets.push((bureau, fields));
    }
    Some((creditor, field_sets))
}

/// Per-bureau layout: the adapter already tagged the block's bureau; rows
/// are plain label/value pairs.
fn parse_single_bureau_block(
    block: &Block,
    bureau: Bureau,
    table: &VendorTable,
) -> Option<(String, Vec<(Bureau, FieldSet)>)> {
    let mut creditor: Option<String> = None;
    let mut fields = FieldSet::default();
    let mut in_history = false;

    for line in &block.lines {
        let cells = split_cells(line);
        if in_history {
            let tokens = if Bureau::from_label(&cells[0]).is_some() {
                history_tokens(&cells[1..])
            } else {
                history_tokens(&cells)
            };
            if !tokens.is_empty() {
                fields.history = tokens;
            }
            continue;
        }
        if is_history_marker(line) {
            in_history = true;
            continue;
        }
        if let Some(kind) = lookup_field(table, &cells[0]) {
            if let Some(value) = cells.get(1).filter(|v| !is_sentinel(v)) {
                fields.values.insert(kind, value.to_string());
            }
            continue;
        }
        if creditor.is_none() && !cells[0].is_empty() {
            creditor = Some(cells[0].to_string());
        }
    }

    let creditor = creditor?;
    Some((creditor, vec![(bureau, fields)]))
}

fn build_record(
    provider: Provider,
    seq: usize,
    bureau: Bureau,
    creditor: &str,
    fields: FieldSet,
    table: &VendorTable,
) -> RawAccountRecord {
    let get = |kind: FieldKind| fields.values.get(&kind).map(String::as_str);
    let status = get(FieldKind::Status)
        .map(|value| normalize_status(table, value, provider))
        .unwrap_or(AccountStatus::Unknown);
    RawAccountRecord {
        id: format!("raw-{provider}-{seq:03}-{}", bureau.display_name().to_lowercase()),
        bureau,
        creditor: creditor.to_string(),
        account_last4: get(FieldKind::AccountNumber).and_then(parse_last4),
        opened: get(FieldKind::Opened).and_then(|v| parse_date(table, v, provider)),
        account_type: get(FieldKind::AccountType)
            .map(parse_account_type)
            .unwrap_or(AccountType::Unknown),
        status,
        balance_cents: get(FieldKind::Balance).and_then(parse_money),
        charge_off_balance_cents: get(FieldKind::ChargeOffBalance).and_then(parse_money),
        payment_rating: get(FieldKind::PaymentRating).map(str::to_string),
        last_activity: get(FieldKind::LastActivity)
            .and_then(|v| parse_date(table, v, provider)),
        charged_off_on: get(FieldKind::ChargedOffOn)
            .and_then(|v| parse_date(table, v, provider)),
        dispute_noted_on: get(FieldKind::DisputeDate)
            .and_then(|v| parse_date(table, v, provider)),
        history: normalize_history(&fields.history, table, provider),
    }
}

fn is_history_marker(line: &str) -> bool {
    line.to_lowercase().contains("payment history")
}

fn history_tokens(cells: &[String]) -> Vec<String> {
    cells
        .iter()
        .flat_map(|cell| cell.split_whitespace())
        .map(str::to_string)
        .collect()
}

/// Normalize grid tokens and fit the grid to exactly 24 months, oldest
/// first: older months pad with `unreported`, anything longer keeps the
/// most recent 24.
fn normalize_history(
    tokens: &[String],
    table: &VendorTable,
    provider: Provider,
) -> Vec<PaymentStatus> {
    let mut grid: Vec<PaymentStatus> = tokens
        .iter()
        .map(|token| {
            let normalized = token.to_lowercase();
            match table.history_codes.get(&normalized) {
                Some(code) => *code,
                None => {
                    warn!(%provider, %token, "unknown payment-history token");
                    PaymentStatus::Unknown
                }
            }
        })
        .collect();
    if grid.len() > HISTORY_MONTHS {
        grid.drain(..grid.len() - HISTORY_MONTHS);
    }
    while grid.len() < HISTORY_MONTHS {
        grid.insert(0, PaymentStatus::Unreported);
    }
    grid
}

// --- inquiries ------------------------------------------------------------

const PERMISSIBLE_PURPOSES: &[&str] = &[
    "credit application",
    "account review",
    "preapproval",
    "pre-approval",
    "insurance underwriting",
    "tenant screening",
];

fn extract_inquiries(
    region: &Region,
    provider: Provider,
    table: &VendorTable,
) -> Vec<RawInquiry> {
    let mut inquiries = Vec::new();
    for block in &region.blocks {
        for line in &block.lines {
            let cells = split_cells(line);
            if cells.len() < 2 || is_inquiry_header(&cells) {
                continue;
            }
            let bureau = match block.bureau {
                Some(bureau) => bureau,
                None => match cells.iter().find_map(|c| Bureau::from_label(c)) {
                    Some(bureau) => bureau,
                    None => {
                        warn!(%provider, %line, "inquiry row without a bureau label");
                        continue;
                    }
                },
            };
            let date = cells
                .iter()
                .skip(1)
                .find_map(|cell| parse_date_quiet(table, cell));
            if date.is_none() {
                warn!(%provider, %line, "inquiry row without a parseable date");
            }
            let purpose = cells
                .iter()
                .skip(1)
                .map(|c| c.to_lowercase())
                .find(|c| PERMISSIBLE_PURPOSES.contains(&c.as_str()));
            inquiries.push(RawInquiry {
                creditor: cells[0].clone(),
                bureau,
                date,
                permissible_purpose: purpose.is_some(),
            });
        }
    }
    inquiries
}

fn is_inquiry_header(cells: &[String]) -> bool {
    let first = cells[0].to_lowercase();
    first == "creditor" || first == "company" || first == "requested by"
}

// --- personal info --------------------------------------------------------

fn extract_personal_info(region: &Region) -> Vec<PersonalInfoVariant> {
    let mut variants = Vec::new();
    for block in &region.blocks {
        let mut variant = PersonalInfoVariant {
            bureau: block.bureau,
            names: Vec::new(),
            addresses: Vec::new(),
            ssn_last4: None,
        };
        for line in &block.lines {
            let cells = split_cells(line);
            let (label, value) = match cells.len() {
                0 | 1 => match cells.first().and_then(|c| c.split_once(':')) {
                    Some((l, v)) => (l.trim().to_lowercase(), v.trim().to_string()),
                    None => continue,
                },
                _ => (normalize_label(&cells[0]), cells[1].clone()),
            };
            if is_sentinel(&value) {
                continue;
            }
            if label.contains("name") {
                if !variant.names.contains(&value) {
                    variant.names.push(value);
                }
            } else if label.contains("address") {
                if !variant.addresses.contains(&value) {
                    variant.addresses.push(value);
                }
            } else if label.contains("ssn") || label.contains("social security") {
                let digits: String =
                    value.chars().filter(|c| c.is_ascii_digit()).collect();
                if digits.len() >= 4 {
                    variant.ssn_last4 = Some(digits[digits.len() - 4..].to_string());
                }
            }
        }
        if !variant.names.is_empty()
            || !variant.addresses.is_empty()
            || variant.ssn_last4.is_some()
        {
            variants.push(variant);
        }
    }
    variants
}

// --- shared value parsing -------------------------------------------------

fn split_cells(line: &str) -> Vec<String> {
    line.split('\t').map(|cell| cell.trim().to_string()).collect()
}

fn normalize_label(cell: &str) -> String {
    cell.trim().trim_end_matches(':').to_lowercase()
}

fn lookup_field(table: &VendorTable, cell: &str) -> Option<FieldKind> {
    table.field_labels.get(&normalize_label(cell)).copied()
}

fn is_sentinel(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "" | "-" | "--" | "n/a" | "na" | "not reported" | "nr" | "no data"
    )
}

fn normalize_status(table: &VendorTable, value: &str, provider: Provider) -> AccountStatus {
    let normalized = value.trim().to_lowercase();
    match table.account_status.get(&normalized) {
        Some(status) => *status,
        None => {
            warn!(%provider, value, "unknown account status wording");
            AccountStatus::Unknown
        }
    }
}

/// Try the provider's ordered date formats; fail closed to `None`.
fn parse_date(table: &VendorTable, value: &str, provider: Provider) -> Option<NaiveDate> {
    let parsed = parse_date_quiet(table, value);
    if parsed.is_none() {
        warn!(%provider, value, "date did not match any known format");
    }
    parsed
}

fn parse_date_quiet(table: &VendorTable, value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if is_sentinel(trimmed) {
        return None;
    }
    for format in &table.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
        // month/year formats need a synthesized first-of-month day
        if format.contains("%m") && !format.contains("%d") {
            if let Ok(date) =
                NaiveDate::parse_from_str(&format!("01/{trimmed}"), &format!("%d/{format}"))
            {
                return Some(date);
            }
        }
    }
    None
}

fn parse_money(value: &str) -> Option<i64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    let negative = cleaned.starts_with('-');
    let unsigned = cleaned.trim_start_matches('-');
    let (dollars, cents) = match unsigned.split_once('.') {
        Some((d, c)) => {
            let mut fraction = c.to_string();
            fraction.truncate(2);
            while fraction.len() < 2 {
                fraction.push('0');
            }
            (d, fraction)
        }
        None => (unsigned, "00".to_string()),
    };
    let dollars: i64 = if dollars.is_empty() {
        0
    } else {
        dollars.parse().ok()?
    };
    let cents: i64 = cents.parse().ok()?;
    let total = dollars * 100 + cents;
    Some(if negative { -total } else { total })
}

fn parse_last4(value: &str) -> Option<String> {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    Some(digits[digits.len() - 4..].iter().collect())
}

fn parse_account_type(value: &str) -> AccountType {
    let normalized = value.to_lowercase();
    if normalized.contains("collection") {
        AccountType::Collection
    } else if normalized.contains("mortgage") || normalized.contains("real estate") {
        AccountType::Mortgage
    } else if normalized.contains("revolving") || normalized.contains("credit card") {
        AccountType::Revolving
    } else if normalized.contains("installment")
        || normalized.contains("auto")
        || normalized.contains("student")
    {
        AccountType::Installment
    } else {
        AccountType::Unknown
    }
}
