//! Pipeline orchestration: raw document bytes -> full case analysis
//!
//! A strict stage chain: adapter -> structural parser -> reconciler ->
//! violation detector -> damages calculator -> case scorer. Each stage
//! consumes only the previous stage's output; nothing reaches back into
//! raw markup. There is no shared mutable state, so independent reports
//! may be processed in parallel.

use crate::adapters::get_adapter;
use crate::config::EngineConfig;
use crate::core::errors::Result;
use crate::core::types::{ParseStatus, Provider};
use crate::core::{CaseAnalysis, CreditReport, HarmItem, StandingInputs};
use crate::{damages, extract, reconcile, scoring, violations};
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::info;

/// Caller-supplied context for one analysis pass. The analysis timestamp
/// comes from the caller so audit re-runs reproduce their output exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInputs {
    pub captured_on: NaiveDate,
    pub analyzed_at: DateTime<Utc>,
    pub harm_items: Vec<HarmItem>,
    pub standing: StandingInputs,
    pub willfulness_score: u8,
    pub documentation_complete: bool,
}

/// One unit of a batch run.
pub struct BatchItem<'a> {
    pub document: &'a [u8],
    pub provider: Provider,
    pub inputs: AnalysisInputs,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Parse a raw document into a canonical report.
///
/// Recoverable parse problems (missing sections) come back as a `partial`
/// report; fatal ones (wrong vendor shape, undecodable bytes) propagate as
/// errors with no partial account data, which [`ingest`] converts into a
/// `failed` report shell.
pub fn parse_report(
    document: &[u8],
    provider: Provider,
    captured_on: NaiveDate,
    config: &EngineConfig,
) -> Result<CreditReport> {
    let adapter = get_adapter(provider);
    let tree = adapter.parse_raw(document)?;
    let extraction = extract::extract(&tree, captured_on, &config.providers)?;
    let report = reconcile::merge(vec![extraction], sha256_hex(document))?;
    info!(
        report = %report.id,
        status = ?report.parse_status,
        accounts = report.accounts.len(),
        "report parsed"
    );
    Ok(report)
}

/// Ingest a raw document, always producing a report. Fatal parse errors
/// yield a `failed` shell that records the attempt; the parse status is
/// entered exactly once and never revisited.
pub fn ingest(
    document: &[u8],
    provider: Provider,
    captured_on: NaiveDate,
    config: &EngineConfig,
) -> CreditReport {
    match parse_report(document, provider, captured_on, config) {
        Ok(report) => report,
        Err(error) => {
            let sha = sha256_hex(document);
            info!(%provider, %error, "ingestion failed; recording failed report");
            CreditReport {
                id: format!("report-{provider}-{captured_on}-{}", &sha[..12]),
                provider,
                captured_on,
                raw_source_sha256: sha,
                parse_status: ParseStatus::Failed,
                scores: Vec::new(),
                accounts: Vec::new(),
                inquiries: Vec::new(),
                personal_info: Vec::new(),
                missing_sections: Vec::new(),
                tie_breaks: Vec::new(),
            }
        }
    }
}

/// Run the full chain on one document.
pub fn analyze_report(
    document: &[u8],
    provider: Provider,
    inputs: &AnalysisInputs,
    config: &EngineConfig,
) -> Result<CaseAnalysis> {
    let report = parse_report(document, provider, inputs.captured_on, config)?;
    analyze_parsed(report, inputs, config)
}

/// Run the analysis stages on an already-parsed report, e.g. a re-run
/// against a stored report for a new audit version.
pub fn analyze_parsed(
    report: CreditReport,
    inputs: &AnalysisInputs,
    config: &EngineConfig,
) -> Result<CaseAnalysis> {
    let violations = violations::detect(&report, &config.detector);
    let damages = damages::calculate(
        &violations,
        &inputs.harm_items,
        inputs.willfulness_score,
        &config.damages,
    )?;
    let case_score = scoring::score(
        &violations,
        &inputs.standing,
        inputs.willfulness_score,
        inputs.documentation_complete,
        &config.scoring,
    )?;
    Ok(CaseAnalysis {
        report,
        violations,
        damages,
        case_score,
        analyzed_at: inputs.analyzed_at,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Process independent reports in parallel. Each item is self-contained,
/// so ordering of completion does not affect any result.
pub fn analyze_batch(items: &[BatchItem<'_>], config: &EngineConfig) -> Vec<Result<CaseAnalysis>> {
    items
        .par_iter()
        .map(|item| analyze_report(item.document, item.provider, &item.inputs, config))
        .collect()
}
