//! End-to-end pipeline tests: raw vendor markup through case scoring.
//!
//! These exercise the public entry points only, the way the surrounding
//! application calls them: bytes in, a complete `CaseAnalysis` out.

use chrono::{NaiveDate, TimeZone, Utc};
use fcra_engine::{
    analyze_batch, analyze_report, ingest, AnalysisInputs, BatchItem, Bureau, EngineConfig,
    ParseStatus, Provider, Recommendation, SectionKind, StandingInputs, ViolationSection,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

/// IdentityIQ page with one tradeline Experian charged off at $0 and
/// Equifax reporting open with a balance, plus one purposeless inquiry.
const CONTRADICTION_PAGE: &str = indoc! {r#"
    <html><body>
    <p>IdentityIQ Credit Report</p>
    <h2>Credit Scores</h2>
    <table>
      <tr><td>TransUnion</td><td>641</td></tr>
      <tr><td>Experian</td><td>612</td></tr>
      <tr><td>Equifax</td><td>598</td></tr>
    </table>
    <h2>Account History</h2>
    <table>
      <tr><td>CAPITAL ONE</td></tr>
      <tr><td>Account #</td><td>****1234</td></tr>
      <tr><td></td><td>TransUnion</td><td>Experian</td><td>Equifax</td></tr>
      <tr><td>Account Status</td><td>--</td><td>Charged Off</td><td>Open</td></tr>
      <tr><td>Balance</td><td>--</td><td>$0</td><td>$1,178</td></tr>
      <tr><td>Date Opened</td><td>--</td><td>04/02/2019</td><td>04/02/2019</td></tr>
      <tr><td>Account Type</td><td>--</td><td>Revolving</td><td>Revolving</td></tr>
      <tr><td>Two-Year Payment History</td></tr>
      <tr><td>Experian</td><td>ok ok co co</td></tr>
      <tr><td>Equifax</td><td>ok ok ok ok</td></tr>
    </table>
    <h2>Inquiries</h2>
    <table>
      <tr><td>Creditor</td><td>Bureau</td><td>Date</td></tr>
      <tr><td>ACME BANK</td><td>Experian</td><td>03/15/2026</td><td>Credit Application</td></tr>
      <tr><td>SHADY LENDER</td><td>Equifax</td><td>04/01/2026</td></tr>
    </table>
    <h2>Personal Information</h2>
    <table>
      <tr><td>Name</td><td>JANE Q CONSUMER</td></tr>
      <tr><td>Address</td><td>12 ELM ST, SPRINGFIELD</td></tr>
      <tr><td>SSN</td><td>***-**-6789</td></tr>
    </table>
    </body></html>
"#};

fn inputs() -> AnalysisInputs {
    AnalysisInputs {
        captured_on: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        analyzed_at: Utc.with_ymd_and_hms(2026, 8, 29, 12, 0, 0).unwrap(),
        harm_items: Vec::new(),
        standing: StandingInputs {
            dissemination: true,
            concrete_harm: true,
            causation: true,
        },
        willfulness_score: 0,
        documentation_complete: true,
    }
}

#[test]
fn contradiction_page_produces_a_complete_analysis() {
    let config = EngineConfig::default();
    let analysis = analyze_report(
        CONTRADICTION_PAGE.as_bytes(),
        Provider::IdentityIq,
        &inputs(),
        &config,
    )
    .expect("full page should analyze");

    let report = &analysis.report;
    assert_eq!(report.parse_status, ParseStatus::Parsed);
    assert!(report.missing_sections.is_empty());
    assert_eq!(report.scores.len(), 3);

    // TransUnion column is all sentinels, so the merged tradeline carries
    // exactly the two bureaus that actually reported it.
    assert_eq!(report.accounts.len(), 1);
    let account = &report.accounts[0];
    assert_eq!(account.creditor, "CAPITAL ONE");
    assert_eq!(account.last4, Some("1234".to_string()));
    assert_eq!(
        account.reporting_bureaus(),
        vec![Bureau::Equifax, Bureau::Experian]
    );

    let accuracy: Vec<_> = analysis
        .violations
        .iter()
        .filter(|v| v.section == ViolationSection::Accuracy)
        .collect();
    assert_eq!(accuracy.len(), 1);
    assert_eq!(accuracy[0].bureaus, vec![Bureau::Equifax, Bureau::Experian]);
    assert_eq!(accuracy[0].account_id, Some(account.id.clone()));
    assert_eq!(accuracy[0].severity, 8);

    let purposeless: Vec<_> = analysis
        .violations
        .iter()
        .filter(|v| v.section == ViolationSection::PermissiblePurpose)
        .collect();
    assert_eq!(purposeless.len(), 1);
    assert_eq!(purposeless[0].bureaus, vec![Bureau::Equifax]);

    assert_eq!(analysis.violations.len(), 2);
}

#[test]
fn damages_and_score_follow_the_statutory_tables() {
    let config = EngineConfig::default();
    let analysis = analyze_report(
        CONTRADICTION_PAGE.as_bytes(),
        Provider::IdentityIq,
        &inputs(),
        &config,
    )
    .unwrap();

    // One $100-$1,000 band plus one fixed $1,000 impermissible pull.
    let damages = &analysis.damages;
    assert_eq!(damages.conservative.statutory_cents, 100_00 + 1_000_00);
    assert_eq!(damages.moderate.statutory_cents, 550_00 + 1_000_00);
    assert_eq!(damages.aggressive.statutory_cents, 1_000_00 + 1_000_00);
    // No harm items supplied and willfulness below the punitive threshold.
    assert_eq!(damages.moderate.actual_cents, 0);
    assert_eq!(damages.aggressive.punitive_cents, 0);
    // Two violations land in the base fee tier.
    assert_eq!(damages.attorney_fee_cents, 20 * 400_00);

    let score = &analysis.case_score;
    assert_eq!(score.standing, 3);
    assert_eq!(score.violation_quality, 2);
    assert_eq!(score.willfulness, 0);
    assert_eq!(score.documentation, 1);
    assert_eq!(score.total, 6);
    assert_eq!(score.recommendation, Recommendation::DemandLetter);
    assert_eq!(score.settlement_probability_pct, 55);
}

#[test]
fn reanalysis_of_the_same_document_is_identical() {
    let config = EngineConfig::default();
    let first = analyze_report(
        CONTRADICTION_PAGE.as_bytes(),
        Provider::IdentityIq,
        &inputs(),
        &config,
    )
    .unwrap();
    let second = analyze_report(
        CONTRADICTION_PAGE.as_bytes(),
        Provider::IdentityIq,
        &inputs(),
        &config,
    )
    .unwrap();
    assert_eq!(first, second);
}

#[test]
fn page_without_account_section_parses_partial() {
    let page = indoc! {r#"
        <html><body>
        <p>IdentityIQ Credit Report</p>
        <h2>Credit Scores</h2>
        <table>
          <tr><td>Equifax</td><td>598</td></tr>
        </table>
        <h2>Inquiries</h2>
        <table>
          <tr><td>ACME BANK</td><td>Experian</td><td>03/15/2026</td><td>Credit Application</td></tr>
        </table>
        <h2>Personal Information</h2>
        <table>
          <tr><td>Name</td><td>JANE Q CONSUMER</td></tr>
        </table>
        </body></html>
    "#};
    let config = EngineConfig::default();
    let analysis =
        analyze_report(page.as_bytes(), Provider::IdentityIq, &inputs(), &config).unwrap();
    assert_eq!(analysis.report.parse_status, ParseStatus::Partial);
    assert_eq!(
        analysis.report.missing_sections,
        vec![SectionKind::Accounts]
    );
    assert!(analysis.report.accounts.is_empty());
}

#[test]
fn per_bureau_identity_blocks_with_conflicting_ssn_yield_a_pii_violation() {
    // PrivacyGuard repeats its sections once per bureau, so the report
    // carries one identity variant per bureau block.
    let page = indoc! {r#"
        <html><body>
        <div class="heading">PrivacyGuard Triple-Bureau Report</div>
        <h2>Credit Score Summary</h2>
        <table>
          <tr><td>TransUnion</td><td>641</td></tr>
          <tr><td>Equifax</td><td>598</td></tr>
        </table>
        <h2>Personal Data</h2>
        <table>
          <tr><td>TransUnion</td></tr>
          <tr><td>Name</td><td>JANE Q CONSUMER</td></tr>
          <tr><td>SSN</td><td>***-**-6789</td></tr>
        </table>
        <table>
          <tr><td>Equifax</td></tr>
          <tr><td>Name</td><td>JANE Q CONSUMER</td></tr>
          <tr><td>SSN</td><td>***-**-1234</td></tr>
        </table>
        </body></html>
    "#};
    let config = EngineConfig::default();
    let analysis =
        analyze_report(page.as_bytes(), Provider::PrivacyGuard, &inputs(), &config).unwrap();

    assert_eq!(analysis.report.personal_info.len(), 2);
    assert_eq!(analysis.violations.len(), 1);
    let violation = &analysis.violations[0];
    assert_eq!(violation.section, ViolationSection::Pii);
    // Report-level: no account involved.
    assert_eq!(violation.account_id, None);
    assert_eq!(violation.bureaus, vec![Bureau::Equifax, Bureau::TransUnion]);
}

#[test]
fn wrong_vendor_page_is_recorded_as_failed_never_guessed() {
    let config = EngineConfig::default();
    let captured = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    // A SmartCredit-shaped page submitted under the IdentityIQ hint must
    // fail, not fall through to a different adapter.
    let report = ingest(
        b"<html><body><p>SmartCredit</p><h2>Accounts</h2></body></html>",
        Provider::IdentityIq,
        captured,
        &config,
    );
    assert_eq!(report.parse_status, ParseStatus::Failed);
    assert!(report.accounts.is_empty());
    assert_eq!(report.provider, Provider::IdentityIq);
}

#[test]
fn batch_results_keep_input_order_and_independence() {
    let config = EngineConfig::default();
    let items = vec![
        BatchItem {
            document: CONTRADICTION_PAGE.as_bytes(),
            provider: Provider::IdentityIq,
            inputs: inputs(),
        },
        BatchItem {
            document: b"<html><body><h1>Welcome back</h1></body></html>",
            provider: Provider::IdentityIq,
            inputs: inputs(),
        },
        BatchItem {
            document: CONTRADICTION_PAGE.as_bytes(),
            provider: Provider::IdentityIq,
            inputs: inputs(),
        },
    ];
    let results = analyze_batch(&items, &config);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    // A failing item never contaminates its neighbors.
    assert_eq!(
        results[0].as_ref().unwrap(),
        results[2].as_ref().unwrap()
    );
}
