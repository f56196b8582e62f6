//! Configuration-file tests: TOML overrides flowing through detection.

use chrono::NaiveDate;
use fcra_engine::{
    parse_report, violations, Bureau, EngineConfig, ParseStatus, Provider, ViolationSection,
};
use indoc::indoc;
use std::io::Write;
use tempfile::NamedTempFile;

/// Page with a dispute noted 50 days before the capture date and nothing
/// else wrong with the tradeline.
const DISPUTED_PAGE: &str = indoc! {r#"
    <html><body>
    <p>IdentityIQ Credit Report</p>
    <h2>Credit Scores</h2>
    <table>
      <tr><td>Experian</td><td>612</td></tr>
    </table>
    <h2>Account History</h2>
    <table>
      <tr><td>FIRST PREMIER</td></tr>
      <tr><td>Account #</td><td>****8861</td></tr>
      <tr><td></td><td>TransUnion</td><td>Experian</td></tr>
      <tr><td>Account Status</td><td>Open</td><td>Open</td></tr>
      <tr><td>Balance</td><td>$310</td><td>$310</td></tr>
      <tr><td>Dispute Date</td><td>--</td><td>06/12/2026</td></tr>
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

fn capture_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
}

#[test]
fn default_window_flags_the_fifty_day_dispute() {
    let config = EngineConfig::default();
    let report = parse_report(
        DISPUTED_PAGE.as_bytes(),
        Provider::IdentityIq,
        capture_date(),
        &config,
    )
    .unwrap();
    assert_eq!(report.parse_status, ParseStatus::Parsed);

    let found = violations::detect(&report, &config.detector);
    let stale: Vec<_> = found
        .iter()
        .filter(|v| v.section == ViolationSection::Investigation)
        .collect();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].bureaus, vec![Bureau::Experian]);
}

#[test]
fn loaded_override_widens_the_reinvestigation_window() {
    let mut file = NamedTempFile::new().expect("temp config file");
    write!(file, "[detector]\nstale_dispute_days = 90\n").unwrap();

    let config = EngineConfig::load(file.path()).expect("config should load");
    assert_eq!(config.detector.stale_dispute_days, 90);

    let report = parse_report(
        DISPUTED_PAGE.as_bytes(),
        Provider::IdentityIq,
        capture_date(),
        &config,
    )
    .unwrap();
    let found = violations::detect(&report, &config.detector);
    assert!(found
        .iter()
        .all(|v| v.section != ViolationSection::Investigation));
}

#[test]
fn provider_vocabulary_override_replaces_the_seeded_table() {
    let mut file = NamedTempFile::new().expect("temp config file");
    let toml = indoc! {r#"
        [providers.identityiq]
        date_formats = ["%d.%m.%Y"]

        [providers.identityiq.field_labels]
        "kontostand" = "balance"
    "#};
    file.write_all(toml.as_bytes()).unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    let table = config.providers.table(Provider::IdentityIq);
    assert_eq!(table.date_formats, vec!["%d.%m.%Y".to_string()]);
    assert!(table.field_labels.contains_key("kontostand"));
    // The override replaces IdentityIQ wholesale but other providers keep
    // their seeded vocabulary.
    assert!(!config
        .providers
        .table(Provider::SmartCredit)
        .history_codes
        .is_empty());
}

#[test]
fn invalid_threshold_in_file_is_rejected_at_load() {
    let mut file = NamedTempFile::new().expect("temp config file");
    write!(file, "[detector]\nstale_dispute_days = 0\n").unwrap();
    assert!(EngineConfig::load(file.path()).is_err());
}
