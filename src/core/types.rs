//! Closed enumerations shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three consumer credit reporting agencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bureau {
    Equifax,
    Experian,
    TransUnion,
}

impl Bureau {
    pub const ALL: [Bureau; 3] = [Bureau::Equifax, Bureau::Experian, Bureau::TransUnion];

    /// Display name as it appears on vendor reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Bureau::Equifax => "Equifax",
            Bureau::Experian => "Experian",
            Bureau::TransUnion => "TransUnion",
        }
    }

    /// Recognize a bureau from normalized report text
    pub fn from_label(label: &str) -> Option<Bureau> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "equifax" | "eqf" | "efx" => Some(Bureau::Equifax),
            "experian" | "exp" | "ex" => Some(Bureau::Experian),
            "transunion" | "trans union" | "tu" | "tuc" => Some(Bureau::TransUnion),
            _ => None,
        }
    }
}

impl fmt::Display for Bureau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Enumerated credit-monitoring vendors the engine can ingest.
///
/// Adapter selection is always by this explicit hint, never by sniffing
/// document content. The serde names are pinned to [`Provider::hint`] so
/// JSON output, TOML config keys, and CLI arguments all use one spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "identityiq")]
    IdentityIq,
    #[serde(rename = "smartcredit")]
    SmartCredit,
    #[serde(rename = "myscoreiq")]
    MyScoreIq,
    #[serde(rename = "privacyguard")]
    PrivacyGuard,
    #[serde(rename = "credithero")]
    CreditHero,
    #[serde(rename = "annualcreditreport")]
    AnnualCreditReport,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::IdentityIq,
        Provider::SmartCredit,
        Provider::MyScoreIq,
        Provider::PrivacyGuard,
        Provider::CreditHero,
        Provider::AnnualCreditReport,
    ];

    /// Stable identifier used in JSON output and CLI arguments
    pub fn hint(&self) -> &'static str {
        match self {
            Provider::IdentityIq => "identityiq",
            Provider::SmartCredit => "smartcredit",
            Provider::MyScoreIq => "myscoreiq",
            Provider::PrivacyGuard => "privacyguard",
            Provider::CreditHero => "credithero",
            Provider::AnnualCreditReport => "annualcreditreport",
        }
    }

    pub fn from_hint(hint: &str) -> Option<Provider> {
        let normalized = hint.trim().to_lowercase();
        Provider::ALL.iter().copied().find(|p| p.hint() == normalized)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hint())
    }
}

/// Labeled regions an adapter carves out of a vendor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Scores,
    Accounts,
    Inquiries,
    PersonalInfo,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Scores,
        SectionKind::Accounts,
        SectionKind::Inquiries,
        SectionKind::PersonalInfo,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SectionKind::Scores => "scores",
            SectionKind::Accounts => "accounts",
            SectionKind::Inquiries => "inquiries",
            SectionKind::PersonalInfo => "personal information",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Canonical tradeline categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Revolving,
    Installment,
    Mortgage,
    Collection,
    Unknown,
}

/// Canonical account status vocabulary.
///
/// Vendor-specific wordings are normalized into this set; anything outside
/// the per-provider table maps to `Unknown`, never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Open,
    Closed,
    Paid,
    ChargedOff,
    InCollection,
    Disputed,
    Unknown,
}

impl AccountStatus {
    /// Whether the status describes an account in good standing
    pub fn is_current(&self) -> bool {
        matches!(self, AccountStatus::Open | AccountStatus::Paid)
    }

    /// Whether the status describes a written-off or collection state
    pub fn is_derogatory(&self) -> bool {
        matches!(self, AccountStatus::ChargedOff | AccountStatus::InCollection)
    }
}

/// Per-month payment grid code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Ok,
    Late30,
    Late60,
    Late90,
    ChargeOff,
    Unreported,
    Unknown,
}

impl PaymentStatus {
    /// Whether the code marks a delinquency a furnisher must be able to verify
    pub fn is_late(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Late30 | PaymentStatus::Late60 | PaymentStatus::Late90
        )
    }

    /// Delinquency rank used to check month-over-month escalation
    pub fn delinquency_rank(&self) -> u8 {
        match self {
            PaymentStatus::Ok | PaymentStatus::Unreported | PaymentStatus::Unknown => 0,
            PaymentStatus::Late30 => 1,
            PaymentStatus::Late60 => 2,
            PaymentStatus::Late90 => 3,
            PaymentStatus::ChargeOff => 4,
        }
    }
}

/// Terminal parse state of a report; entered once at ingestion and never
/// revisited. A fresh pull creates a fresh report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Pending,
    Parsed,
    Partial,
    Failed,
}

/// Statutory section tags a violation can cite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSection {
    Accuracy,
    Investigation,
    FurnisherDuty,
    PermissiblePurpose,
    Pii,
}

impl ViolationSection {
    pub const ALL: [ViolationSection; 5] = [
        ViolationSection::Accuracy,
        ViolationSection::Investigation,
        ViolationSection::FurnisherDuty,
        ViolationSection::PermissiblePurpose,
        ViolationSection::Pii,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ViolationSection::Accuracy => "accuracy",
            ViolationSection::Investigation => "investigation",
            ViolationSection::FurnisherDuty => "furnisher-duty",
            ViolationSection::PermissiblePurpose => "permissible-purpose",
            ViolationSection::Pii => "pii",
        }
    }
}

impl fmt::Display for ViolationSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
