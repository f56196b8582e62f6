//! Per-provider vocabulary tables: field labels, status codes, date formats
//!
//! These tables are empirically derived from sample vendor pages and are
//! deliberately configuration data, loadable from TOML, so new vendor
//! wordings observed in production can be added without code changes.
//! Unknown vocabulary never errors; it normalizes to an explicit `Unknown`
//! variant and is logged by the extraction layer.

use crate::core::{AccountStatus, PaymentStatus, Provider};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical account fields a vendor label can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    AccountNumber,
    Status,
    Balance,
    ChargeOffBalance,
    Opened,
    AccountType,
    PaymentRating,
    LastActivity,
    ChargedOffOn,
    DisputeDate,
}

/// Vocabulary for one vendor's report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTable {
    /// Ordered date formats to try; first match wins.
    #[serde(default)]
    pub date_formats: Vec<String>,
    /// Normalized vendor status wording -> canonical status.
    #[serde(default)]
    pub account_status: BTreeMap<String, AccountStatus>,
    /// Payment-grid token -> canonical monthly code.
    #[serde(default)]
    pub history_codes: BTreeMap<String, PaymentStatus>,
    /// Normalized field label -> canonical field.
    #[serde(default)]
    pub field_labels: BTreeMap<String, FieldKind>,
}

impl VendorTable {
    fn base() -> Self {
        let mut table = VendorTable {
            date_formats: vec!["%m/%d/%Y".to_string()],
            account_status: BTreeMap::new(),
            history_codes: BTreeMap::new(),
            field_labels: BTreeMap::new(),
        };
        for (label, kind) in [
            ("account #", FieldKind::AccountNumber),
            ("account number", FieldKind::AccountNumber),
            ("account no.", FieldKind::AccountNumber),
            ("account status", FieldKind::Status),
            ("status", FieldKind::Status),
            ("balance", FieldKind::Balance),
            ("current balance", FieldKind::Balance),
            ("balance owed", FieldKind::Balance),
            ("charge-off amount", FieldKind::ChargeOffBalance),
            ("original charge-off", FieldKind::ChargeOffBalance),
            ("date opened", FieldKind::Opened),
            ("opened", FieldKind::Opened),
            ("open date", FieldKind::Opened),
            ("account type", FieldKind::AccountType),
            ("type", FieldKind::AccountType),
            ("loan type", FieldKind::AccountType),
            ("payment status", FieldKind::PaymentRating),
            ("pay status", FieldKind::PaymentRating),
            ("payment rating", FieldKind::PaymentRating),
            ("date of last activity", FieldKind::LastActivity),
            ("last activity", FieldKind::LastActivity),
            ("last active", FieldKind::LastActivity),
            ("charge-off date", FieldKind::ChargedOffOn),
            ("date charged off", FieldKind::ChargedOffOn),
            ("dispute date", FieldKind::DisputeDate),
            ("dispute filed", FieldKind::DisputeDate),
            ("consumer dispute date", FieldKind::DisputeDate),
        ] {
            table.field_labels.insert(label.to_string(), kind);
        }
        for (word, status) in [
            ("open", AccountStatus::Open),
            ("current", AccountStatus::Open),
            ("closed", AccountStatus::Closed),
            ("paid", AccountStatus::Paid),
            ("paid, closed", AccountStatus::Paid),
            ("charge-off", AccountStatus::ChargedOff),
            ("charged off", AccountStatus::ChargedOff),
            ("charged off as bad debt", AccountStatus::ChargedOff),
            ("collection", AccountStatus::InCollection),
            ("in collection", AccountStatus::InCollection),
            ("collection account", AccountStatus::InCollection),
            ("disputed", AccountStatus::Disputed),
            ("consumer disputes this account", AccountStatus::Disputed),
        ] {
            table.account_status.insert(word.to_string(), status);
        }
        for (token, code) in [
            ("ok", PaymentStatus::Ok),
            ("30", PaymentStatus::Late30),
            ("60", PaymentStatus::Late60),
            ("90", PaymentStatus::Late90),
            ("co", PaymentStatus::ChargeOff),
            ("--", PaymentStatus::Unreported),
        ] {
            table.history_codes.insert(token.to_string(), code);
        }
        table
    }

    fn with_dates(mut self, formats: &[&str]) -> Self {
        self.date_formats = formats.iter().map(|f| f.to_string()).collect();
        self
    }

    fn with_history(mut self, tokens: &[(&str, PaymentStatus)]) -> Self {
        for (token, code) in tokens {
            self.history_codes.insert(token.to_string(), *code);
        }
        self
    }

    fn with_statuses(mut self, words: &[(&str, AccountStatus)]) -> Self {
        for (word, status) in words {
            self.account_status.insert(word.to_string(), *status);
        }
        self
    }
}

/// All vendor tables, keyed by provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTables {
    #[serde(default)]
    pub by_provider: BTreeMap<Provider, VendorTable>,
}

impl ProviderTables {
    pub fn table(&self, provider: Provider) -> &VendorTable {
        // Every enumerated provider is seeded in Default; a TOML override
        // can replace entries but not remove a provider.
        self.by_provider
            .get(&provider)
            .unwrap_or_else(|| panic!("no vendor table for provider {provider}"))
    }

    /// Merge TOML-supplied overrides over the seeded defaults.
    pub fn with_overrides(mut self, overrides: BTreeMap<Provider, VendorTable>) -> Self {
        for (provider, table) in overrides {
            self.by_provider.insert(provider, table);
        }
        self
    }
}

impl Default for ProviderTables {
    fn default() -> Self {
        let mut by_provider = BTreeMap::new();
        by_provider.insert(
            Provider::IdentityIq,
            VendorTable::base().with_dates(&["%m/%d/%Y", "%m/%Y"]),
        );
        by_provider.insert(
            Provider::SmartCredit,
            VendorTable::base()
                .with_dates(&["%b %d, %Y", "%m/%d/%Y"])
                .with_history(&[
                    ("c", PaymentStatus::Ok),
                    ("1", PaymentStatus::Late30),
                    ("2", PaymentStatus::Late60),
                    ("3", PaymentStatus::Late90),
                    ("u", PaymentStatus::Unreported),
                ]),
        );
        by_provider.insert(
            Provider::MyScoreIq,
            VendorTable::base()
                .with_dates(&["%m/%d/%Y"])
                .with_history(&[("x", PaymentStatus::Unreported)]),
        );
        by_provider.insert(
            Provider::PrivacyGuard,
            VendorTable::base()
                .with_dates(&["%Y-%m-%d", "%m/%d/%Y"])
                .with_history(&[
                    ("g", PaymentStatus::Ok),
                    ("-", PaymentStatus::Unreported),
                ])
                .with_statuses(&[
                    ("o", AccountStatus::Open),
                    ("c", AccountStatus::Closed),
                    ("p", AccountStatus::Paid),
                ]),
        );
        by_provider.insert(
            Provider::CreditHero,
            VendorTable::base()
                .with_dates(&["%B %d, %Y", "%m/%d/%Y"])
                .with_history(&[
                    ("on-time", PaymentStatus::Ok),
                    ("l30", PaymentStatus::Late30),
                    ("l60", PaymentStatus::Late60),
                    ("l90", PaymentStatus::Late90),
                    ("na", PaymentStatus::Unreported),
                ]),
        );
        by_provider.insert(
            Provider::AnnualCreditReport,
            VendorTable::base()
                .with_dates(&["%d-%b-%Y", "%m/%d/%Y"])
                .with_history(&[("nr", PaymentStatus::Unreported)])
                .with_statuses(&[
                    ("open/never late", AccountStatus::Open),
                    ("unpaid balance reported as a loss by credit grantor", AccountStatus::ChargedOff),
                ]),
        );
        ProviderTables { by_provider }
    }
}
