//! Engine configuration: detection thresholds, statutory tables, scoring maps
//!
//! Follows a defaults-first layout: every knob has a serde default, a TOML
//! file may override any subset, and validation rejects tables that could
//! misstate legal exposure.

use crate::core::{EngineError, ViolationSection};
use crate::extract::tables::{ProviderTables, VendorTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Violation-detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Days a dispute notation may age without a status change before the
    /// reinvestigation clock is considered blown.
    #[serde(default = "default_stale_dispute_days")]
    pub stale_dispute_days: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            stale_dispute_days: default_stale_dispute_days(),
        }
    }
}

fn default_stale_dispute_days() -> i64 {
    45
}

/// Statutory range for one violation section, in cents per violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryBand {
    pub low_cents: i64,
    pub high_cents: i64,
}

/// Punitive multiplier tier keyed by reprehensibility-factor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunitiveTier {
    pub min_factors: usize,
    pub multiplier: i64,
}

/// Attorney-fee hours tier keyed by violation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    pub min_violations: usize,
    pub hours: i64,
}

/// Damages-calculator tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamagesConfig {
    #[serde(default = "default_statutory_bands")]
    pub statutory: BTreeMap<ViolationSection, StatutoryBand>,
    /// Willfulness percentage at or above which punitive damages unlock.
    #[serde(default = "default_punitive_threshold")]
    pub punitive_threshold: u8,
    /// Ascending tiers; the highest tier whose `min_factors` is met wins.
    #[serde(default = "default_punitive_tiers")]
    pub punitive_tiers: Vec<PunitiveTier>,
    /// Violations at or above this severity count as reprehensibility
    /// factors for tier selection.
    #[serde(default = "default_reprehensibility_floor")]
    pub reprehensibility_severity_floor: u8,
    #[serde(default = "default_hourly_rate_cents")]
    pub hourly_rate_cents: i64,
    /// Ascending tiers; the highest tier whose `min_violations` is met wins.
    #[serde(default = "default_fee_tiers")]
    pub fee_tiers: Vec<FeeTier>,
}

impl Default for DamagesConfig {
    fn default() -> Self {
        Self {
            statutory: default_statutory_bands(),
            punitive_threshold: default_punitive_threshold(),
            punitive_tiers: default_punitive_tiers(),
            reprehensibility_severity_floor: default_reprehensibility_floor(),
            hourly_rate_cents: default_hourly_rate_cents(),
            fee_tiers: default_fee_tiers(),
        }
    }
}

fn default_statutory_bands() -> BTreeMap<ViolationSection, StatutoryBand> {
    let mut bands = BTreeMap::new();
    // 15 U.S.C. 1681n(a)(1)(A): $100-$1,000 per willful violation.
    let standard = StatutoryBand {
        low_cents: 100_00,
        high_cents: 1_000_00,
    };
    bands.insert(ViolationSection::Accuracy, standard);
    bands.insert(ViolationSection::Investigation, standard);
    bands.insert(ViolationSection::FurnisherDuty, standard);
    // Impermissible pulls settle on the fixed ceiling in practice.
    bands.insert(
        ViolationSection::PermissiblePurpose,
        StatutoryBand {
            low_cents: 1_000_00,
            high_cents: 1_000_00,
        },
    );
    bands.insert(
        ViolationSection::Pii,
        StatutoryBand {
            low_cents: 100_00,
            high_cents: 500_00,
        },
    );
    bands
}

fn default_punitive_threshold() -> u8 {
    50
}

fn default_punitive_tiers() -> Vec<PunitiveTier> {
    vec![
        PunitiveTier {
            min_factors: 0,
            multiplier: 1,
        },
        PunitiveTier {
            min_factors: 2,
            multiplier: 2,
        },
        PunitiveTier {
            min_factors: 4,
            multiplier: 3,
        },
        PunitiveTier {
            min_factors: 6,
            multiplier: 4,
        },
    ]
}

fn default_reprehensibility_floor() -> u8 {
    7
}

fn default_hourly_rate_cents() -> i64 {
    400_00
}

fn default_fee_tiers() -> Vec<FeeTier> {
    vec![
        FeeTier {
            min_violations: 0,
            hours: 20,
        },
        FeeTier {
            min_violations: 3,
            hours: 40,
        },
        FeeTier {
            min_violations: 10,
            hours: 80,
        },
    ]
}

/// Case-scorer tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Willfulness percentage boundaries for the 0/1/2 sub-score buckets.
    #[serde(default = "default_willfulness_buckets")]
    pub willfulness_buckets: [u8; 2],
    /// Settlement probability percentage for totals 1 through 10.
    #[serde(default = "default_settlement_table")]
    pub settlement_table: [u8; 10],
    /// Severity at or above which a violation counts as litigation-grade
    /// for the violation-quality sub-score.
    #[serde(default = "default_strong_severity_floor")]
    pub strong_severity_floor: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            willfulness_buckets: default_willfulness_buckets(),
            settlement_table: default_settlement_table(),
            strong_severity_floor: default_strong_severity_floor(),
        }
    }
}

fn default_willfulness_buckets() -> [u8; 2] {
    [34, 67]
}

fn default_settlement_table() -> [u8; 10] {
    [5, 10, 20, 30, 40, 55, 65, 75, 85, 92]
}

fn default_strong_severity_floor() -> u8 {
    8
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub damages: DamagesConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub providers: ProviderTables,
}

impl EngineConfig {
    /// Load configuration from a TOML file, applying provider-table
    /// overrides on top of the seeded defaults.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, EngineError> {
        #[derive(Deserialize)]
        struct RawConfig {
            #[serde(default)]
            detector: DetectorConfig,
            #[serde(default)]
            damages: DamagesConfig,
            #[serde(default)]
            scoring: ScoringConfig,
            #[serde(default)]
            providers: BTreeMap<crate::core::Provider, VendorTable>,
        }

        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| EngineError::Configuration(e.to_string()))?;
        let config = EngineConfig {
            detector: raw.detector,
            damages: raw.damages,
            scoring: raw.scoring,
            providers: ProviderTables::default().with_overrides(raw.providers),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.damages.punitive_threshold > 100 {
            return Err(EngineError::Configuration(format!(
                "punitive threshold {} exceeds 100",
                self.damages.punitive_threshold
            )));
        }
        for (section, band) in &self.damages.statutory {
            if band.low_cents < 0 || band.high_cents < band.low_cents {
                return Err(EngineError::Configuration(format!(
                    "statutory band for {section} is not a valid range"
                )));
            }
        }
        if self.damages.punitive_tiers.is_empty() || self.damages.fee_tiers.is_empty() {
            return Err(EngineError::Configuration(
                "punitive and fee tier tables must not be empty".to_string(),
            ));
        }
        if self
            .scoring
            .settlement_table
            .windows(2)
            .any(|pair| pair[1] < pair[0])
        {
            return Err(EngineError::Configuration(
                "settlement table must be monotonic non-decreasing".to_string(),
            ));
        }
        if self.detector.stale_dispute_days <= 0 {
            return Err(EngineError::Configuration(
                "stale dispute threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Process-wide configuration, used by the CLI path. Library callers pass
/// an explicit `&EngineConfig` instead.
pub fn get_config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Install a loaded configuration before first use. Returns false if the
/// global was already initialized.
pub fn set_config(config: EngineConfig) -> bool {
    CONFIG.set(config).is_ok()
}
