// Export modules for library usage
pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod damages;
pub mod extract;
pub mod io;
pub mod pipeline;
pub mod reconcile;
pub mod scoring;
pub mod violations;

// Re-export commonly used types
pub use crate::core::{
    errors::{EngineError, Result},
    types::{
        AccountStatus, AccountType, Bureau, ParseStatus, PaymentStatus, Provider, SectionKind,
        ViolationSection,
    },
    Account, BureauAccountView, BureauScore, CaseAnalysis, CaseScore, CreditReport, DamagesBand,
    DamagesEstimate, HarmItem, Inquiry, PaymentHistoryEntry, PersonalInfoVariant, Recommendation,
    StandingInputs, TieBreak, Violation, HISTORY_MONTHS,
};

pub use crate::adapters::{get_adapter, IntermediateTree, ProviderAdapter, Region};

pub use crate::config::{get_config, set_config, DetectorConfig, EngineConfig, ScoringConfig};

pub use crate::extract::{extract, RawExtraction};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};

pub use crate::pipeline::{
    analyze_batch, analyze_parsed, analyze_report, ingest, parse_report, AnalysisInputs, BatchItem,
};

pub use crate::reconcile::merge;

pub use crate::violations::{detect, rule_catalog, Rule};
