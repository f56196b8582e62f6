//! Shared error types for the engine

use crate::core::types::{Provider, SectionKind};
use thiserror::Error;

/// Main error type for engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// An expected region was not found in the document. Recoverable: the
    /// caller decides whether the section is optional; recovered sections
    /// leave null fields and a `partial` parse status.
    #[error("missing section: {section} not found in {provider} document")]
    MissingSection {
        provider: Provider,
        section: SectionKind,
    },

    /// The document does not match the hinted provider's shape. Fatal for
    /// the document: no partial account data is emitted, because a wrong
    /// adapter would corrupt downstream merges.
    #[error("unrecognized format for provider {provider}: {reason}")]
    UnrecognizedFormat { provider: Provider, reason: String },

    /// The raw document is not text the adapter can scan.
    #[error("undecodable document: {0}")]
    UndecodableDocument(String),

    /// Out-of-range input to the damages calculator or case scorer. A
    /// caller bug, never a data-quality issue: surfaced loudly instead of
    /// clamped, since silent clamping could misstate legal exposure.
    #[error("calculation input error: {0}")]
    CalculationInput(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn missing_section(provider: Provider, section: SectionKind) -> Self {
        Self::MissingSection { provider, section }
    }

    pub fn unrecognized_format(provider: Provider, reason: impl Into<String>) -> Self {
        Self::UnrecognizedFormat {
            provider,
            reason: reason.into(),
        }
    }

    pub fn calculation_input(message: impl Into<String>) -> Self {
        Self::CalculationInput(message.into())
    }

    /// Whether parsing may continue with the affected section left null
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::MissingSection { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_is_recoverable() {
        let err = EngineError::missing_section(Provider::IdentityIq, SectionKind::PersonalInfo);
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("personal information"));
    }

    #[test]
    fn format_and_calculation_errors_are_fatal() {
        let format = EngineError::unrecognized_format(Provider::SmartCredit, "no score table");
        let calc = EngineError::calculation_input("willfulness 140 exceeds 100");
        assert!(!format.is_recoverable());
        assert!(!calc.is_recoverable());
    }
}
