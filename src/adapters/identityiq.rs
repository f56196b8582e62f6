//! IdentityIQ report layout
//!
//! Server-rendered three-bureau comparison page. One table per account
//! with TransUnion/Experian/Equifax columns; generic `h2` headings, so the
//! section anchors here are matched on text against all candidates.

use crate::core::types::{Provider, SectionKind};

use super::{ProviderAdapter, SectionAnchors};

pub struct IdentityIqAdapter;

static ANCHORS: &[SectionAnchors] = &[
    SectionAnchors {
        kind: SectionKind::Scores,
        anchors: &["Credit Scores", "Credit Score"],
    },
    SectionAnchors {
        kind: SectionKind::Accounts,
        anchors: &["Account History", "Accounts"],
    },
    SectionAnchors {
        kind: SectionKind::Inquiries,
        anchors: &["Inquiries"],
    },
    SectionAnchors {
        kind: SectionKind::PersonalInfo,
        anchors: &["Personal Information"],
    },
];

impl ProviderAdapter for IdentityIqAdapter {
    fn provider(&self) -> Provider {
        Provider::IdentityIq
    }

    fn signature(&self) -> &'static str {
        "IdentityIQ"
    }

    fn section_anchors(&self) -> &'static [SectionAnchors] {
        ANCHORS
    }
}
