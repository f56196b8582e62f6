//! PrivacyGuard report layout
//!
//! Unlike the columnar vendors, PrivacyGuard repeats each section once per
//! bureau: every table opens with a bureau label row, so blocks are tagged
//! with the bureau they belong to.

use crate::core::types::{Provider, SectionKind};

use super::{tag_block_by_leading_label, Block, ProviderAdapter, SectionAnchors};

pub struct PrivacyGuardAdapter;

static ANCHORS: &[SectionAnchors] = &[
    SectionAnchors {
        kind: SectionKind::Scores,
        anchors: &["Credit Score Summary", "Scores"],
    },
    SectionAnchors {
        kind: SectionKind::Accounts,
        anchors: &["Account Information", "Accounts"],
    },
    SectionAnchors {
        kind: SectionKind::Inquiries,
        anchors: &["Inquiry Information", "Inquiries"],
    },
    SectionAnchors {
        kind: SectionKind::PersonalInfo,
        anchors: &["Personal Data", "Personal Information"],
    },
];

impl ProviderAdapter for PrivacyGuardAdapter {
    fn provider(&self) -> Provider {
        Provider::PrivacyGuard
    }

    fn signature(&self) -> &'static str {
        "PrivacyGuard"
    }

    fn section_anchors(&self) -> &'static [SectionAnchors] {
        ANCHORS
    }

    fn tag_block(&self, kind: SectionKind, block: Block) -> Block {
        match kind {
            // Scores keep the bureau label inline on each row.
            SectionKind::Scores => block,
            _ => tag_block_by_leading_label(block),
        }
    }
}
