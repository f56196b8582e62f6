//! CreditHero report layout

use crate::core::types::{Provider, SectionKind};

use super::{ProviderAdapter, SectionAnchors};

pub struct CreditHeroAdapter;

static ANCHORS: &[SectionAnchors] = &[
    SectionAnchors {
        kind: SectionKind::Scores,
        anchors: &["Bureau Scores", "Scores"],
    },
    SectionAnchors {
        kind: SectionKind::Accounts,
        anchors: &["Open & Closed Accounts", "Accounts"],
    },
    SectionAnchors {
        kind: SectionKind::Inquiries,
        anchors: &["Recent Inquiries", "Inquiries"],
    },
    SectionAnchors {
        kind: SectionKind::PersonalInfo,
        anchors: &["Profile Details", "Personal Information"],
    },
];

impl ProviderAdapter for CreditHeroAdapter {
    fn provider(&self) -> Provider {
        Provider::CreditHero
    }

    fn signature(&self) -> &'static str {
        "CreditHero"
    }

    fn section_anchors(&self) -> &'static [SectionAnchors] {
        ANCHORS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_encoded_headings_still_match() {
        let page = "<html><body><p>CreditHero report</p>\
            <h2>Open &amp; Closed Accounts</h2>\
            <table><tr><td>DISCOVER BANK</td></tr></table>\
            </body></html>";
        let tree = CreditHeroAdapter.parse_raw(page.as_bytes()).unwrap();
        let accounts = tree.region(SectionKind::Accounts).unwrap();
        assert_eq!(accounts.blocks[0].lines[0], "DISCOVER BANK");
    }
}
