//! MyScoreIQ report layout
//!
//! Shares the columnar bone structure of the other FICO-branded monitors
//! but with its own heading texts and a combined scores/summary banner.

use crate::core::types::{Provider, SectionKind};

use super::{ProviderAdapter, SectionAnchors};

pub struct MyScoreIqAdapter;

static ANCHORS: &[SectionAnchors] = &[
    SectionAnchors {
        kind: SectionKind::Scores,
        anchors: &["FICO Scores", "Score Overview"],
    },
    SectionAnchors {
        kind: SectionKind::Accounts,
        anchors: &["Credit Accounts", "Account History"],
    },
    SectionAnchors {
        kind: SectionKind::Inquiries,
        anchors: &["Hard Inquiries", "Inquiries"],
    },
    SectionAnchors {
        kind: SectionKind::PersonalInfo,
        anchors: &["Identity Elements", "Personal Information"],
    },
];

impl ProviderAdapter for MyScoreIqAdapter {
    fn provider(&self) -> Provider {
        Provider::MyScoreIq
    }

    fn signature(&self) -> &'static str {
        "MyScoreIQ"
    }

    fn section_anchors(&self) -> &'static [SectionAnchors] {
        ANCHORS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_anchor_wins_over_generic_one() {
        // "Score Overview" also appears inside marketing copy; the exact
        // "FICO Scores" heading must be preferred.
        let page = "<html><body><p>MyScoreIQ member report</p>\
            <h3>Score Overview and Tips</h3>\
            <h3>FICO Scores</h3>\
            <table><tr><td>TransUnion</td><td>640</td></tr></table>\
            </body></html>";
        let tree = MyScoreIqAdapter.parse_raw(page.as_bytes()).unwrap();
        let scores = tree.region(SectionKind::Scores).unwrap();
        assert_eq!(scores.blocks[0].lines[0], "TransUnion\t640");
    }
}
