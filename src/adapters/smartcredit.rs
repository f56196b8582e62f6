//! SmartCredit report layout
//!
//! Columnar three-bureau page. Headings are `div.section-title` elements;
//! several share the word "Summary", so anchors list the specific texts.

use crate::core::types::{Provider, SectionKind};

use super::{ProviderAdapter, SectionAnchors};

pub struct SmartCreditAdapter;

static ANCHORS: &[SectionAnchors] = &[
    SectionAnchors {
        kind: SectionKind::Scores,
        anchors: &["Your Credit Scores", "Scores"],
    },
    SectionAnchors {
        kind: SectionKind::Accounts,
        anchors: &["Tradelines", "Account Summary"],
    },
    SectionAnchors {
        kind: SectionKind::Inquiries,
        anchors: &["Credit Inquiries", "Inquiries"],
    },
    SectionAnchors {
        kind: SectionKind::PersonalInfo,
        anchors: &["Consumer Information", "Personal Information"],
    },
];

impl ProviderAdapter for SmartCreditAdapter {
    fn provider(&self) -> Provider {
        Provider::SmartCredit
    }

    fn signature(&self) -> &'static str {
        "SmartCredit"
    }

    fn section_anchors(&self) -> &'static [SectionAnchors] {
        ANCHORS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn section_title_divs_are_recognized_as_headings() {
        let page = indoc! {r#"
            <html><body>
            <p>Powered by SmartCredit</p>
            <div class="section-title">Your Credit Scores</div>
            <table><tr><td>Equifax</td><td>612</td></tr></table>
            <div class="section-title">Tradelines</div>
            <table><tr><td>SYNCHRONY BANK</td></tr></table>
            </body></html>
        "#};
        let tree = SmartCreditAdapter.parse_raw(page.as_bytes()).unwrap();
        let scores = tree.region(SectionKind::Scores).unwrap();
        assert_eq!(scores.blocks[0].lines[0], "Equifax\t612");
        assert!(tree
            .missing_sections()
            .contains(&SectionKind::PersonalInfo));
    }
}
