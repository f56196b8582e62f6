//! AnnualCreditReport.com extracted-text layout
//!
//! These arrive as PDF-extracted text wrapped in minimal markup rather
//! than a styled page. Sections repeat per bureau, so account and inquiry
//! blocks are tagged by their leading bureau label line.

use crate::core::types::{Provider, SectionKind};

use super::{tag_block_by_leading_label, Block, ProviderAdapter, SectionAnchors};

pub struct AnnualCreditReportAdapter;

static ANCHORS: &[SectionAnchors] = &[
    SectionAnchors {
        kind: SectionKind::Scores,
        anchors: &["Credit Score Disclosure", "Scores"],
    },
    SectionAnchors {
        kind: SectionKind::Accounts,
        anchors: &["Credit Items", "Accounts"],
    },
    SectionAnchors {
        kind: SectionKind::Inquiries,
        anchors: &["Requests Viewed By Others", "Inquiries"],
    },
    SectionAnchors {
        kind: SectionKind::PersonalInfo,
        anchors: &["Identification Information", "Personal Information"],
    },
];

impl ProviderAdapter for AnnualCreditReportAdapter {
    fn provider(&self) -> Provider {
        Provider::AnnualCreditReport
    }

    fn signature(&self) -> &'static str {
        "AnnualCreditReport"
    }

    fn section_anchors(&self) -> &'static [SectionAnchors] {
        ANCHORS
    }

    fn tag_block(&self, kind: SectionKind, block: Block) -> Block {
        match kind {
            SectionKind::Scores => block,
            _ => tag_block_by_leading_label(block),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bureau;
    use indoc::indoc;

    #[test]
    fn pdf_extracted_text_blocks_are_tagged_per_bureau() {
        let page = indoc! {r#"
            <html><body>
            <p>Source: AnnualCreditReport.com</p>
            <h2>Credit Items</h2>
            <table>
              <tr><td>Experian</td></tr>
              <tr><td>WELLS FARGO</td></tr>
              <tr><td>Status</td><td>Open/Never late</td></tr>
            </table>
            <h2>Requests Viewed By Others</h2>
            <table>
              <tr><td>TransUnion</td></tr>
              <tr><td>ACME BANK</td><td>01-Mar-2026</td></tr>
            </table>
            </body></html>
        "#};
        let tree = AnnualCreditReportAdapter
            .parse_raw(page.as_bytes())
            .unwrap();
        let accounts = tree.region(SectionKind::Accounts).unwrap();
        assert_eq!(accounts.blocks[0].bureau, Some(Bureau::Experian));
        let inquiries = tree.region(SectionKind::Inquiries).unwrap();
        assert_eq!(inquiries.blocks[0].bureau, Some(Bureau::TransUnion));
    }
}
