//! Provider adapters: vendor markup -> provider-neutral intermediate tree
//!
//! One adapter per enumerated vendor. Selection is by explicit provider
//! hint through a static lookup table; the engine never sniffs document
//! content to guess the vendor, because the layouts reuse generic markup.

use crate::core::errors::{EngineError, Result};
use crate::core::types::{Bureau, Provider, SectionKind};
use std::collections::BTreeMap;

pub mod annualcreditreport;
pub mod credithero;
pub mod identityiq;
pub mod markup;
pub mod myscoreiq;
pub mod privacyguard;
pub mod smartcredit;

use markup::{split_blocks, MarkupDocument};

/// One block of flattened lines inside a region. Columnar vendors leave
/// `bureau` unset; vendors that repeat a section per bureau tag each block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub bureau: Option<Bureau>,
    pub lines: Vec<String>,
}

/// A labeled region of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

/// Provider-neutral tree of labeled regions.
#[derive(Debug, Clone)]
pub struct IntermediateTree {
    pub provider: Provider,
    regions: BTreeMap<SectionKind, Region>,
    missing: Vec<SectionKind>,
}

impl IntermediateTree {
    /// Look up a region, surfacing the typed missing-section error. The
    /// caller decides whether the section was optional.
    pub fn region(&self, kind: SectionKind) -> Result<&Region> {
        self.regions
            .get(&kind)
            .ok_or(EngineError::MissingSection {
                provider: self.provider,
                section: kind,
            })
    }

    /// Sections the adapter expected but could not locate.
    pub fn missing_sections(&self) -> &[SectionKind] {
        &self.missing
    }
}

/// Anchor vocabulary for one section of one vendor's layout.
pub struct SectionAnchors {
    pub kind: SectionKind,
    /// Heading texts to try, most specific first.
    pub anchors: &'static [&'static str],
}

pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    /// Text that appears on every genuine page from this vendor. Its
    /// absence means the hint does not match the document.
    fn signature(&self) -> &'static str;

    fn section_anchors(&self) -> &'static [SectionAnchors];

    /// Vendor hook: assign a bureau to a block whose section repeats per
    /// bureau. Columnar vendors keep the default.
    fn tag_block(&self, _kind: SectionKind, block: Block) -> Block {
        block
    }

    /// Convert raw document bytes into the labeled region tree.
    fn parse_raw(&self, document: &[u8]) -> Result<IntermediateTree> {
        let doc = MarkupDocument::parse(document)?;
        if !doc.contains_marker(self.signature()) {
            return Err(EngineError::unrecognized_format(
                self.provider(),
                format!("vendor signature {:?} not present", self.signature()),
            ));
        }

        let mut regions = BTreeMap::new();
        let mut missing = Vec::new();
        for section in self.section_anchors() {
            match doc.find_heading(section.anchors) {
                Some(heading) => {
                    let blocks = split_blocks(&doc.region_lines(heading))
                        .into_iter()
                        .map(|lines| {
                            self.tag_block(
                                section.kind,
                                Block {
                                    bureau: None,
                                    lines,
                                },
                            )
                        })
                        .collect();
                    regions.insert(
                        section.kind,
                        Region {
                            kind: section.kind,
                            blocks,
                        },
                    );
                }
                None => missing.push(section.kind),
            }
        }

        if regions.is_empty() {
            // Signature matched but no section anchor did: the page is not
            // a report layout this adapter knows. Emitting nothing beats
            // feeding a downstream merge from the wrong regions.
            return Err(EngineError::unrecognized_format(
                self.provider(),
                "no known section anchors found".to_string(),
            ));
        }

        Ok(IntermediateTree {
            provider: self.provider(),
            regions,
            missing,
        })
    }
}

/// Strip a leading bureau-label line off a per-bureau block, tagging the
/// block with that bureau. Shared by the vendors that repeat sections per
/// bureau.
fn tag_block_by_leading_label(mut block: Block) -> Block {
    if let Some(first) = block.lines.first() {
        let label = first.split('\t').next().unwrap_or("");
        if let Some(bureau) = Bureau::from_label(label) {
            block.bureau = Some(bureau);
            block.lines.remove(0);
        }
    }
    block
}

type AdapterFactory = fn() -> Box<dyn ProviderAdapter>;

static ADAPTER_MAP: &[(Provider, AdapterFactory)] = &[
    (Provider::IdentityIq, || {
        Box::new(identityiq::IdentityIqAdapter)
    }),
    (Provider::SmartCredit, || {
        Box::new(smartcredit::SmartCreditAdapter)
    }),
    (Provider::MyScoreIq, || Box::new(myscoreiq::MyScoreIqAdapter)),
    (Provider::PrivacyGuard, || {
        Box::new(privacyguard::PrivacyGuardAdapter)
    }),
    (Provider::CreditHero, || {
        Box::new(credithero::CreditHeroAdapter)
    }),
    (Provider::AnnualCreditReport, || {
        Box::new(annualcreditreport::AnnualCreditReportAdapter)
    }),
];

/// Select the adapter for an explicit provider hint.
pub fn get_adapter(provider: Provider) -> Box<dyn ProviderAdapter> {
    ADAPTER_MAP
        .iter()
        .find(|(candidate, _)| *candidate == provider)
        .map(|(_, factory)| factory())
        .unwrap_or_else(|| unreachable!("adapter map covers every Provider variant"))
}
