//! Lightweight scanner for vendor report markup
//!
//! This is not a general HTML engine. The enumerated vendor layouts are
//! table-heavy server-rendered pages; flattening them to cell-separated
//! text lines, with heading positions preserved, is enough structure for
//! the adapters to carve out labeled regions.

use crate::core::errors::{EngineError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// A flattened text line with its byte offset in the source markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub offset: usize,
    /// Tag-stripped, entity-decoded text; table cells joined by tabs.
    pub text: String,
}

/// A heading candidate found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub offset: usize,
    /// End offset of the heading element; region content starts here.
    pub end: usize,
    pub text: String,
}

/// Scanned document: all flattened lines plus every heading candidate.
#[derive(Debug, Clone)]
pub struct MarkupDocument {
    lines: Vec<TextLine>,
    headings: Vec<Heading>,
}

static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    // h1-h6 plus the div classes the enumerated vendors use for section
    // titles. Content capture is non-greedy; vendor headings never nest.
    Regex::new(
        r#"(?is)<(?:h[1-6][^>]*|div[^>]+class="[^"]*(?:section-title|section_header|heading|rpt_header)[^"]*"[^>]*)>(.*?)</(?:h[1-6]|div)>"#,
    )
    .unwrap()
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    // Breaks at opening block tags too, so a heading's text line starts at
    // the heading element's own offset and never bleeds into the region
    // before it.
    Regex::new(r"(?i)</(?:tr|p|li|h[1-6]|div)\s*>|<br\s*/?>|<(?:tr|p|li|h[1-6]|div|table)(?:\s[^>]*)?>")
        .unwrap()
});

static CELL_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</t[dh]\s*>").unwrap());

static BLOCK_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</table\s*>|<hr\s*/?>").unwrap());

/// Collapse runs of whitespace within a cell, preserving tab separators.
pub fn normalize_text(text: &str) -> String {
    text.split('\t')
        .map(|cell| cell.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\t")
        .trim_matches(|c| c == ' ')
        .to_string()
}

fn strip_fragment(fragment: &str) -> String {
    let without_tags = TAG_RE.replace_all(fragment, " ");
    normalize_text(&html_escape::decode_html_entities(&without_tags))
}

impl MarkupDocument {
    /// Scan raw document bytes. Non-UTF-8 input is a typed error, never a
    /// lossy best-effort decode that could look like real data.
    pub fn parse(bytes: &[u8]) -> Result<MarkupDocument> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| EngineError::UndecodableDocument(e.to_string()))?;
        Ok(Self::from_source(source))
    }

    fn from_source(source: &str) -> MarkupDocument {
        let headings = HEADING_RE
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let inner = caps.get(1)?;
                let text = strip_fragment(inner.as_str());
                if text.is_empty() {
                    None
                } else {
                    Some(Heading {
                        offset: whole.start(),
                        end: whole.end(),
                        text,
                    })
                }
            })
            .collect();

        // Break the markup into lines and cells before stripping tags, so
        // offsets can be tracked per line.
        let mut lines = Vec::new();
        let mut cursor = 0usize;
        let mut pending_blank = false;
        let breaks: Vec<(usize, usize, bool)> = {
            let mut marks: Vec<(usize, usize, bool)> = LINE_BREAK_RE
                .find_iter(source)
                .map(|m| (m.start(), m.end(), false))
                .chain(
                    BLOCK_BREAK_RE
                        .find_iter(source)
                        .map(|m| (m.start(), m.end(), true)),
                )
                .collect();
            marks.sort();
            marks
        };
        for (start, end, is_block_break) in breaks {
            if start < cursor {
                continue;
            }
            let fragment = &source[cursor..start];
            let text = flatten_cells(fragment);
            if !text.is_empty() {
                lines.push(TextLine {
                    offset: cursor,
                    text,
                });
                pending_blank = false;
            }
            if is_block_break && !pending_blank && !lines.is_empty() {
                // A blank line marks a block boundary (end of table).
                lines.push(TextLine {
                    offset: start,
                    text: String::new(),
                });
                pending_blank = true;
            }
            cursor = end;
        }
        let tail = flatten_cells(&source[cursor..]);
        if !tail.is_empty() {
            lines.push(TextLine {
                offset: cursor,
                text: tail,
            });
        }

        MarkupDocument { lines, headings }
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Whether the document carries the vendor's signature text anywhere.
    pub fn contains_marker(&self, marker: &str) -> bool {
        let needle = marker.to_lowercase();
        self.lines
            .iter()
            .any(|line| line.text.to_lowercase().contains(&needle))
            || self
                .headings
                .iter()
                .any(|h| h.text.to_lowercase().contains(&needle))
    }

    /// Find the heading for a section by scanning *all* candidates and
    /// matching on text content. Vendor pages reuse generic markup, so the
    /// correct heading must be identified by what it says, never by "first
    /// heading tag wins".
    pub fn find_heading(&self, anchors: &[&str]) -> Option<&Heading> {
        for anchor in anchors {
            let needle = anchor.to_lowercase();
            if let Some(heading) = self
                .headings
                .iter()
                .find(|h| h.text.to_lowercase() == needle)
            {
                return Some(heading);
            }
        }
        // Exact text failed; accept a candidate that contains the anchor,
        // still scanning the full set in document order.
        for anchor in anchors {
            let needle = anchor.to_lowercase();
            if let Some(heading) = self
                .headings
                .iter()
                .find(|h| h.text.to_lowercase().contains(&needle))
            {
                return Some(heading);
            }
        }
        None
    }

    /// Lines between a heading and the next heading (or end of document).
    pub fn region_lines(&self, heading: &Heading) -> Vec<String> {
        let region_end = self
            .headings
            .iter()
            .map(|h| h.offset)
            .filter(|&offset| offset > heading.offset)
            .min()
            .unwrap_or(usize::MAX);
        self.lines
            .iter()
            .filter(|line| line.offset >= heading.end && line.offset < region_end)
            .map(|line| line.text.clone())
            .collect()
    }
}

fn flatten_cells(fragment: &str) -> String {
    let with_tabs = CELL_BREAK_RE.replace_all(fragment, "\t");
    let stripped = TAG_RE.replace_all(&with_tabs, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    normalize_text(decoded.trim_end_matches('\t'))
}

/// Split region lines into blocks on blank separator lines.
pub fn split_blocks(lines: &[String]) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.clone());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}
