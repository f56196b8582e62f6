//! Output writers for case analyses
//!
//! The JSON shape is a public contract: downstream letter generation,
//! portal display, and audit sinks parse these field names and enum
//! strings, so changes here are breaking changes.

use crate::core::CaseAnalysis;
use colored::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_analysis(&mut self, analysis: &CaseAnalysis) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_analysis(&mut self, analysis: &CaseAnalysis) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(analysis)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, analysis: &CaseAnalysis) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {}",
            "Report:".bold(),
            analysis.report.id
        )?;
        writeln!(
            self.writer,
            "  provider {} | captured {} | status {:?}",
            analysis.report.provider, analysis.report.captured_on, analysis.report.parse_status
        )?;
        writeln!(
            self.writer,
            "  {} accounts, {} inquiries, {} bureau scores",
            analysis.report.accounts.len(),
            analysis.report.inquiries.len(),
            analysis.report.scores.len()
        )?;
        Ok(())
    }

    fn write_violations(&mut self, analysis: &CaseAnalysis) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {}",
            "Violations:".bold(),
            analysis.violations.len()
        )?;
        for violation in &analysis.violations {
            let tag = match violation.severity {
                8..=10 => violation.section.tag().red(),
                5..=7 => violation.section.tag().yellow(),
                _ => violation.section.tag().normal(),
            };
            writeln!(self.writer, "  [{tag}] {}", violation.evidence)?;
        }
        Ok(())
    }

    fn write_totals(&mut self, analysis: &CaseAnalysis) -> anyhow::Result<()> {
        let moderate = analysis.damages.moderate;
        writeln!(
            self.writer,
            "{} conservative ${:.2} | moderate ${:.2} | aggressive ${:.2} | fees ${:.2}",
            "Damages:".bold(),
            analysis.damages.conservative.total_cents() as f64 / 100.0,
            moderate.total_cents() as f64 / 100.0,
            analysis.damages.aggressive.total_cents() as f64 / 100.0,
            analysis.damages.attorney_fee_cents as f64 / 100.0,
        )?;
        writeln!(
            self.writer,
            "{} {}/10 ({:?}, settlement {}%)",
            "Case score:".bold(),
            analysis.case_score.total,
            analysis.case_score.recommendation,
            analysis.case_score.settlement_probability_pct,
        )?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_analysis(&mut self, analysis: &CaseAnalysis) -> anyhow::Result<()> {
        self.write_header(analysis)?;
        self.write_violations(analysis)?;
        self.write_totals(analysis)?;
        Ok(())
    }
}

pub fn create_writer(format: OutputFormat) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout())),
    }
}
