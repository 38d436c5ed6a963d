//! Engine report parsers.
//!
//! Each parser implements the `Parser` trait, turning the free-text report
//! printed by a calculation engine into a structured `ParsedChart`. Parsing is
//! total: content that does not match an expected marker is left out of the
//! result instead of failing the whole report.

pub mod bazi_report;

use crate::models::chart::ParsedChart;

pub use bazi_report::BaziReportParser;

/// Trait for pluggable report parsers.
pub trait Parser: Send + Sync {
    /// Parse a raw engine report. Never fails; `raw_output` always equals `text`.
    fn parse(&self, text: &str) -> ParsedChart;

    /// The engine whose report format this parser understands.
    fn source_tool(&self) -> &str;
}
