//! Report rendering port trait.

use crate::domain::analysis::Report;
use crate::domain::error::AnalyzerError;
use std::io::Write;

/// Port for rendering one analysis report.
pub trait ReportPort {
    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<(), AnalyzerError>;
}
