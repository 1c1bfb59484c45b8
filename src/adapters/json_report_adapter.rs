//! JSON report adapter.

use crate::domain::analysis::Report;
use crate::domain::error::AnalyzerError;
use crate::ports::report_port::ReportPort;
use std::io::Write;

/// Renders the report as one JSON document followed by a newline.
#[derive(Debug, Clone, Copy)]
pub struct JsonReportAdapter {
    pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<(), AnalyzerError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, report)?;
        } else {
            serde_json::to_writer(&mut *out, report)?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_error_report() {
        let mut buf = Vec::new();
        JsonReportAdapter::default()
            .write(&Report::error("Failed to fetch data"), &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "{\n  \"error\": \"Failed to fetch data\"\n}\n");
    }

    #[test]
    fn compact_error_report() {
        let mut buf = Vec::new();
        JsonReportAdapter::new(false)
            .write(&Report::error("boom"), &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"error\":\"boom\"}\n");
    }
}
