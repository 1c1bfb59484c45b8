//! Domain error types.

/// Top-level error type for ohlcv-signal.
///
/// The indicator pipeline itself never produces one of these; they come from
/// configuration, adapters and report rendering.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed market data: {reason}")]
    Parse { reason: String },

    #[error("no {interval} data for {symbol}")]
    NoData { symbol: String, interval: String },

    #[error("report rendering failed: {0}")]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyzerError {
    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        AnalyzerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(reason: impl Into<String>) -> Self {
        AnalyzerError::Parse {
            reason: reason.into(),
        }
    }
}

impl From<&AnalyzerError> for std::process::ExitCode {
    fn from(err: &AnalyzerError) -> Self {
        let code: u8 = match err {
            AnalyzerError::Io(_) | AnalyzerError::Render(_) => 1,
            AnalyzerError::ConfigParse { .. } | AnalyzerError::ConfigInvalid { .. } => 2,
            AnalyzerError::Fetch { .. } | AnalyzerError::Parse { .. } => 3,
            AnalyzerError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_formats_section_and_key() {
        let err = AnalyzerError::invalid("indicators", "rsi_period", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid config value [indicators] rsi_period: must be positive"
        );
    }

    #[test]
    fn no_data_message() {
        let err = AnalyzerError::NoData {
            symbol: "BTCUSDT".into(),
            interval: "4h".into(),
        };
        assert_eq!(err.to_string(), "no 4h data for BTCUSDT");
    }
}
