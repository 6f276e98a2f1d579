use crate::models::Metric;
use std::time::Duration;
use thiserror::Error;

/// Malformed measurement tool output. Raised before anything reaches the aggregator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected 3 lines of output, missing the {metric} line (got {lines})")]
    MissingLine { metric: Metric, lines: usize },

    #[error("{metric} line has no value token: {line:?}")]
    MissingValue { metric: Metric, line: String },

    #[error("{metric} value {token:?} is not a number")]
    InvalidNumber { metric: Metric, token: String },
}

/// Failure to obtain one sample. Any of these ends the monitoring session.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("{tool} not found on PATH")]
    ToolMissing { tool: String },

    #[error("failed to run {tool}: {reason}")]
    Execution { tool: String, reason: String },

    #[error("could not parse {tool} output: {source}")]
    Parse {
        tool: String,
        #[source]
        source: ParseError,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    Timeout { tool: String, timeout: Duration },
}

impl SampleError {
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            SampleError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
