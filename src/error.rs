//! Error types for chart computation

use thiserror::Error;

use crate::ephemeris::EphemerisError;
use crate::stylesheet::StylesheetError;

/// Errors that can occur while computing or rendering a chart
#[derive(Debug, Error)]
pub enum ChartError {
    /// Malformed date, time, offset or location at the input boundary
    #[error("invalid input '{input}': {reason}")]
    InputFormat { input: String, reason: String },

    /// Required ephemeris data is missing
    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    /// Houses, ascendant and midheaven are undefined for the location
    #[error("house computation failed: {0}")]
    HouseComputation(String),

    /// Configuration or ephemeris table could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or ephemeris table is not valid TOML
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),

    /// Anything else, with enough detail to diagnose
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ChartError {
    /// Create an input format error
    pub fn input_format(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an ephemeris unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::EphemerisUnavailable(reason.into())
    }

    /// Create an unexpected error
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Self::Unexpected(reason.into())
    }

    /// Create an I/O error tagged with the path being read
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error ends the current request.
    ///
    /// House computation failures are recovered by returning a partial chart;
    /// everything else is terminal. Nothing is retried since every operation
    /// is a deterministic function of its inputs.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::HouseComputation(_))
    }
}

impl From<EphemerisError> for ChartError {
    fn from(err: EphemerisError) -> Self {
        match err {
            EphemerisError::Unavailable(reason) => Self::EphemerisUnavailable(reason),
            EphemerisError::HouseComputation(reason) => Self::HouseComputation(reason),
        }
    }
}
