use iconic_config::ConfigError;
use thiserror::Error;

/// Contract violations and setup failures of the scanner.
///
/// Malformed shortcodes and a syntax tree that lags behind the text are not
/// errors: the former degrade to plain text, the latter defers the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("change lengths do not line up: expected {expected} bytes, got {actual}")]
    ChangeLengthMismatch { expected: usize, actual: usize },

    #[error(
        "inconsistent scan window {begin}..{end}: text cursor starts at {line_start}, document is {doc_len} bytes"
    )]
    InconsistentSpec {
        begin: usize,
        end: usize,
        line_start: usize,
        doc_len: usize,
    },

    #[error("invalid shortcode configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build shortcode pattern: {0}")]
    Pattern(#[from] regex::Error),
}
