//! Shortcode search over plain text, for output that has no syntax tree
//! (rendered HTML text nodes, exported strings).

use std::ops::Range;

use iconic_config::ScanConfig;
use regex::Regex;

use crate::error::ScanError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainShortcode {
    pub range: Range<usize>,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct PlainTextScanner {
    pattern: Regex,
}

impl PlainTextScanner {
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        let d = regex::escape(&config.delimiter.to_string());
        let s = regex::escape(&config.separator.to_string());
        let c = regex::escape(&config.color_prefix.to_string());
        let pattern = Regex::new(&format!("(?i){d}([a-z0-9_-]+)(?:{s}([{c}a-z0-9_-]*))?{d}"))?;
        Ok(Self { pattern })
    }

    pub fn find_all(&self, text: &str) -> Vec<PlainShortcode> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(PlainShortcode {
                    range: whole.range(),
                    icon: caps.get(1)?.as_str().to_string(),
                    color: caps
                        .get(2)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}
