use crate::field::VersionStamp;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Inserted byte ranges in the new document.
    pub changed: Vec<std::ops::Range<usize>>,
    pub version: u64,
    /// Shortcode field stamp after the edit; unchanged while the scan is deferred.
    pub stamp: VersionStamp,
    pub tree_ready: bool,
}
