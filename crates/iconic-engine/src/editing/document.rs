use iconic_config::ScanConfig;
use xi_rope::Rope;

use crate::changes::ChangeDesc;
use crate::editing::commands::compile_command;
use crate::editing::{Cmd, Patch};
use crate::field::{ShortcodeField, Transaction, VersionStamp};
use crate::token::ShortcodeToken;
use crate::tree::SyntaxTree;

/// A text buffer with a syntax tree and a shortcode field kept in step with it.
///
/// Every edit goes through [`Document::apply`]:
///
/// 1. **Command Compilation**: `Cmd` → xi-rope `Delta`
/// 2. **Buffer Application**: the delta is applied to the rope
/// 3. **Reparse**: the tree is rebuilt, only up to the parse budget if one is set
/// 4. **Field Update**: the delta's `ChangeDesc` is handed to
///    [`ShortcodeField::update`], which scans or defers
///
/// Nothing is committed when any step fails.
///
/// ```rust
/// # use iconic_engine::editing::{Cmd, Document};
/// # use iconic_config::ScanConfig;
/// let mut doc = Document::with_options(b"a :x:\n", ScanConfig::default(), Some(2)).unwrap();
/// assert!(!doc.tree_ready());
///
/// doc.apply(Cmd::InsertText { at: 0, text: ":y: ".to_string() }).unwrap();
/// assert!(doc.tokens().is_empty());
///
/// doc.finish_parsing().unwrap();
/// assert_eq!(doc.tokens().len(), 2);
/// ```
pub struct Document {
    pub(crate) buffer: Rope,
    /// Version counter incremented on each edit
    pub(crate) version: u64,
    pub(crate) config: ScanConfig,
    /// Bytes reparsed per edit; `None` parses the whole document.
    pub(crate) parse_budget: Option<usize>,
    pub(crate) tree: SyntaxTree,
    pub(crate) field: ShortcodeField,
}

impl Document {
    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        Self::with_options(bytes, ScanConfig::default(), None)
    }

    pub fn with_options(
        bytes: &[u8],
        config: ScanConfig,
        parse_budget: Option<usize>,
    ) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        let buffer = Rope::from(text);
        let tree = reparse(text, parse_budget);
        let field = ShortcodeField::create(&buffer, &tree, &config)?;

        Ok(Self {
            buffer,
            version: 0,
            config,
            parse_budget,
            tree,
            field,
        })
    }

    pub fn apply(&mut self, cmd: Cmd) -> anyhow::Result<Patch> {
        let delta = compile_command(&self.buffer, &cmd)?;
        let changes = ChangeDesc::from_delta(&delta);
        let changed = changes
            .changed_ranges()
            .into_iter()
            .map(|(_, inserted)| inserted)
            .collect();

        let buffer = delta.apply(&self.buffer);
        let tree = reparse(&buffer.to_string(), self.parse_budget);
        let field = self
            .field
            .update(&Transaction::new(changes, &buffer, &tree))?;

        self.buffer = buffer;
        self.tree = tree;
        self.field = field;
        self.version += 1;

        Ok(Patch {
            changed,
            version: self.version,
            stamp: self.field.version(),
            tree_ready: self.tree_ready(),
        })
    }

    /// Let the parser catch up with the whole document and run any deferred scan.
    pub fn finish_parsing(&mut self) -> anyhow::Result<()> {
        let tree = SyntaxTree::parse(&self.buffer.to_string());
        self.field = self
            .field
            .update(&Transaction::empty(&self.buffer, &tree))?;
        self.tree = tree;
        Ok(())
    }

    /// Tokens of a fresh whole-document scan, ignoring all incremental state.
    pub fn rescan_from_scratch(&self) -> anyhow::Result<Vec<ShortcodeToken>> {
        let tree = SyntaxTree::parse(&self.buffer.to_string());
        let field = ShortcodeField::create(&self.buffer, &tree, &self.config)?;
        Ok(field.tokens().to_vec())
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn field(&self) -> &ShortcodeField {
        &self.field
    }

    pub fn tokens(&self) -> &[ShortcodeToken] {
        self.field.tokens()
    }

    pub fn stamp(&self) -> VersionStamp {
        self.field.version()
    }

    pub fn tree_ready(&self) -> bool {
        self.tree.covers(self.buffer.len())
    }
}

fn reparse(text: &str, budget: Option<usize>) -> SyntaxTree {
    match budget {
        Some(budget) => SyntaxTree::parse_prefix(text, budget),
        None => SyntaxTree::parse(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldPhase;
    use pretty_assertions::assert_eq;

    fn icons(doc: &Document) -> Vec<&str> {
        doc.tokens().iter().map(|t| t.icon.as_str()).collect()
    }

    #[test]
    fn from_bytes_scans_immediately() {
        let doc = Document::from_bytes(b"# :house: Home\n").unwrap();
        assert_eq!(icons(&doc), vec!["house"]);
        assert!(doc.tree_ready());
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        assert!(Document::from_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn apply_increments_version_and_reports_ranges() {
        let mut doc = Document::from_bytes(b"see :bolt: now").unwrap();
        let patch = doc
            .apply(Cmd::ReplaceRange {
                range: 5..9,
                text: "star".to_string(),
            })
            .unwrap();
        assert_eq!(patch.version, 1);
        assert_eq!(patch.changed, vec![5..9]);
        assert!(patch.tree_ready);
        assert_eq!(icons(&doc), vec!["star"]);
    }

    #[test]
    fn failed_command_changes_nothing() {
        let mut doc = Document::from_bytes(b"abc :x:").unwrap();
        let stamp = doc.stamp();
        assert!(doc.apply(Cmd::DeleteRange { range: 2..40 }).is_err());
        assert_eq!(doc.text(), "abc :x:");
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.stamp(), stamp);
    }

    #[test]
    fn lagging_parser_defers_until_finished() {
        let mut doc =
            Document::with_options(b":a: text\n", ScanConfig::default(), Some(4)).unwrap();
        assert_eq!(doc.field().phase(), FieldPhase::PendingRescan);

        let patch = doc
            .apply(Cmd::InsertText {
                at: 9,
                text: ":b:\n".to_string(),
            })
            .unwrap();
        assert!(!patch.tree_ready);
        assert!(doc.tokens().is_empty());

        doc.finish_parsing().unwrap();
        assert_eq!(icons(&doc), vec!["a", "b"]);
        assert_eq!(doc.field().phase(), FieldPhase::Stable);
        assert_eq!(doc.tokens(), doc.rescan_from_scratch().unwrap().as_slice());
    }

    #[test]
    fn custom_config_is_used_for_rescans() {
        let config = ScanConfig {
            delimiter: ';',
            ..ScanConfig::default()
        };
        let doc = Document::with_options(b";a; :b:", config, None).unwrap();
        assert_eq!(icons(&doc), vec!["a"]);
        assert_eq!(doc.rescan_from_scratch().unwrap().len(), 1);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = ScanConfig {
            separator: ':',
            ..ScanConfig::default()
        };
        assert!(Document::with_options(b"", config, None).is_err());
    }
}
