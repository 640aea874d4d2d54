//! # Shortcode Field
//!
//! The long-lived, externally visible state: the current tokens, the changes
//! not yet scanned and a version stamp.
//!
//! ```text
//!            create()                    update(tx), tree ready
//!   ─────────────────────▶ Stable ◀─────────────────────────┐
//!                            │                              │
//!                            │ update(tx), tree behind      │
//!                            ▼                              │
//!                      PendingRescan ───────────────────────┘
//! ```
//!
//! [`ShortcodeField::update`] never mutates its receiver. A failed update
//! returns an error and the caller keeps publishing the old value.

use std::fmt;
use std::rc::Rc;

use iconic_config::ScanConfig;
use xi_rope::Rope;

use crate::changes::ChangeDesc;
use crate::error::ScanError;
use crate::planner::{StreamSpec, plan};
use crate::reconcile::reconcile;
use crate::rules::{MARKDOWN_RULES, RegionRules};
use crate::scanner::{Delimiters, StreamParser};
use crate::store::ChangeAccumulator;
use crate::token::ShortcodeToken;
use crate::tree::SyntaxTree;

/// Opaque marker that changes every time the token list is republished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionStamp(u64);

impl VersionStamp {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for VersionStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut n = self.0;
        let mut digits = Vec::new();
        loop {
            digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
            n /= 36;
            if n == 0 {
                break;
            }
        }
        f.pad(&digits.iter().rev().collect::<String>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPhase {
    Stable,
    /// Changes are recorded but the tree has not caught up with them yet.
    PendingRescan,
}

/// One host transaction: the change it made, and the document and tree after it.
#[derive(Clone)]
pub struct Transaction<'a> {
    pub changes: ChangeDesc,
    pub doc: &'a Rope,
    /// May cover less than `doc` while the parser is catching up.
    pub tree: &'a SyntaxTree,
}

impl<'a> Transaction<'a> {
    pub fn new(changes: ChangeDesc, doc: &'a Rope, tree: &'a SyntaxTree) -> Self {
        Self { changes, doc, tree }
    }

    /// A transaction without edits, e.g. to signal that the tree caught up.
    pub fn empty(doc: &'a Rope, tree: &'a SyntaxTree) -> Self {
        Self::new(ChangeDesc::identity(doc.len()), doc, tree)
    }
}

#[derive(Debug, Clone)]
pub struct ShortcodeField {
    tokens: Rc<[ShortcodeToken]>,
    store: ChangeAccumulator,
    stamp: VersionStamp,
    delimiters: Delimiters,
    rules: &'static RegionRules,
}

impl ShortcodeField {
    /// Scan a freshly opened document.
    pub fn create(doc: &Rope, tree: &SyntaxTree, config: &ScanConfig) -> Result<Self, ScanError> {
        Self::create_with_rules(doc, tree, config, &MARKDOWN_RULES)
    }

    pub fn create_with_rules(
        doc: &Rope,
        tree: &SyntaxTree,
        config: &ScanConfig,
        rules: &'static RegionRules,
    ) -> Result<Self, ScanError> {
        let delimiters = Delimiters::from_config(config)?;

        if !tree.covers(doc.len()) {
            log::debug!(
                "tree covers {} of {} bytes, deferring initial shortcode scan",
                tree.len(),
                doc.len()
            );
            // Once the tree is ready, the whole document scans as one insertion
            return Ok(Self {
                tokens: Rc::from(Vec::new()),
                store: ChangeAccumulator::with_pending(
                    SyntaxTree::empty(),
                    ChangeDesc::insertion(0, doc.len(), 0),
                ),
                stamp: VersionStamp::default(),
                delimiters,
                rules,
            });
        }

        let spec = StreamSpec::whole_document(doc, tree);
        let tokens = StreamParser::init(spec, delimiters, rules)?.stream();
        log::debug!("initial scan found {} shortcodes", tokens.len());

        Ok(Self {
            tokens: tokens.into(),
            store: ChangeAccumulator::new(tree.clone()),
            stamp: VersionStamp::default(),
            delimiters,
            rules,
        })
    }

    /// The field after `tx`. Applying an empty transaction to a stable field
    /// returns an equal field.
    pub fn update(&self, tx: &Transaction<'_>) -> Result<Self, ScanError> {
        let mut next = self.clone();
        if !tx.changes.is_identity() {
            next.store.record(&tx.changes)?;
        }

        if !next.store.has_pending() {
            return Ok(next);
        }

        let doc_len = tx.doc.len();
        if !tx.tree.covers(doc_len) {
            log::debug!(
                "tree covers {} of {doc_len} bytes, deferring shortcode scan",
                tx.tree.len()
            );
            return Ok(next);
        }

        let Some(pending) = next.store.take() else {
            return Ok(next);
        };
        if pending.len_after() != doc_len {
            return Err(ScanError::ChangeLengthMismatch {
                expected: doc_len,
                actual: pending.len_after(),
            });
        }

        if let Some(changed) = pending.merged() {
            let spec = plan(tx.doc, tx.tree, next.store.prev_tree(), changed, next.rules);
            let window = spec.window;
            let batch = StreamParser::init(spec, next.delimiters, next.rules)?.stream();
            next.tokens = reconcile(&next.tokens, batch, &window).into();
            next.stamp = next.stamp.next();
        }
        next.store.replace_tree(tx.tree.clone());

        Ok(next)
    }

    pub fn tokens(&self) -> &[ShortcodeToken] {
        &self.tokens
    }

    /// A shared read-only view that stays valid after later updates.
    pub fn snapshot(&self) -> Rc<[ShortcodeToken]> {
        Rc::clone(&self.tokens)
    }

    pub fn version(&self) -> VersionStamp {
        self.stamp
    }

    pub fn phase(&self) -> FieldPhase {
        if self.store.has_pending() {
            FieldPhase::PendingRescan
        } else {
            FieldPhase::Stable
        }
    }

    /// Tokens overlapping `from..to`, e.g. the visible part of the document.
    pub fn tokens_in_range(&self, from: usize, to: usize) -> &[ShortcodeToken] {
        let start = self.tokens.partition_point(|t| t.to <= from);
        let len = self.tokens[start..]
            .iter()
            .take_while(|t| t.from < to)
            .count();
        &self.tokens[start..start + len]
    }

    /// The token containing `offset`.
    pub fn token_at(&self, offset: usize) -> Option<&ShortcodeToken> {
        let index = self.tokens.partition_point(|t| t.to <= offset);
        self.tokens.get(index).filter(|t| t.from <= offset)
    }
}
