//! # Grammar Rules
//!
//! Each function takes a `&mut Parser` and uses it to inspect tokens
//! (`current`, `at`, `nth`), consume them (`bump`, `eat`, `bump_line`) and
//! build structure (`start` → marker → `complete`/`abandon`).
//!
//! - [`block`] - block-level elements, including the multi-line raw blocks
//!   (fenced code, math, comments, HTML) and tables
//! - [`inline`] - inline elements (code spans, math, tags, links, ...)
//!
//! ## Locality
//!
//! Whether a line opens a raw block depends only on the line itself and on
//! the raw block (if any) it sits inside. Raw-block openers interrupt
//! paragraphs and tables, and inline constructs never cross a line. The
//! incremental shortcode scanner relies on this: a local edit can only move a
//! skip-region boundary far away by touching a BEGIN/END line node.
//!
//! ## Error Recovery
//!
//! Grammar functions never fail: unmatched openers degrade to plain tokens and
//! every input byte ends up in the tree.

mod block;
mod inline;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document: optional frontmatter, then blocks.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    if block::is_frontmatter_start(p) {
        block::frontmatter(p);
    }

    while !p.at_end() {
        block::block(p);
    }

    m.complete(p, SyntaxKind::ROOT);
}

/// Length of the run of `kind` tokens starting `start` tokens ahead.
fn run_len(p: &Parser<'_, '_>, start: usize, kind: SyntaxKind) -> usize {
    let mut n = 0;
    while p.nth(start + n) == kind {
        n += 1;
    }
    n
}

/// First `kind` token at or after `start` on the current line.
fn find_in_line(p: &Parser<'_, '_>, start: usize, kind: SyntaxKind) -> Option<usize> {
    (start..p.line_len()).find(|&i| p.nth(i) == kind)
}

/// First pair of consecutive `kind` tokens at or after `start` on the current line.
fn find_pair(p: &Parser<'_, '_>, start: usize, kind: SyntaxKind) -> Option<usize> {
    let len = p.line_len();
    (start..len.saturating_sub(1)).find(|&i| p.nth(i) == kind && p.nth(i + 1) == kind)
}
