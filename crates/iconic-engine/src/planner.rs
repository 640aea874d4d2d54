//! # Scan Window Planning
//!
//! Decides how much of the document a change forces us to rescan.
//!
//! The window starts as the edited range, widened to whole lines. Two rules
//! can widen it further:
//!
//! - **Interference**: the edit touches a node that opens or closes a region
//!   (a fence line, a code span delimiter, ...) in the old or new tree. Such a
//!   region may have grown or shrunk, so everything up to the end of the tree
//!   is rescanned.
//! - **Shift**: the edit touches a node whose whole block must be rescanned
//!   together (a table delimiter row, the closing frontmatter line). The
//!   window then starts at that block.

use std::ops::ControlFlow;

use xi_rope::Rope;

use crate::changes::ChangedRange;
use crate::rules::RegionRules;
use crate::text::{TextCursor, line_at};
use crate::tree::{SyntaxTree, TreeCursor};

/// The byte range to rescan, and the change that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub begin: usize,
    pub end: usize,
    /// `None` for a whole-document scan with no previous tokens.
    pub changed: Option<ChangedRange>,
}

/// Everything a [`StreamParser`](crate::scanner::StreamParser) needs to start.
#[derive(Debug, Clone)]
pub struct StreamSpec<'a> {
    pub window: ScanWindow,
    /// `None` when the tree has nothing at or after `window.begin`.
    pub tree_cursor: Option<TreeCursor>,
    pub text_cursor: TextCursor<'a>,
}

impl<'a> StreamSpec<'a> {
    pub fn whole_document(doc: &'a Rope, tree: &SyntaxTree) -> Self {
        Self {
            window: ScanWindow {
                begin: 0,
                end: doc.len(),
                changed: None,
            },
            tree_cursor: tree.cursor_at(0),
            text_cursor: TextCursor::at_offset(doc, 0),
        }
    }
}

/// Plan the rescan of `doc` after `changed`, which turned the text `prev`
/// was parsed from into the text `curr` was parsed from.
pub fn plan<'a>(
    doc: &'a Rope,
    curr: &SyntaxTree,
    prev: &SyntaxTree,
    changed: ChangedRange,
    rules: &RegionRules,
) -> StreamSpec<'a> {
    let mut begin = curr.len().min(prev.len()).min(changed.from);
    let end = curr.len().max(prev.len()).min(changed.to_b);

    let interfered = curr.any_in_range(changed.from, changed.to_b, |e| rules.interferes(e.kind()))
        || prev.any_in_range(changed.from, changed.to_a, |e| rules.interferes(e.kind()));

    // Old-tree blocks that start before the edit sit at the same offset in
    // the new document, so both trees can pull `begin` back.
    for (tree, to) in [(curr, changed.to_b), (prev, changed.to_a)] {
        if let Some(block_start) = shift_target(tree, begin, to, rules) {
            if block_start < begin {
                log::debug!("shifting scan start from {begin} to block at {block_start}");
                begin = block_start;
            }
        }
    }

    let begin = line_at(doc, begin).from;
    let end = if interfered {
        curr.len()
    } else {
        line_at(doc, end).to
    };

    log::debug!(
        "scan window {begin}..{end} for change {}..{} (was ..{}), interfered: {interfered}",
        changed.from,
        changed.to_b,
        changed.to_a
    );

    StreamSpec {
        window: ScanWindow {
            begin,
            end,
            changed: Some(changed),
        },
        tree_cursor: curr.cursor_at(begin),
        text_cursor: TextCursor::at_offset(doc, begin),
    }
}

/// Earliest start of a block that an element in `from..=to` forces to be
/// rescanned as a whole.
fn shift_target(tree: &SyntaxTree, from: usize, to: usize, rules: &RegionRules) -> Option<usize> {
    let mut target: Option<usize> = None;
    tree.for_each_in_range(from, to, |element| {
        let block = rules
            .shift_target(element.kind())
            .and_then(|kind| element.parent().filter(|parent| parent.kind() == kind));
        if let Some(block) = block {
            let start = usize::from(block.text_range().start());
            target = Some(target.map_or(start, |t| t.min(start)));
        }
        ControlFlow::Continue(())
    });
    target
}
