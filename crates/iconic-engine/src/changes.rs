//! # Change Descriptors
//!
//! A [`ChangeDesc`] records *where* a document changed without the inserted
//! text: a run of sections that either keep `n` bytes or replace `removed`
//! bytes with `inserted` bytes. Two descriptors applied one after the other
//! compose into a single equivalent descriptor, which is how edits that arrive
//! while the syntax tree is still catching up are buffered.
//!
//! ```text
//! "see :bolt: now"  insert "x" at 5   → [Keep(5), Replace{0,1}, Keep(9)]
//! ```
//!
//! Descriptors are built from xi-rope deltas with [`ChangeDesc::from_delta`]:
//! a `Copy(from, to)` after a gap means the gap was deleted, an `Insert` adds
//! bytes at the current position.

use std::ops::Range;

use xi_rope::delta::DeltaElement;
use xi_rope::{Delta, RopeInfo};

use crate::error::ScanError;

/// One run of a change descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Keep(usize),
    Replace { removed: usize, inserted: usize },
}

impl Section {
    fn len_before(self) -> usize {
        match self {
            Section::Keep(n) => n,
            Section::Replace { removed, .. } => removed,
        }
    }

    fn len_after(self) -> usize {
        match self {
            Section::Keep(n) => n,
            Section::Replace { inserted, .. } => inserted,
        }
    }

    fn is_empty(self) -> bool {
        self.len_before() == 0 && self.len_after() == 0
    }
}

/// The net effect of all edits in a descriptor as one range.
///
/// `from..to_a` in the old document became `from..to_b` in the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRange {
    pub from: usize,
    pub to_a: usize,
    pub to_b: usize,
}

impl ChangedRange {
    /// Net length change.
    pub fn delta(&self) -> isize {
        self.to_b as isize - self.to_a as isize
    }
}

/// A normalized, composable description of a document change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDesc {
    sections: Vec<Section>,
}

impl ChangeDesc {
    /// A change that keeps all `len` bytes.
    pub fn identity(len: usize) -> Self {
        let mut desc = Self::default();
        desc.push(Section::Keep(len));
        desc
    }

    /// Insert `len` bytes at `at` into a document of `base_len` bytes.
    pub fn insertion(at: usize, len: usize, base_len: usize) -> Self {
        let mut desc = Self::default();
        desc.push(Section::Keep(at.min(base_len)));
        desc.push(Section::Replace {
            removed: 0,
            inserted: len,
        });
        desc.push(Section::Keep(base_len.saturating_sub(at)));
        desc
    }

    pub fn from_delta(delta: &Delta<RopeInfo>) -> Self {
        let mut desc = Self::default();
        let mut pos = 0;

        for el in &delta.els {
            match el {
                DeltaElement::Copy(from, to) => {
                    if *from > pos {
                        desc.push(Section::Replace {
                            removed: from - pos,
                            inserted: 0,
                        });
                    }
                    desc.push(Section::Keep(to.saturating_sub(*from)));
                    pos = *to;
                }
                DeltaElement::Insert(node) => desc.push(Section::Replace {
                    removed: 0,
                    inserted: node.len(),
                }),
            }
        }

        if delta.base_len > pos {
            desc.push(Section::Replace {
                removed: delta.base_len - pos,
                inserted: 0,
            });
        }

        desc
    }

    /// Append a section, merging it into the last one when they are the same kind.
    fn push(&mut self, section: Section) {
        if section.is_empty() {
            return;
        }
        match (self.sections.last_mut(), section) {
            (Some(Section::Keep(n)), Section::Keep(m)) => *n += m,
            (
                Some(Section::Replace { removed, inserted }),
                Section::Replace {
                    removed: r,
                    inserted: i,
                },
            ) => {
                *removed += r;
                *inserted += i;
            }
            _ => self.sections.push(section),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len_before(&self) -> usize {
        self.sections.iter().map(|s| s.len_before()).sum()
    }

    pub fn len_after(&self) -> usize {
        self.sections.iter().map(|s| s.len_after()).sum()
    }

    /// True when nothing is replaced.
    pub fn is_identity(&self) -> bool {
        self.sections
            .iter()
            .all(|s| matches!(s, Section::Keep(_)))
    }

    /// Each replaced range, in old and new document coordinates.
    pub fn changed_ranges(&self) -> Vec<(Range<usize>, Range<usize>)> {
        let mut ranges = Vec::new();
        let (mut pos_a, mut pos_b) = (0, 0);
        for section in &self.sections {
            match *section {
                Section::Keep(n) => {
                    pos_a += n;
                    pos_b += n;
                }
                Section::Replace { removed, inserted } => {
                    ranges.push((pos_a..pos_a + removed, pos_b..pos_b + inserted));
                    pos_a += removed;
                    pos_b += inserted;
                }
            }
        }
        ranges
    }

    /// All changed ranges folded into one, or `None` for an identity change.
    pub fn merged(&self) -> Option<ChangedRange> {
        let ranges = self.changed_ranges();
        let (first, _) = ranges.first()?;
        let (last_a, last_b) = ranges.last()?;
        Some(ChangedRange {
            from: first.start,
            to_a: last_a.end,
            to_b: last_b.end,
        })
    }

    /// The change equivalent to applying `self` and then `next`.
    pub fn compose(&self, next: &ChangeDesc) -> Result<ChangeDesc, ScanError> {
        if self.len_after() != next.len_before() {
            return Err(ScanError::ChangeLengthMismatch {
                expected: self.len_after(),
                actual: next.len_before(),
            });
        }

        let mut out = ChangeDesc::default();
        let mut a = Sections::new(&self.sections);
        let mut b = Sections::new(&next.sections);

        loop {
            match (a.head, b.head) {
                // Bytes removed by the first change never reach the second
                (Some(Section::Replace { removed, .. }), _) if removed > 0 => {
                    out.push(Section::Replace {
                        removed,
                        inserted: 0,
                    });
                    a.map_head(|s| match s {
                        Section::Replace { inserted, .. } => Section::Replace {
                            removed: 0,
                            inserted,
                        },
                        keep => keep,
                    });
                }
                // Bytes inserted by the second change consume nothing of the first
                (_, Some(Section::Replace { removed: 0, inserted })) => {
                    out.push(Section::Replace {
                        removed: 0,
                        inserted,
                    });
                    b.map_head(|_| Section::Keep(0));
                }
                (None, None) => break,
                (Some(sa), Some(sb)) => {
                    let n = sa.len_after().min(sb.len_before());
                    match (sa, sb) {
                        (Section::Keep(_), Section::Keep(_)) => out.push(Section::Keep(n)),
                        (Section::Keep(_), Section::Replace { .. }) => out.push(Section::Replace {
                            removed: n,
                            inserted: 0,
                        }),
                        (Section::Replace { .. }, Section::Keep(_)) => out.push(Section::Replace {
                            removed: 0,
                            inserted: n,
                        }),
                        // Inserted by the first, deleted by the second
                        (Section::Replace { .. }, Section::Replace { .. }) => {}
                    }
                    a.map_head(|s| match s {
                        Section::Keep(k) => Section::Keep(k - n),
                        Section::Replace { removed, inserted } => Section::Replace {
                            removed,
                            inserted: inserted - n,
                        },
                    });
                    b.map_head(|s| match s {
                        Section::Keep(k) => Section::Keep(k - n),
                        Section::Replace { removed, inserted } => Section::Replace {
                            removed: removed - n,
                            inserted,
                        },
                    });
                }
                _ => {
                    return Err(ScanError::ChangeLengthMismatch {
                        expected: self.len_after(),
                        actual: next.len_before(),
                    });
                }
            }
        }

        Ok(out)
    }
}

/// Walks sections while letting the head be partially consumed.
struct Sections<'a> {
    rest: std::slice::Iter<'a, Section>,
    head: Option<Section>,
}

impl<'a> Sections<'a> {
    fn new(sections: &'a [Section]) -> Self {
        let mut rest = sections.iter();
        let head = rest.next().copied();
        Self { rest, head }
    }

    fn map_head(&mut self, f: impl FnOnce(Section) -> Section) {
        self.head = self.head.map(f);
        while self.head.is_some_and(Section::is_empty) {
            self.head = self.rest.next().copied();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xi_rope::Rope;
    use xi_rope::delta::Builder;

    fn replace(removed: usize, inserted: usize) -> Section {
        Section::Replace { removed, inserted }
    }

    fn delta(base: &str, edits: &[(Range<usize>, &str)]) -> Delta<RopeInfo> {
        let mut builder = Builder::new(base.len());
        for (range, text) in edits {
            builder.replace(range.clone(), Rope::from(*text));
        }
        builder.build()
    }

    #[test]
    fn insertion_shape() {
        let desc = ChangeDesc::insertion(5, 1, 14);
        assert_eq!(
            desc.sections(),
            &[Section::Keep(5), replace(0, 1), Section::Keep(9)]
        );
        assert_eq!(desc.len_before(), 14);
        assert_eq!(desc.len_after(), 15);
    }

    #[test]
    fn insertion_into_empty_document() {
        let desc = ChangeDesc::insertion(0, 7, 0);
        assert_eq!(desc.sections(), &[replace(0, 7)]);
    }

    #[test]
    fn from_delta_insert() {
        let desc = ChangeDesc::from_delta(&delta("see :bolt: now", &[(5..5, "x")]));
        assert_eq!(
            desc.sections(),
            &[Section::Keep(5), replace(0, 1), Section::Keep(9)]
        );
    }

    #[test]
    fn from_delta_replace_and_trailing_delete() {
        let desc = ChangeDesc::from_delta(&delta("abcdef", &[(1..3, "XYZ"), (4..6, "")]));
        assert_eq!(
            desc.sections(),
            &[Section::Keep(1), replace(2, 3), Section::Keep(1), replace(2, 0)]
        );
        assert_eq!(desc.len_after(), 5);
    }

    #[test]
    fn identity_has_no_changes() {
        let desc = ChangeDesc::identity(10);
        assert!(desc.is_identity());
        assert_eq!(desc.merged(), None);
        assert!(ChangeDesc::identity(0).sections().is_empty());
    }

    #[test]
    fn merged_spans_all_changes() {
        let desc = ChangeDesc::from_delta(&delta("0123456789", &[(1..2, ""), (6..6, "abc")]));
        assert_eq!(
            desc.merged(),
            Some(ChangedRange {
                from: 1,
                to_a: 6,
                to_b: 8
            })
        );
        assert_eq!(desc.merged().map(|r| r.delta()), Some(2));
    }

    #[test]
    fn compose_two_insertions() {
        // "ab" → "aXb" → "aXbY"
        let first = ChangeDesc::insertion(1, 1, 2);
        let second = ChangeDesc::insertion(3, 1, 3);
        let composed = first.compose(&second).unwrap();
        assert_eq!(
            composed.sections(),
            &[
                Section::Keep(1),
                replace(0, 1),
                Section::Keep(1),
                replace(0, 1)
            ]
        );
    }

    #[test]
    fn compose_insert_then_delete_cancels() {
        // "ab" → "aXb" → "ab"
        let first = ChangeDesc::insertion(1, 1, 2);
        let second = ChangeDesc::from_delta(&delta("aXb", &[(1..2, "")]));
        let composed = first.compose(&second).unwrap();
        assert!(composed.is_identity());
        assert_eq!(composed.len_before(), 2);
    }

    #[test]
    fn compose_delete_over_inserted_and_original_text() {
        // "abcd" → "abXcd" → "ad"
        let first = ChangeDesc::insertion(2, 1, 4);
        let second = ChangeDesc::from_delta(&delta("abXcd", &[(1..4, "")]));
        let composed = first.compose(&second).unwrap();
        assert_eq!(
            composed.sections(),
            &[Section::Keep(1), replace(2, 0), Section::Keep(1)]
        );
    }

    #[test]
    fn compose_rejects_mismatched_lengths() {
        let first = ChangeDesc::insertion(0, 1, 2);
        let second = ChangeDesc::identity(7);
        assert!(matches!(
            first.compose(&second),
            Err(ScanError::ChangeLengthMismatch {
                expected: 3,
                actual: 7
            })
        ));
    }
}
