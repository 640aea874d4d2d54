use std::ops::Range;

use anyhow::{bail, ensure};
use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

/// One replacement, in offsets of the document before the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

/// Editing commands understood by [`Document::apply`](super::Document::apply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
    /// Several edits applied at once; ranges must be sorted and disjoint.
    Batch(Vec<Edit>),
}

impl Cmd {
    pub fn edits(&self) -> Vec<Edit> {
        match self {
            Cmd::InsertText { at, text } => vec![Edit {
                range: *at..*at,
                text: text.clone(),
            }],
            Cmd::DeleteRange { range } => vec![Edit {
                range: range.clone(),
                text: String::new(),
            }],
            Cmd::ReplaceRange { range, text } => vec![Edit {
                range: range.clone(),
                text: text.clone(),
            }],
            Cmd::Batch(edits) => edits.clone(),
        }
    }
}

/// Compile a command against `buffer` into a delta.
pub fn compile_command(buffer: &Rope, cmd: &Cmd) -> anyhow::Result<Delta<RopeInfo>> {
    let len = buffer.len();
    let mut builder = Builder::new(len);
    let mut last_end = 0;

    for edit in cmd.edits() {
        let Range { start, end } = edit.range;
        if start > end || end > len {
            bail!("edit range {start}..{end} is outside the document (length {len})");
        }
        ensure!(
            start >= last_end,
            "edit at {start} overlaps or precedes the previous edit ending at {last_end}"
        );
        ensure!(
            buffer.is_codepoint_boundary(start) && buffer.is_codepoint_boundary(end),
            "edit range {start}..{end} splits a character"
        );

        builder.replace(start..end, Rope::from(edit.text.as_str()));
        last_end = end;
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn batch_edits_apply_in_old_offsets() {
        let buffer = Rope::from("abcdef");
        let cmd = Cmd::Batch(vec![
            Edit {
                range: 1..2,
                text: "X".to_string(),
            },
            Edit {
                range: 4..4,
                text: "YY".to_string(),
            },
        ]);
        let delta = compile_command(&buffer, &cmd).unwrap();
        assert_eq!(delta.apply(&buffer).to_string(), "aXcdYYef");
    }

    #[rstest]
    #[case(Cmd::DeleteRange { range: 3..9 })]
    #[case(Cmd::InsertText { at: 2, text: "x".to_string() })]
    #[case(Cmd::Batch(vec![
        Edit { range: 4..5, text: String::new() },
        Edit { range: 0..1, text: String::new() },
    ]))]
    fn rejects_invalid_edits(#[case] cmd: Cmd) {
        // "é" occupies bytes 1..3
        let buffer = Rope::from("aébc");
        assert!(compile_command(&buffer, &cmd).is_err());
    }

    #[test]
    fn delete_whole_document() {
        let buffer = Rope::from("abc");
        let delta = compile_command(&buffer, &Cmd::DeleteRange { range: 0..3 }).unwrap();
        assert_eq!(delta.apply(&buffer).len(), 0);
    }
}
