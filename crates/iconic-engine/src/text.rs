use std::fmt;

use xi_rope::Rope;

/// One line of the document, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Zero-based line number.
    pub number: usize,
    pub from: usize,
    /// End of the line content; the `\n` or `\r\n` after it is excluded.
    pub to: usize,
    pub text: String,
}

impl Line {
    pub fn is_blank(&self) -> bool {
        self.text.trim_end().is_empty()
    }

    fn at(rope: &Rope, number: usize, line_count: usize) -> Self {
        let from = rope.offset_of_line(number);
        let next = if number + 1 < line_count {
            rope.offset_of_line(number + 1)
        } else {
            rope.len()
        };

        let raw = rope.slice_to_cow(from..next);
        let raw: &str = &raw;
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);

        Self {
            number,
            from,
            to: from + text.len(),
            text: text.to_string(),
        }
    }
}

/// The line containing `offset`.
pub fn line_at(rope: &Rope, offset: usize) -> Line {
    let offset = offset.min(rope.len());
    let line_count = rope.line_of_offset(rope.len()) + 1;
    Line::at(rope, rope.line_of_offset(offset), line_count)
}

/// Line-by-line reader over a rope.
#[derive(Clone)]
pub struct TextCursor<'a> {
    rope: &'a Rope,
    line: Line,
    line_count: usize,
}

impl fmt::Debug for TextCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCursor")
            .field("line", &self.line)
            .field("line_count", &self.line_count)
            .finish_non_exhaustive()
    }
}

impl<'a> TextCursor<'a> {
    /// Cursor on the line containing `offset`.
    pub fn at_offset(rope: &'a Rope, offset: usize) -> Self {
        Self {
            rope,
            line: line_at(rope, offset),
            line_count: rope.line_of_offset(rope.len()) + 1,
        }
    }

    pub fn line(&self) -> &Line {
        &self.line
    }

    pub fn doc_len(&self) -> usize {
        self.rope.len()
    }

    /// Advance to the next line. Returns false on the last line.
    pub fn next(&mut self) -> bool {
        if self.line.number + 1 >= self.line_count {
            return false;
        }
        self.line = Line::at(self.rope, self.line.number + 1, self.line_count);
        true
    }

    /// Move to the line containing `offset`.
    pub fn seek(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len());
        if offset < self.line.from || offset > self.line.to {
            self.line = Line::at(self.rope, self.rope.line_of_offset(offset), self.line_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_exclude_terminators() {
        let rope = Rope::from("one\r\ntwo\n\nthree");
        let mut cursor = TextCursor::at_offset(&rope, 0);
        let mut lines = vec![cursor.line().clone()];
        while cursor.next() {
            lines.push(cursor.line().clone());
        }

        let spans: Vec<_> = lines
            .iter()
            .map(|l| (l.from, l.to, l.text.as_str()))
            .collect();
        assert_eq!(
            spans,
            vec![(0, 3, "one"), (5, 8, "two"), (9, 9, ""), (10, 15, "three")]
        );
        assert!(lines[2].is_blank());
    }

    #[test]
    fn trailing_newline_yields_empty_last_line() {
        let rope = Rope::from("a\n");
        let line = line_at(&rope, 2);
        assert_eq!((line.number, line.from, line.to), (1, 2, 2));
    }

    #[test]
    fn line_at_middle_and_terminator() {
        let rope = Rope::from("abc\ndef\n");
        assert_eq!(line_at(&rope, 5).text, "def");
        // The newline byte belongs to the line it ends
        assert_eq!(line_at(&rope, 3).number, 0);
        assert_eq!(line_at(&rope, 4).number, 1);
    }

    #[test]
    fn seek_jumps_between_lines() {
        let rope = Rope::from("abc\ndef\nghi");
        let mut cursor = TextCursor::at_offset(&rope, 0);
        cursor.seek(9);
        assert_eq!(cursor.line().text, "ghi");
        cursor.seek(1);
        assert_eq!(cursor.line().number, 0);
    }

    #[test]
    fn empty_document_has_one_line() {
        let rope = Rope::from("");
        let mut cursor = TextCursor::at_offset(&rope, 0);
        assert_eq!((cursor.line().from, cursor.line().to), (0, 0));
        assert!(!cursor.next());
    }

    #[test]
    fn whitespace_only_line_is_blank() {
        let rope = Rope::from("  \t\nx");
        assert!(line_at(&rope, 0).is_blank());
        assert!(!line_at(&rope, 4).is_blank());
    }
}
