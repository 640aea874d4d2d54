//! # Stream Scanner
//!
//! Walks a [`TextCursor`] and a [`TreeCursor`] forward together through a
//! scan window and collects shortcode tokens.
//!
//! ```text
//! offset ──────────────────────────────────────────────▶
//! text:   see `:no:` and :yes|#f00:
//! tree:   TEXT CODE_SPAN  TEXT
//!              └ skip ┘        └── read ──┘
//! ```
//!
//! The tree cursor is kept caught up with the offset. When the node under
//! the offset is a skip region the offset jumps to its end; otherwise the
//! text is read byte by byte, trying to close a shortcode at each delimiter.

use iconic_config::{ScanConfig, is_name_char};

use crate::error::ScanError;
use crate::planner::StreamSpec;
use crate::rules::RegionRules;
use crate::text::TextCursor;
use crate::token::ShortcodeToken;
use crate::tree::TreeCursor;

/// The configured shortcode characters as bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub delimiter: u8,
    pub separator: u8,
    pub color_prefix: u8,
}

impl Delimiters {
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        config.validate()?;
        // validate() only accepts ASCII punctuation
        Ok(Self {
            delimiter: config.delimiter as u8,
            separator: config.separator as u8,
            color_prefix: config.color_prefix as u8,
        })
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            delimiter: b':',
            separator: b'|',
            color_prefix: b'#',
        }
    }
}

/// Mutable position of a running scan.
#[derive(Debug)]
struct ParserState<'a> {
    text_cursor: TextCursor<'a>,
    /// `None` once the tree is exhausted.
    tree_cursor: Option<TreeCursor>,
    offset: usize,
    end: usize,
    finished: bool,
}

impl ParserState<'_> {
    fn line_offset(&self) -> usize {
        self.offset - self.text_cursor.line().from
    }
}

pub struct StreamParser<'a> {
    state: ParserState<'a>,
    delimiters: Delimiters,
    rules: &'a RegionRules,
    tokens: Vec<ShortcodeToken>,
}

impl<'a> StreamParser<'a> {
    pub fn init(
        spec: StreamSpec<'a>,
        delimiters: Delimiters,
        rules: &'a RegionRules,
    ) -> Result<Self, ScanError> {
        let StreamSpec {
            window,
            tree_cursor,
            text_cursor,
        } = spec;

        let doc_len = text_cursor.doc_len();
        let line_start = text_cursor.line().from;
        if window.begin > window.end || window.end > doc_len || line_start != window.begin {
            return Err(ScanError::InconsistentSpec {
                begin: window.begin,
                end: window.end,
                line_start,
                doc_len,
            });
        }

        Ok(Self {
            state: ParserState {
                text_cursor,
                tree_cursor,
                offset: window.begin,
                end: window.end,
                finished: false,
            },
            delimiters,
            rules,
            tokens: Vec::new(),
        })
    }

    /// Run to the end of the window and hand over the tokens found.
    pub fn stream(mut self) -> Vec<ShortcodeToken> {
        while !self.state.finished {
            self.step();
        }
        self.tokens
    }

    fn step(&mut self) {
        if self.state.offset >= self.state.end {
            self.state.finished = true;
            return;
        }
        if self.state.offset >= self.state.text_cursor.line().to {
            self.next_line();
            return;
        }
        if self.skip_regions() {
            return;
        }
        self.read();
    }

    /// Move to the start of the next non-blank line.
    fn next_line(&mut self) {
        loop {
            if !self.state.text_cursor.next() {
                self.state.finished = true;
                return;
            }
            if !self.state.text_cursor.line().is_blank() {
                break;
            }
        }
        self.state.offset = self.state.text_cursor.line().from;
    }

    /// Catch the tree cursor up with the offset. Returns true if the offset
    /// jumped over a skip region.
    fn skip_regions(&mut self) -> bool {
        let offset = self.state.offset;
        while let Some(cursor) = self.state.tree_cursor.as_mut() {
            let (from, to) = cursor.range();
            if to <= offset {
                if !cursor.next_skipping_children() {
                    self.state.tree_cursor = None;
                }
                continue;
            }
            if offset < from {
                return false;
            }
            if self.rules.is_skip(cursor.kind()) {
                log::trace!("skipping {:?} at {from}..{to}", cursor.kind());
                self.jump_to(to);
                return true;
            }
            if !cursor.first_child() {
                return false;
            }
        }
        false
    }

    fn jump_to(&mut self, offset: usize) {
        self.state.offset = offset;
        if offset > self.state.text_cursor.line().to {
            self.state.text_cursor.seek(offset);
        }
    }

    fn read(&mut self) {
        let line = self.state.text_cursor.line();
        let from = self.state.line_offset();

        match scan_shortcode(line.text.as_bytes(), from, &self.delimiters) {
            Some((to, sep)) => {
                let token = make_token(&line.text, line.from, from, to, sep);
                log::trace!("shortcode {:?} at {}..{}", token.icon, token.from, token.to);
                self.tokens.push(token);
                self.state.offset += to - from;
            }
            None => self.state.offset += 1,
        }
    }
}

/// Try to read a shortcode starting at `from`. Returns the end of the span
/// and the position of the separator, if any.
fn scan_shortcode(bytes: &[u8], from: usize, d: &Delimiters) -> Option<(usize, Option<usize>)> {
    if bytes.get(from) != Some(&d.delimiter) {
        return None;
    }

    let mut sep = None;
    for (i, &b) in bytes.iter().enumerate().skip(from + 1) {
        if b == d.delimiter {
            let icon_end = sep.unwrap_or(i);
            return (icon_end > from + 1).then_some((i + 1, sep));
        }
        if b == d.separator {
            if sep.is_some() {
                return None;
            }
            sep = Some(i);
        } else if b == d.color_prefix {
            if sep.is_none() {
                return None;
            }
        } else if !is_name_char(char::from(b)) {
            return None;
        }
    }
    None
}

fn make_token(
    text: &str,
    line_from: usize,
    from: usize,
    to: usize,
    sep: Option<usize>,
) -> ShortcodeToken {
    let icon_end = sep.unwrap_or(to - 1);
    let color = sep.map_or("", |s| &text[s + 1..to - 1]);
    ShortcodeToken {
        from: line_from + from,
        to: line_from + to,
        icon: text[from + 1..icon_end].to_string(),
        color: color.to_string(),
        has_separator: sep.is_some(),
    }
}
