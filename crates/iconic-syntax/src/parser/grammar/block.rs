//! Block-level grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::{find_in_line, find_pair, inline, run_len};

/// Multi-line blocks whose contents are kept raw (not parsed as Markdown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawBlock {
    Fence { marker: SyntaxKind, len: usize },
    Math,
    PercentComment,
    HtmlComment,
    Html,
}

impl RawBlock {
    /// (block, begin line, end line) node kinds.
    fn kinds(self) -> (SyntaxKind, SyntaxKind, SyntaxKind) {
        match self {
            RawBlock::Fence { .. } => (
                SyntaxKind::FENCED_CODE,
                SyntaxKind::CODE_FENCE_BEGIN,
                SyntaxKind::CODE_FENCE_END,
            ),
            RawBlock::Math => (
                SyntaxKind::MATH_BLOCK,
                SyntaxKind::MATH_BEGIN,
                SyntaxKind::MATH_END,
            ),
            RawBlock::PercentComment | RawBlock::HtmlComment => (
                SyntaxKind::COMMENT_BLOCK,
                SyntaxKind::COMMENT_BEGIN,
                SyntaxKind::COMMENT_END,
            ),
            RawBlock::Html => (
                SyntaxKind::HTML_BLOCK,
                SyntaxKind::HTML_BEGIN,
                SyntaxKind::HTML_END,
            ),
        }
    }
}

/// Parse a block element.
pub fn block(p: &mut Parser<'_, '_>) {
    // Blank lines stay at the root
    while p.at(SyntaxKind::NEWLINE) {
        p.bump();
    }

    if p.at_end() {
        return;
    }

    if let Some(raw) = raw_block_start(p) {
        return raw_block(p, raw);
    }
    if is_delimiter_row(p) {
        return delimiter_row(p);
    }
    if is_table_start(p) {
        return table(p);
    }

    match p.current() {
        SyntaxKind::HASH if is_heading(p) => heading(p),
        SyntaxKind::GT => blockquote(p),
        _ if is_thematic_break(p) => thematic_break(p),
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS
            if p.nth(1) == SyntaxKind::WHITESPACE =>
        {
            list_item(p)
        }
        _ => paragraph(p),
    }
}

/// `---` on the very first line, closed by a later `---` line.
pub fn is_frontmatter_start(p: &Parser<'_, '_>) -> bool {
    p.at_doc_start() && is_frontmatter_fence(&p.line_text()) && has_frontmatter_close(p)
}

fn is_frontmatter_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

fn has_frontmatter_close(p: &Parser<'_, '_>) -> bool {
    let mut i = 0;
    loop {
        while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            i += 1;
        }
        if p.nth(i) == SyntaxKind::EOF {
            return false;
        }
        i += 1;
        let start = i;
        while !matches!(p.nth(i), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            i += 1;
        }
        if is_frontmatter_fence(&p.text_ahead(start, i)) {
            return true;
        }
    }
}

/// Parse the frontmatter block. Only called when [`is_frontmatter_start`] holds.
pub fn frontmatter(p: &mut Parser<'_, '_>) {
    let m = p.start();
    line_node(p, SyntaxKind::FRONTMATTER_BEGIN);

    while !p.at_end() {
        if is_frontmatter_fence(&p.line_text()) {
            line_node(p, SyntaxKind::FRONTMATTER_END);
            break;
        }
        p.bump_line();
    }

    m.complete(p, SyntaxKind::FRONTMATTER);
}

/// Wrap the rest of the current line (and its newline) in a node.
fn line_node(p: &mut Parser<'_, '_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump_line();
    m.complete(p, kind);
}

fn line_has_pair(p: &Parser<'_, '_>, start: usize, kind: SyntaxKind) -> bool {
    find_pair(p, start, kind).is_some()
}

fn line_has(p: &Parser<'_, '_>, kind: SyntaxKind) -> bool {
    find_in_line(p, 0, kind).is_some()
}

fn raw_block_start(p: &Parser<'_, '_>) -> Option<RawBlock> {
    match p.current() {
        SyntaxKind::BACKTICK | SyntaxKind::TILDE => code_fence_start(p),
        SyntaxKind::DOLLAR if p.nth(1) == SyntaxKind::DOLLAR => {
            // `$$x$$` on one line is inline math
            (!line_has_pair(p, 2, SyntaxKind::DOLLAR)).then_some(RawBlock::Math)
        }
        SyntaxKind::PERCENT if p.nth(1) == SyntaxKind::PERCENT => {
            (!line_has_pair(p, 2, SyntaxKind::PERCENT)).then_some(RawBlock::PercentComment)
        }
        SyntaxKind::LT => {
            let line = p.line_text();
            match line.strip_prefix("<!--") {
                Some(rest) => (!rest.contains("-->")).then_some(RawBlock::HtmlComment),
                None => is_html_block_start(&line).then_some(RawBlock::Html),
            }
        }
        _ => None,
    }
}

fn code_fence_start(p: &Parser<'_, '_>) -> Option<RawBlock> {
    let marker = p.current();
    let len = run_len(p, 0, marker);
    if len < 3 {
        return None;
    }
    // A backtick info string cannot contain backticks: "```a```" is a code span
    if marker == SyntaxKind::BACKTICK && (len..p.line_len()).any(|i| p.nth(i) == marker) {
        return None;
    }
    Some(RawBlock::Fence { marker, len })
}

fn is_html_block_start(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    let name = rest.strip_prefix('/').unwrap_or(rest);
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) && !rest.starts_with('!') {
        return false;
    }
    // `<https://example.com>` and `<me@example.com>` are autolinks
    let inner = rest.split('>').next().unwrap_or(rest);
    let autolink =
        !inner.contains(char::is_whitespace) && (inner.contains(':') || inner.contains('@'));
    !autolink
}

fn closes(p: &Parser<'_, '_>, raw: RawBlock) -> bool {
    match raw {
        RawBlock::Fence { marker, len } => {
            let run = run_len(p, 0, marker);
            run >= len && (run..p.line_len()).all(|i| p.nth(i) == SyntaxKind::WHITESPACE)
        }
        RawBlock::Math => line_has_pair(p, 0, SyntaxKind::DOLLAR),
        RawBlock::PercentComment => line_has_pair(p, 0, SyntaxKind::PERCENT),
        RawBlock::HtmlComment => p.line_text().contains("-->"),
        RawBlock::Html => false,
    }
}

/// Parse a raw block: BEGIN line, raw content lines, END line when closed.
fn raw_block(p: &mut Parser<'_, '_>, raw: RawBlock) {
    let (block_kind, begin_kind, end_kind) = raw.kinds();
    let m = p.start();
    line_node(p, begin_kind);

    if raw == RawBlock::Html {
        // The empty line that ends the block is its END
        while !p.at_end() {
            if p.at(SyntaxKind::NEWLINE) {
                line_node(p, end_kind);
                break;
            }
            p.bump_line();
        }
    } else {
        // Unclosed blocks run to the end of the document
        while !p.at_end() {
            if closes(p, raw) {
                line_node(p, end_kind);
                break;
            }
            p.bump_line();
        }
    }

    m.complete(p, block_kind);
}

/// A line made only of pipes, dashes, colons and spaces, like `|:--|--:|`.
fn is_delimiter_row(p: &Parser<'_, '_>) -> bool {
    is_delimiter_text(&p.line_text())
}

fn is_delimiter_text(line: &str) -> bool {
    let line = line.trim();
    if !line.contains('|') || !line.contains('-') {
        return false;
    }
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').all(|cell| {
        let cell = cell.trim();
        let cell = cell.strip_prefix(':').unwrap_or(cell);
        let cell = cell.strip_suffix(':').unwrap_or(cell);
        !cell.is_empty() && cell.bytes().all(|b| b == b'-')
    })
}

fn is_table_start(p: &mut Parser<'_, '_>) -> bool {
    line_has(p, SyntaxKind::PIPE)
        && p
            .peek_next_line(|q| is_delimiter_row(q))
            .unwrap_or(false)
}

fn delimiter_row(p: &mut Parser<'_, '_>) {
    line_node(p, SyntaxKind::TABLE_DELIMITER_ROW);
}

/// Parse a pipe table: header row, delimiter row, body rows.
fn table(p: &mut Parser<'_, '_>) {
    let header = p.start();
    row_content(p);
    let header = header.complete(p, SyntaxKind::TABLE_HEADER_ROW);
    let m = header.precede(p);

    delimiter_row(p);

    while !p.at_end() && !interrupts_table(p) {
        if is_delimiter_row(p) {
            delimiter_row(p);
        } else {
            let row = p.start();
            row_content(p);
            row.complete(p, SyntaxKind::TABLE_ROW);
        }
    }

    m.complete(p, SyntaxKind::TABLE);
}

fn row_content(p: &mut Parser<'_, '_>) {
    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);
}

fn interrupts_table(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::NEWLINE)
        || !line_has(p, SyntaxKind::PIPE)
        || raw_block_start(p).is_some()
        || starts_other_block(p)
}

fn interrupts_paragraph(p: &mut Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::NEWLINE)
        || raw_block_start(p).is_some()
        || is_delimiter_row(p)
        || is_table_start(p)
        || starts_other_block(p)
}

fn starts_other_block(p: &Parser<'_, '_>) -> bool {
    match p.current() {
        SyntaxKind::HASH => is_heading(p),
        SyntaxKind::GT => true,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::PLUS => {
            p.nth(1) == SyntaxKind::WHITESPACE || is_thematic_break(p)
        }
        SyntaxKind::UNDERSCORE => is_thematic_break(p),
        _ => false,
    }
}

/// `#` to `######` followed by a space or the end of the line.
///
/// `#tag` at the start of a line is a tag in a paragraph, not a heading.
fn is_heading(p: &Parser<'_, '_>) -> bool {
    let hashes = run_len(p, 0, SyntaxKind::HASH);
    (1..=6).contains(&hashes)
        && matches!(
            p.nth(hashes),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
}

/// Check if current position is a thematic break (---, ***, ___)
fn is_thematic_break(p: &Parser<'_, '_>) -> bool {
    let marker = p.current();
    if !matches!(
        marker,
        SyntaxKind::DASH | SyntaxKind::STAR | SyntaxKind::UNDERSCORE
    ) {
        return false;
    }

    let mut count = 0;
    for i in 0..p.line_len() {
        match p.nth(i) {
            k if k == marker => count += 1,
            SyntaxKind::WHITESPACE => {}
            _ => return false,
        }
    }

    count >= 3
}

/// Parse an ATX heading.
fn heading(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while p.at(SyntaxKind::HASH) {
        p.bump();
    }
    p.eat(SyntaxKind::WHITESPACE);

    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::HEADING);
}

/// Parse a blockquote.
fn blockquote(p: &mut Parser<'_, '_>) {
    let m = p.start();

    while p.at(SyntaxKind::GT) {
        p.bump();
        p.eat(SyntaxKind::WHITESPACE);

        inline::inline_until_newline(p);

        if !p.eat(SyntaxKind::NEWLINE) {
            break;
        }
        // Indentation only belongs to the quote when a `>` follows it
        if p.at(SyntaxKind::WHITESPACE) && p.nth(1) == SyntaxKind::GT {
            p.bump();
        }
    }

    m.complete(p, SyntaxKind::BLOCK_QUOTE);
}

/// Parse a list item.
fn list_item(p: &mut Parser<'_, '_>) {
    let m = p.start();

    // Marker and the space after it
    p.bump();
    p.bump();

    inline::inline_until_newline(p);
    p.eat(SyntaxKind::NEWLINE);

    m.complete(p, SyntaxKind::LIST_ITEM);
}

/// Parse a thematic break.
fn thematic_break(p: &mut Parser<'_, '_>) {
    line_node(p, SyntaxKind::THEMATIC_BREAK);
}

/// Parse a paragraph (default block).
fn paragraph(p: &mut Parser<'_, '_>) {
    let m = p.start();

    loop {
        inline::inline_until_newline(p);

        if !p.eat(SyntaxKind::NEWLINE) {
            break;
        }
        if p.at_end() || interrupts_paragraph(p) {
            break;
        }
    }

    m.complete(p, SyntaxKind::PARAGRAPH);
}
