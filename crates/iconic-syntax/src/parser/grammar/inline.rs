//! # Inline-Level Grammar
//!
//! Inline elements are the formatting within blocks. Unlike blocks, inline
//! parsing is driven by **special characters** rather than line-start patterns.
//!
//! ## Dispatch Logic
//!
//! | Token | Possible Element |
//! |-------|-----------------|
//! | `` ` `` | Code span |
//! | `$` | Inline math |
//! | `%%` | Comment |
//! | `<` | Comment, autolink or HTML tag |
//! | `#` | Tag (after whitespace or at line start) |
//! | `[` | Wikilink or link |
//! | `!` | Embed or image |
//! | `*` `_` `~~` | Emphasis, strong, strikethrough |
//! | `http(s)://` | Bare URL |
//!
//! ## Closers Are Found By Lookahead
//!
//! Every construct that the shortcode scanner skips (code spans, math,
//! comments, tags, link destinations, ...) is only opened once its closer has
//! been found on the same line. An unmatched opener is plain text, so the tree
//! never claims a skip region that isn't really there.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::{find_in_line, find_pair, run_len};

/// Parse inline content until newline or EOF.
pub fn inline_until_newline(p: &mut Parser<'_, '_>) {
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        inline_element(p);
    }
}

/// Parse a single inline element.
fn inline_element(p: &mut Parser<'_, '_>) {
    match p.current() {
        SyntaxKind::BACKTICK => code_span(p),
        SyntaxKind::DOLLAR => math_inline(p),
        SyntaxKind::PERCENT if p.nth(1) == SyntaxKind::PERCENT => percent_comment(p),
        SyntaxKind::LT => angle_bracket(p),
        SyntaxKind::HASH => tag(p),
        SyntaxKind::LBRACKET if p.nth(1) == SyntaxKind::LBRACKET => {
            double_bracket(p, 0, SyntaxKind::WIKILINK)
        }
        SyntaxKind::LBRACKET => link_or_text(p),
        SyntaxKind::BANG
            if p.nth(1) == SyntaxKind::LBRACKET && p.nth(2) == SyntaxKind::LBRACKET =>
        {
            double_bracket(p, 1, SyntaxKind::EMBED)
        }
        SyntaxKind::BANG if p.nth(1) == SyntaxKind::LBRACKET => image(p),
        delimiter @ (SyntaxKind::STAR | SyntaxKind::UNDERSCORE) => {
            emphasis_or_strong(p, delimiter)
        }
        SyntaxKind::TILDE if p.nth(1) == SyntaxKind::TILDE => strikethrough(p),
        SyntaxKind::TEXT if is_url_start(p.nth_text(0)) => bare_url(p),
        _ => p.bump(),
    }
}

/// Wrap tokens `0..n` ahead in a node of `kind`.
fn wrap(p: &mut Parser<'_, '_>, n: usize, kind: SyntaxKind) {
    let m = p.start();
    for _ in 0..n {
        p.bump();
    }
    m.complete(p, kind);
}

/// Parse a code span. The closer is a backtick run of the same length.
fn code_span(p: &mut Parser<'_, '_>) {
    let open = run_len(p, 0, SyntaxKind::BACKTICK);
    let len = p.line_len();

    let mut i = open;
    while i < len {
        if p.nth(i) != SyntaxKind::BACKTICK {
            i += 1;
            continue;
        }
        let run = run_len(p, i, SyntaxKind::BACKTICK);
        if run == open {
            let m = p.start();
            p.bump_n(open, SyntaxKind::CODE_SPAN_DELIM);
            for _ in open..i {
                p.bump();
            }
            p.bump_n(open, SyntaxKind::CODE_SPAN_DELIM);
            m.complete(p, SyntaxKind::CODE_SPAN);
            return;
        }
        i += run;
    }

    // Unmatched run stays plain
    for _ in 0..open {
        p.bump();
    }
}

/// Parse `$x$` or `$$x$$`.
fn math_inline(p: &mut Parser<'_, '_>) {
    if p.nth(1) == SyntaxKind::DOLLAR {
        match find_pair(p, 2, SyntaxKind::DOLLAR) {
            Some(close) if close > 2 => wrap(p, close + 2, SyntaxKind::MATH_INLINE),
            _ => p.bump(),
        }
        return;
    }

    // `$` must hug its content on both sides: "$5 and $6" is not math
    if matches!(
        p.nth(1),
        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
    ) {
        p.bump();
        return;
    }
    let len = p.line_len();
    let close = (2..len).find(|&i| {
        p.nth(i) == SyntaxKind::DOLLAR && p.nth(i - 1) != SyntaxKind::WHITESPACE
    });
    match close {
        Some(close) => wrap(p, close + 1, SyntaxKind::MATH_INLINE),
        None => p.bump(),
    }
}

/// Parse `%%comment%%`.
fn percent_comment(p: &mut Parser<'_, '_>) {
    match find_pair(p, 2, SyntaxKind::PERCENT) {
        Some(close) => {
            let m = p.start();
            p.bump_n(2, SyntaxKind::COMMENT_MARKER);
            for _ in 2..close {
                p.bump();
            }
            p.bump_n(2, SyntaxKind::COMMENT_MARKER);
            m.complete(p, SyntaxKind::COMMENT);
        }
        None => p.bump(),
    }
}

/// Parse whatever starts with `<`: `<!-- -->`, `<https://...>` or `<tag>`.
fn angle_bracket(p: &mut Parser<'_, '_>) {
    if p.nth(1) == SyntaxKind::BANG
        && p.nth(2) == SyntaxKind::DASH
        && p.nth(3) == SyntaxKind::DASH
    {
        return html_comment(p);
    }

    let Some(close) = find_in_line(p, 1, SyntaxKind::GT).filter(|&i| i > 1) else {
        return p.bump();
    };
    let inner = p.text_ahead(1, close);

    let autolink =
        !inner.contains(char::is_whitespace) && (inner.contains(':') || inner.contains('@'));
    if autolink {
        return wrap(p, close + 1, SyntaxKind::AUTOLINK);
    }

    let name = inner.strip_prefix('/').unwrap_or(&inner);
    if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        wrap(p, close + 1, SyntaxKind::HTML_TAG);
    } else {
        p.bump();
    }
}

fn html_comment(p: &mut Parser<'_, '_>) {
    let len = p.line_len();
    let close = (4..len).find(|&i| {
        p.nth(i) == SyntaxKind::DASH
            && p.nth(i + 1) == SyntaxKind::DASH
            && p.nth(i + 2) == SyntaxKind::GT
    });
    match close {
        Some(close) => {
            let m = p.start();
            p.bump_n(4, SyntaxKind::COMMENT_MARKER);
            for _ in 4..close {
                p.bump();
            }
            p.bump_n(3, SyntaxKind::COMMENT_MARKER);
            m.complete(p, SyntaxKind::COMMENT);
        }
        None => p.bump(),
    }
}

/// Parse a `#tag`. Only a `#` at the start of a word opens a tag.
fn tag(p: &mut Parser<'_, '_>) {
    let word_start = matches!(p.prev(), SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE);
    if !word_start || p.nth(1) != SyntaxKind::TEXT {
        return p.bump();
    }

    let m = p.start();
    p.bump(); // #
    while matches!(
        p.current(),
        SyntaxKind::TEXT | SyntaxKind::DASH | SyntaxKind::UNDERSCORE
    ) {
        p.bump();
    }
    m.complete(p, SyntaxKind::TAG);
}

/// Parse `[[target]]` or `![[target]]`. `lead` is the number of tokens before `[[`.
fn double_bracket(p: &mut Parser<'_, '_>, lead: usize, kind: SyntaxKind) {
    match find_pair(p, lead + 2, SyntaxKind::RBRACKET) {
        Some(close) => wrap(p, close + 2, kind),
        None => p.bump(),
    }
}

/// Parse a standard link [text](url) or plain text.
fn link_or_text(p: &mut Parser<'_, '_>) {
    let m = p.start();

    debug_assert!(p.at(SyntaxKind::LBRACKET));
    p.bump();

    // Link text is regular inline content
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::RBRACKET) {
        inline_element(p);
    }

    if !p.eat(SyntaxKind::RBRACKET) {
        m.complete(p, SyntaxKind::INLINE);
        return;
    }

    if link_dest(p) {
        m.complete(p, SyntaxKind::LINK);
    } else {
        m.complete(p, SyntaxKind::INLINE);
    }
}

/// Parse `(url)` when it closes on this line.
fn link_dest(p: &mut Parser<'_, '_>) -> bool {
    if !p.at(SyntaxKind::LPAREN) {
        return false;
    }
    match find_in_line(p, 1, SyntaxKind::RPAREN) {
        Some(close) => {
            wrap(p, close + 1, SyntaxKind::LINK_DEST);
            true
        }
        None => false,
    }
}

/// Parse image ![alt](url).
fn image(p: &mut Parser<'_, '_>) {
    let Some(rbracket) = find_in_line(p, 2, SyntaxKind::RBRACKET) else {
        return p.bump();
    };
    if p.nth(rbracket + 1) != SyntaxKind::LPAREN {
        return p.bump();
    }
    match find_in_line(p, rbracket + 2, SyntaxKind::RPAREN) {
        Some(close) => wrap(p, close + 1, SyntaxKind::IMAGE),
        None => p.bump(),
    }
}

/// Parse emphasis *text* or strong **text** (or underscore variants).
fn emphasis_or_strong(p: &mut Parser<'_, '_>, delimiter: SyntaxKind) {
    let m = p.start();

    let mut open_count = 0;
    while p.at(delimiter) && open_count < 2 {
        p.bump();
        open_count += 1;
    }

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        if p.at(delimiter) {
            let close_count = run_len(p, 0, delimiter).min(open_count);
            if close_count == open_count {
                for _ in 0..open_count {
                    p.bump();
                }
                break;
            }
            p.bump();
        } else {
            inline_element(p);
        }
    }

    let kind = if open_count >= 2 {
        SyntaxKind::STRONG
    } else {
        SyntaxKind::EMPHASIS
    };
    m.complete(p, kind);
}

/// Parse strikethrough ~~text~~.
fn strikethrough(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump();
    p.bump();

    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        if p.at(SyntaxKind::TILDE) && p.nth(1) == SyntaxKind::TILDE {
            p.bump();
            p.bump();
            break;
        }
        inline_element(p);
    }

    m.complete(p, SyntaxKind::STRIKETHROUGH);
}

fn is_url_start(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// Parse a bare `https://...` URL up to the next space or bracket.
fn bare_url(p: &mut Parser<'_, '_>) {
    let m = p.start();
    while !matches!(
        p.current(),
        SyntaxKind::WHITESPACE
            | SyntaxKind::NEWLINE
            | SyntaxKind::EOF
            | SyntaxKind::LT
            | SyntaxKind::GT
            | SyntaxKind::RPAREN
            | SyntaxKind::RBRACKET
    ) {
        p.bump();
    }
    m.complete(p, SyntaxKind::BARE_URL);
}
