//! # Lexer - Tokenizing Markdown Source
//!
//! This module provides the first stage of parsing: breaking source text into
//! tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token. Nothing is skipped,
//! which is what lets the shortcode scanner treat node ranges as exact byte
//! offsets into the document:
//!
//! ```
//! use iconic_syntax::lexer::lex;
//!
//! let input = "see :bolt: now\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are minimal and context-free. Characters with syntactic meaning get
//! their own kind (`#`, `>`, `<`, `` ` ``, `$`, `%`, `|`, brackets, ...).
//! Everything else is grouped into `TEXT` runs. The shortcode delimiter `:`
//! deliberately stays inside `TEXT`: shortcodes are found by the engine's
//! scanner, not by the grammar.
//!
//! A backslash followed by ASCII punctuation lexes as a single `ESCAPE`
//! token so that `\:` can be classified without splitting a `TEXT` run.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// Separate from [`SyntaxKind`] because Logos needs to derive on it. Each
/// variant maps to a `SyntaxKind` token. Composite tokens such as
/// `CODE_SPAN_DELIM` are produced later by the parser.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t]+")]
    Whitespace,

    /// LF or CRLF
    #[regex(r"\r?\n")]
    Newline,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("-")]
    Dash,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("_")]
    Underscore,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("|")]
    Pipe,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("#")]
    Hash,

    #[token("!")]
    Bang,

    #[token("$")]
    Dollar,

    #[token("%")]
    Percent,

    #[regex(r"\\[!-/:-@\[-`{-~]")]
    Escape,

    #[token("\\")]
    Backslash,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^\s\[\]()<>`*+#|~$%!\\_-]+")]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Underscore => SyntaxKind::UNDERSCORE,
            TokenKind::Backtick => SyntaxKind::BACKTICK,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Hash => SyntaxKind::HASH,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Dollar => SyntaxKind::DOLLAR,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::Escape => SyntaxKind::ESCAPE,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    lex_with_spans(input)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Lex and return tokens along with their byte spans.
pub fn lex_with_spans(input: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        // Unrecognized characters (stray `\r`, non-ASCII spaces) degrade to TEXT
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => SyntaxKind::TEXT,
        };
        tokens.push((Token { kind, text }, span));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn token(kind: SyntaxKind, text: &str) -> Token<'_> {
        Token { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn shortcode_stays_in_one_text_run() {
        assert_eq!(
            lex("see :bolt|red: now"),
            vec![
                token(SyntaxKind::TEXT, "see"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::TEXT, ":bolt"),
                token(SyntaxKind::PIPE, "|"),
                token(SyntaxKind::TEXT, "red:"),
                token(SyntaxKind::WHITESPACE, " "),
                token(SyntaxKind::TEXT, "now"),
            ]
        );
    }

    #[test]
    fn lex_newline_crlf() {
        assert_eq!(lex("\r\n"), vec![token(SyntaxKind::NEWLINE, "\r\n")]);
    }

    #[test]
    fn escape_is_one_token() {
        assert_eq!(
            lex(r"\:a:"),
            vec![
                token(SyntaxKind::ESCAPE, r"\:"),
                token(SyntaxKind::TEXT, "a:"),
            ]
        );
    }

    #[test]
    fn lone_backslash() {
        assert_eq!(
            lex(r"a\b"),
            vec![
                token(SyntaxKind::TEXT, "a"),
                token(SyntaxKind::BACKSLASH, r"\"),
                token(SyntaxKind::TEXT, "b"),
            ]
        );
    }

    #[rstest]
    #[case("$", SyntaxKind::DOLLAR)]
    #[case("%", SyntaxKind::PERCENT)]
    #[case("!", SyntaxKind::BANG)]
    #[case("<", SyntaxKind::LT)]
    #[case("_", SyntaxKind::UNDERSCORE)]
    #[case("#", SyntaxKind::HASH)]
    #[case("`", SyntaxKind::BACKTICK)]
    fn single_character_tokens(#[case] input: &str, #[case] kind: SyntaxKind) {
        assert_eq!(lex(input), vec![token(kind, input)]);
    }

    #[test]
    fn lex_table_delimiter_row() {
        assert_eq!(
            lex("|:-:|"),
            vec![
                token(SyntaxKind::PIPE, "|"),
                token(SyntaxKind::TEXT, ":"),
                token(SyntaxKind::DASH, "-"),
                token(SyntaxKind::TEXT, ":"),
                token(SyntaxKind::PIPE, "|"),
            ]
        );
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "---\ntags: x\n---\n## Heading :star:\n\n> A `quote` with [[link]] $x$ %%c%%\n\n| a | b |\n|---|:-:|\n<div>\n```rust\ncode\n```";
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn non_ascii_text_is_preserved() {
        let input = "café :ünï: \u{a0}x";
        let reconstructed: String = lex(input).iter().map(|t| t.text).collect();
        assert_eq!(input, reconstructed);
    }

    #[test]
    fn spans_are_correct() {
        let input = "hello :world: `x`";
        for (token, span) in &lex_with_spans(input) {
            assert_eq!(token.text, &input[span.clone()]);
        }
    }
}
