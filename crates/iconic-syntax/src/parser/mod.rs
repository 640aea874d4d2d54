//! # Parser - Event-Based Tree Construction
//!
//! Transforms a token stream into a syntax tree using the event-based
//! architecture from rust-analyzer: grammar rules emit a flat list of
//! [`Event`]s and the [`Sink`] builds the Rowan tree afterwards.
//!
//! ## The Marker System
//!
//! `parser.start()` returns a [`Marker`] that must be either completed with
//! `marker.complete(parser, KIND)` or abandoned with `marker.abandon(parser)`.
//! Dropping it otherwise panics, which catches grammar bugs early instead of
//! producing a corrupt tree.
//!
//! ```ignore
//! let m = p.start();
//! p.bump_line();
//! m.complete(p, SyntaxKind::CODE_FENCE_BEGIN);
//! ```
//!
//! ## Lookahead
//!
//! Most constructs the shortcode scanner cares about are decided by looking
//! ahead within the current line (`nth`, `nth_text`, `line_len`), so the
//! grammar never commits to a node it would later have to unwind.
//!
//! ## Public API
//!
//! ```
//! use iconic_syntax::parse;
//!
//! let tree = parse("# Hello :wave:\n");
//! assert_eq!(tree.text().to_string(), "# Hello :wave:\n");
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_text()`, `at()`, `line_len()`
/// - Consume tokens: `bump()`, `eat()`, `bump_n()`, `bump_line()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        sink.finish()
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the token n ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map(|t| t.text).unwrap_or("")
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// True before the very first token of the document.
    pub fn at_doc_start(&self) -> bool {
        self.pos == 0
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Consume n tokens as a single composite token.
    pub fn bump_n(&mut self, n: usize, kind: SyntaxKind) {
        if n > 0 && self.pos + n <= self.tokens.len() {
            self.events.push(Event::Token {
                kind,
                n_raw_tokens: n,
            });
            self.pos += n;
        }
    }

    /// Consume the rest of the line, including its newline.
    pub fn bump_line(&mut self) {
        while !self.at_end() && !self.at(SyntaxKind::NEWLINE) {
            self.bump();
        }
        self.eat(SyntaxKind::NEWLINE);
    }

    /// Number of tokens before the next NEWLINE or the end of input.
    pub fn line_len(&self) -> usize {
        let mut n = 0;
        while !matches!(self.nth(n), SyntaxKind::NEWLINE | SyntaxKind::EOF) {
            n += 1;
        }
        n
    }

    /// Token index just after the next NEWLINE (or the end of input).
    fn next_line_offset(&self) -> usize {
        let len = self.line_len();
        if self.nth(len) == SyntaxKind::NEWLINE {
            len + 1
        } else {
            len
        }
    }

    /// Concatenated text of the tokens `start..end` ahead of the cursor.
    pub fn text_ahead(&self, start: usize, end: usize) -> String {
        (start..end).map(|i| self.nth_text(i)).collect()
    }

    /// Text of the current line, without its line ending.
    pub fn line_text(&self) -> String {
        self.text_ahead(0, self.line_len())
    }

    /// Run a lookahead predicate against the next line without consuming anything.
    pub fn peek_next_line<R>(&mut self, f: impl FnOnce(&Parser<'t, 'input>) -> R) -> Option<R> {
        let skip = self.next_line_offset();
        if self.pos + skip >= self.tokens.len() {
            return None;
        }
        let saved = self.pos;
        self.pos += skip;
        let result = f(self);
        self.pos = saved;
        Some(result)
    }

    /// Kind of the token just consumed; NEWLINE at the start of input.
    pub fn prev(&self) -> SyntaxKind {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].kind,
            None => SyntaxKind::NEWLINE,
        }
    }

    /// Check if we're at the start of a line (after newline or at start).
    pub fn at_line_start(&self) -> bool {
        if self.pos == 0 {
            return true;
        }
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.kind == SyntaxKind::NEWLINE)
            .unwrap_or(false)
    }
}

/// A marker for a node being constructed.
///
/// Completing it turns its placeholder into `Start { kind, .. }` and pushes
/// `Finish`; abandoning it drops the placeholder. Dropping it otherwise is a
/// bug and panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    pos: usize,
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// The placeholder is only removed if nothing was pushed after it;
    /// otherwise it stays inert and the Sink ignores it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: usize,
}

impl CompletedMarker {
    /// Start a new node that will become the parent of this one.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse markdown source into a syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}
