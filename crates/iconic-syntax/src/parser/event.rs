//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree
//! building. The parser emits a flat sequence:
//!
//! ```text
//! Start(CODE_SPAN)
//!   Token(CODE_SPAN_DELIM)
//!   Token(TEXT)
//!   Token(CODE_SPAN_DELIM)
//! Finish
//! ```
//!
//! and the [`Sink`](super::sink::Sink) replays it into a Rowan tree, keeping a
//! stack of open nodes. `forward_parent` lets an already-parsed node be
//! wrapped after the fact (see `CompletedMarker::precede`).

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    ///
    /// If `forward_parent` is set it points at another `Start` that must
    /// become this node's parent.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Add a token to the current node.
    ///
    /// `n_raw_tokens` lexer tokens are glued into one tree token of `kind`,
    /// e.g. a run of backticks becoming a single `CODE_SPAN_DELIM`.
    Token { kind: SyntaxKind, n_raw_tokens: usize },

    /// Finish the current node.
    Finish,

    /// Left behind by `Parser::start`; replaced on completion, ignored if abandoned.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}
