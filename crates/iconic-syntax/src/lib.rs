//! # iconic-syntax
//!
//! A lossless Markdown syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model. It is the syntax tree provider for the
//! incremental shortcode scanner in `iconic-engine`.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! Every byte of the source lands in exactly one token, so a node's
//! `text_range()` is an exact byte range in the document. The scanner uses
//! those ranges to step over regions where `:icon:` is not a shortcode
//! (code, math, comments, HTML, links, ...).
//!
//! ## Node Kinds That Matter To The Scanner
//!
//! Multi-line raw blocks (fenced code, `$$` math, `%%`/`<!--` comments, HTML,
//! frontmatter) are wrapped in a block node and carry a `*_BEGIN` line node
//! and, once closed, an `*_END` line node. An edit that changes how far such a
//! block reaches always touches one of those line nodes.
//!
//! ## Module Structure
//!
//! ```text
//! iconic-syntax/
//! ├── lib.rs           # Public API
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Block-level elements, raw blocks and tables
//!         └── inline.rs# Inline elements
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use iconic_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("```\n:x:\n```\n");
//!
//! assert_eq!(tree.text().to_string(), "```\n:x:\n```\n");
//! let code = tree.children().next().unwrap();
//! assert_eq!(code.kind(), SyntaxKind::FENCED_CODE);
//! ```

pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::parse;
pub use syntax_kind::{MarkdownLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
