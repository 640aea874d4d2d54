//! # iconic-engine
//!
//! Finds `:icon:` and `:icon|color:` shortcodes in a Markdown document that is
//! being edited, without rescanning the whole document on every keystroke.
//!
//! ```text
//! Transaction ─▶ ChangeAccumulator ─▶ plan() ─▶ StreamParser ─▶ reconcile() ─▶ ShortcodeField
//!  (ChangeDesc)   (compose pending)   (window)   (tokens in       (splice into
//!                                                 the window)      old tokens)
//! ```
//!
//! Shortcodes inside code, math, HTML, comments, links and similar regions are
//! ignored. Those regions come from the syntax tree built by `iconic-syntax`;
//! [`rules::MARKDOWN_RULES`] lists which node kinds hide shortcodes and which
//! ones force a wider rescan when an edit touches them.
//!
//! ## Quick Start
//!
//! ```
//! use iconic_config::ScanConfig;
//! use iconic_engine::{ChangeDesc, ShortcodeField, SyntaxTree, Transaction};
//! use xi_rope::Rope;
//!
//! let doc = Rope::from("see :bolt: now");
//! let tree = SyntaxTree::parse("see :bolt: now");
//! let field = ShortcodeField::create(&doc, &tree, &ScanConfig::default()).unwrap();
//! assert_eq!(field.tokens()[0].range(), 4..10);
//!
//! // Insert "x" at offset 5
//! let edited = Rope::from("see :xbolt: now");
//! let tree = SyntaxTree::parse("see :xbolt: now");
//! let tx = Transaction::new(ChangeDesc::insertion(5, 1, 14), &edited, &tree);
//! let field = field.update(&tx).unwrap();
//! assert_eq!(field.tokens()[0].icon, "xbolt");
//! ```

pub mod changes;
pub mod editing;
pub mod error;
pub mod field;
pub mod plain;
pub mod planner;
pub mod reconcile;
pub mod rules;
pub mod scanner;
pub mod store;
pub mod text;
pub mod token;
pub mod tree;

pub use changes::{ChangeDesc, ChangedRange, Section};
pub use error::ScanError;
pub use field::{FieldPhase, ShortcodeField, Transaction, VersionStamp};
pub use plain::{PlainShortcode, PlainTextScanner};
pub use rules::{MARKDOWN_RULES, RegionRules};
pub use token::ShortcodeToken;
pub use tree::SyntaxTree;
