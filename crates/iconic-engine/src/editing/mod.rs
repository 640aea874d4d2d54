/*!
 * # Host Adapter
 *
 * A minimal editor around [`ShortcodeField`](crate::field::ShortcodeField),
 * standing in for the application that would normally own the document.
 *
 * ### Single Source of Truth: xi-rope Buffer
 * - The document lives in one **`xi_rope::Rope`**
 * - Every edit is a **`Cmd`** compiled to a `Delta`, so the change can be
 *   described to the scanner as a `ChangeDesc`
 *
 * ### Lagging Parser
 * - With a parse budget, only a prefix of the document is reparsed after each
 *   edit, like a background parser that has not caught up yet
 * - The field then defers its scan until `finish_parsing()` completes the tree
 *
 * ## Usage Pattern
 *
 * ```rust
 * use iconic_engine::editing::{Cmd, Document};
 *
 * let mut doc = Document::from_bytes(b"see :bolt: now").unwrap();
 * let patch = doc.apply(Cmd::InsertText { at: 5, text: "x".to_string() }).unwrap();
 *
 * assert_eq!(patch.changed, vec![5..6]);
 * assert_eq!(doc.tokens()[0].icon, "xbolt");
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;

pub use commands::{Cmd, Edit};
pub use document::Document;
pub use patch::Patch;
