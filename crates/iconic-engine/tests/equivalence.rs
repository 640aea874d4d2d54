//! Incremental scanning must agree with a fresh whole-document scan after any
//! sequence of edits.

use iconic_config::ScanConfig;
use iconic_engine::editing::{Cmd, Document};
use proptest::prelude::*;

/// Pieces of Markdown that open, close or sit inside skip regions.
const FRAGMENTS: &[&str] = &[
    ":", "::", "a", "icon", "|", "#", "#f00", " ", "\n", "\n\n", "`", "```\n", "~~~\n", "$", "$$\n",
    "%%", "%%\n", "<b>", "<div>\n", "<!--", "-->\n", "[[", "]]", "[x](", ")", "![", "\\", "---\n",
    "| a |\n|---|\n", "| ", "- ", "> ", "# ", "*", "_", "http://x.y ", ":ok:", ":x|red:", "é",
    "\r\n", "\r\n\r\n",
];

#[derive(Debug, Clone)]
enum Op {
    Insert { at: usize, fragment: usize },
    Delete { at: usize, len: usize },
    FinishParsing,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<usize>(), 0..FRAGMENTS.len()).prop_map(|(at, fragment)| Op::Insert { at, fragment }),
        2 => (any::<usize>(), 1..6usize).prop_map(|(at, len)| Op::Delete { at, len }),
        1 => Just(Op::FinishParsing),
    ]
}

fn floor_boundary(text: &str, mut at: usize) -> usize {
    at = at.min(text.len());
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

fn to_cmd(text: &str, op: &Op) -> Option<Cmd> {
    match *op {
        Op::Insert { at, fragment } => Some(Cmd::InsertText {
            at: floor_boundary(text, at % (text.len() + 1)),
            text: FRAGMENTS[fragment].to_string(),
        }),
        Op::Delete { at, len } => {
            if text.is_empty() {
                return None;
            }
            let start = floor_boundary(text, at % text.len());
            let end = floor_boundary(text, start + len);
            (end > start).then(|| Cmd::DeleteRange { range: start..end })
        }
        Op::FinishParsing => None,
    }
}

fn assert_sorted(doc: &Document) {
    let tokens = doc.tokens();
    assert!(
        tokens.windows(2).all(|w| w[0].to <= w[1].from),
        "tokens overlap or are unsorted: {tokens:?}"
    );
    assert!(tokens.iter().all(|t| t.from < t.to));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn incremental_matches_full_rescan(
        seed in prop::collection::vec(0..FRAGMENTS.len(), 0..12),
        ops in prop::collection::vec(op(), 1..30),
    ) {
        let _ = env_logger::builder().is_test(true).try_init();
        let initial: String = seed.iter().map(|&i| FRAGMENTS[i]).collect();
        let mut doc = Document::from_bytes(initial.as_bytes()).unwrap();

        for op in &ops {
            if let Some(cmd) = to_cmd(&doc.text(), op) {
                doc.apply(cmd).unwrap();
            }
            assert_sorted(&doc);
            let fresh = doc.rescan_from_scratch().unwrap();
            prop_assert_eq!(
                doc.tokens(),
                fresh.as_slice(),
                "after {:?} on {:?}", op, doc.text()
            );
        }
    }

    #[test]
    fn deferred_scans_catch_up(
        seed in prop::collection::vec(0..FRAGMENTS.len(), 0..12),
        budget in 0..40usize,
        ops in prop::collection::vec(op(), 1..30),
    ) {
        let _ = env_logger::builder().is_test(true).try_init();
        let initial: String = seed.iter().map(|&i| FRAGMENTS[i]).collect();
        let mut doc =
            Document::with_options(initial.as_bytes(), ScanConfig::default(), Some(budget)).unwrap();

        for op in &ops {
            match to_cmd(&doc.text(), op) {
                Some(cmd) => {
                    doc.apply(cmd).unwrap();
                }
                None => doc.finish_parsing().unwrap(),
            }
            assert_sorted(&doc);
            if doc.tree_ready() {
                let fresh = doc.rescan_from_scratch().unwrap();
                prop_assert_eq!(doc.tokens(), fresh.as_slice());
            }
        }

        doc.finish_parsing().unwrap();
        let fresh = doc.rescan_from_scratch().unwrap();
        prop_assert_eq!(doc.tokens(), fresh.as_slice());
    }
}
