use crate::planner::ScanWindow;
use crate::token::ShortcodeToken;

/// Merge a freshly scanned `batch` for `window` into the previous token list.
///
/// Tokens before the window are kept as they are. Tokens that were after the
/// window survive shifted by the net length change; everything in between is
/// replaced by the batch. The result is sorted without re-sorting because the
/// three parts do not overlap.
pub fn reconcile(
    old: &[ShortcodeToken],
    batch: Vec<ShortcodeToken>,
    window: &ScanWindow,
) -> Vec<ShortcodeToken> {
    let split = old.partition_point(|t| t.from < window.begin);
    let mut tokens = Vec::with_capacity(old.len() + batch.len());
    tokens.extend_from_slice(&old[..split]);
    tokens.extend(batch);

    if let Some(changed) = window.changed {
        let delta = changed.delta();
        let end = window.end as isize;
        tokens.extend(
            old[split..]
                .iter()
                .filter(|t| t.from as isize + delta >= end)
                .map(|t| t.shifted(delta)),
        );
    }

    debug_assert!(
        tokens.windows(2).all(|w| w[0].to <= w[1].from),
        "reconciled tokens overlap or are out of order"
    );
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChangedRange;
    use pretty_assertions::assert_eq;

    fn token(from: usize, icon: &str) -> ShortcodeToken {
        ShortcodeToken {
            from,
            to: from + icon.len() + 2,
            icon: icon.to_string(),
            color: String::new(),
            has_separator: false,
        }
    }

    fn spans(tokens: &[ShortcodeToken]) -> Vec<(usize, &str)> {
        tokens.iter().map(|t| (t.from, t.icon.as_str())).collect()
    }

    #[test]
    fn first_scan_takes_batch() {
        let window = ScanWindow {
            begin: 0,
            end: 20,
            changed: None,
        };
        let tokens = reconcile(&[], vec![token(4, "bolt")], &window);
        assert_eq!(spans(&tokens), vec![(4, "bolt")]);
    }

    #[test]
    fn tokens_inside_window_are_replaced() {
        // "see :bolt: now" with "x" inserted at 5
        let window = ScanWindow {
            begin: 0,
            end: 15,
            changed: Some(ChangedRange {
                from: 5,
                to_a: 5,
                to_b: 6,
            }),
        };
        let tokens = reconcile(&[token(4, "bolt")], vec![token(4, "xbolt")], &window);
        assert_eq!(spans(&tokens), vec![(4, "xbolt")]);
    }

    #[test]
    fn tokens_after_window_shift() {
        // Line 0..10 rescanned, two bytes inserted at 3
        let old = vec![token(0, "a"), token(20, "b"), token(30, "c")];
        let window = ScanWindow {
            begin: 0,
            end: 12,
            changed: Some(ChangedRange {
                from: 3,
                to_a: 3,
                to_b: 5,
            }),
        };
        let tokens = reconcile(&old, vec![token(0, "a")], &window);
        assert_eq!(spans(&tokens), vec![(0, "a"), (22, "b"), (32, "c")]);
        assert_eq!(tokens[1].to, 25);
    }

    #[test]
    fn tokens_before_window_are_untouched() {
        let old = vec![token(0, "a"), token(10, "b"), token(40, "c")];
        let window = ScanWindow {
            begin: 10,
            end: 20,
            changed: Some(ChangedRange {
                from: 12,
                to_a: 15,
                to_b: 12,
            }),
        };
        let tokens = reconcile(&old, vec![], &window);
        assert_eq!(spans(&tokens), vec![(0, "a"), (37, "c")]);
    }

    #[test]
    fn deleting_everything_drops_all_tokens() {
        let old = vec![token(0, "a"), token(5, "b")];
        let window = ScanWindow {
            begin: 0,
            end: 0,
            changed: Some(ChangedRange {
                from: 0,
                to_a: 8,
                to_b: 0,
            }),
        };
        assert!(reconcile(&old, vec![], &window).is_empty());
    }
}
