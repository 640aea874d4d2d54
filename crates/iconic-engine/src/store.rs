use crate::changes::ChangeDesc;
use crate::error::ScanError;
use crate::tree::SyntaxTree;

/// The tree the current tokens were computed against, plus every change
/// since then that has not been scanned yet.
#[derive(Debug, Clone)]
pub struct ChangeAccumulator {
    prev_tree: SyntaxTree,
    pending: Option<ChangeDesc>,
}

impl ChangeAccumulator {
    pub fn new(prev_tree: SyntaxTree) -> Self {
        Self {
            prev_tree,
            pending: None,
        }
    }

    pub fn with_pending(prev_tree: SyntaxTree, pending: ChangeDesc) -> Self {
        Self {
            prev_tree,
            pending: Some(pending),
        }
    }

    /// Fold `change` into the pending change. On error the accumulator is
    /// left as it was.
    pub fn record(&mut self, change: &ChangeDesc) -> Result<(), ScanError> {
        let composed = match &self.pending {
            Some(pending) => pending.compose(change)?,
            None => {
                if change.len_before() != self.prev_tree.len() {
                    return Err(ScanError::ChangeLengthMismatch {
                        expected: self.prev_tree.len(),
                        actual: change.len_before(),
                    });
                }
                change.clone()
            }
        };
        self.pending = Some(composed);
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take(&mut self) -> Option<ChangeDesc> {
        self.pending.take()
    }

    pub fn prev_tree(&self) -> &SyntaxTree {
        &self.prev_tree
    }

    pub fn replace_tree(&mut self, tree: SyntaxTree) {
        self.prev_tree = tree;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_record_checks_tree_length() {
        let mut store = ChangeAccumulator::new(SyntaxTree::parse("abc"));
        let err = store.record(&ChangeDesc::insertion(0, 1, 5)).unwrap_err();
        assert!(matches!(
            err,
            ScanError::ChangeLengthMismatch {
                expected: 3,
                actual: 5
            }
        ));
        assert!(!store.has_pending());
    }

    #[test]
    fn records_compose() {
        let mut store = ChangeAccumulator::new(SyntaxTree::parse("abc"));
        store.record(&ChangeDesc::insertion(0, 1, 3)).unwrap();
        store.record(&ChangeDesc::insertion(4, 2, 4)).unwrap();

        let pending = store.take().unwrap();
        assert_eq!(pending.len_before(), 3);
        assert_eq!(pending.len_after(), 6);
        assert!(store.take().is_none());
    }

    #[test]
    fn failed_compose_keeps_pending() {
        let mut store =
            ChangeAccumulator::with_pending(SyntaxTree::empty(), ChangeDesc::insertion(0, 4, 0));
        assert!(store.record(&ChangeDesc::identity(9)).is_err());
        assert_eq!(store.take().map(|c| c.len_after()), Some(4));
    }
}
