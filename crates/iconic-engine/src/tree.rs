use std::ops::ControlFlow;

use iconic_syntax::{SyntaxElement, SyntaxKind, SyntaxNode, parse};
use rowan::NodeOrToken;

/// An immutable syntax tree over some prefix of the document.
///
/// The tree may lag behind the text: it covers the document only once its
/// length equals the document length.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub fn parse(text: &str) -> Self {
        Self { root: parse(text) }
    }

    /// Parse at most `budget` bytes, clipped back to a char boundary.
    pub fn parse_prefix(text: &str, budget: usize) -> Self {
        let mut end = budget.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Self::parse(&text[..end])
    }

    pub fn empty() -> Self {
        Self::parse("")
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn len(&self) -> usize {
        usize::from(self.root.text_range().end())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn covers(&self, doc_len: usize) -> bool {
        self.len() == doc_len
    }

    /// Visit every node and token overlapping `from..=to`, parents before
    /// children. Touching ranges count as overlapping.
    pub fn for_each_in_range(
        &self,
        from: usize,
        to: usize,
        mut f: impl FnMut(&SyntaxElement) -> ControlFlow<()>,
    ) {
        let _ = visit(&self.root, from, to, &mut f);
    }

    pub fn any_in_range(
        &self,
        from: usize,
        to: usize,
        mut pred: impl FnMut(&SyntaxElement) -> bool,
    ) -> bool {
        let mut found = false;
        self.for_each_in_range(from, to, |element| {
            if pred(element) {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// Cursor on the first top-level element ending after `offset`, or `None`
    /// when `offset` is at or past the end of the tree.
    pub fn cursor_at(&self, offset: usize) -> Option<TreeCursor> {
        self.root
            .children_with_tokens()
            .find(|element| usize::from(element.text_range().end()) > offset)
            .map(|current| TreeCursor { current })
    }
}

fn visit(
    node: &SyntaxNode,
    from: usize,
    to: usize,
    f: &mut impl FnMut(&SyntaxElement) -> ControlFlow<()>,
) -> ControlFlow<()> {
    for child in node.children_with_tokens() {
        let range = child.text_range();
        let (start, end) = (usize::from(range.start()), usize::from(range.end()));
        if start > to {
            break;
        }
        if end < from {
            continue;
        }
        f(&child)?;
        if let NodeOrToken::Node(inner) = &child {
            visit(inner, from, to, f)?;
        }
    }
    ControlFlow::Continue(())
}

/// A position in a pre-order walk of the tree.
#[derive(Debug, Clone)]
pub struct TreeCursor {
    current: SyntaxElement,
}

impl TreeCursor {
    pub fn kind(&self) -> SyntaxKind {
        self.current.kind()
    }

    pub fn range(&self) -> (usize, usize) {
        let range = self.current.text_range();
        (usize::from(range.start()), usize::from(range.end()))
    }

    /// Descend into the first child. Returns false for tokens and empty nodes.
    pub fn first_child(&mut self) -> bool {
        let child = match &self.current {
            NodeOrToken::Node(node) => node.first_child_or_token(),
            NodeOrToken::Token(_) => None,
        };
        match child {
            Some(child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// Move to the next sibling, climbing to an ancestor's sibling when needed.
    /// Returns false at the end of the tree.
    pub fn next_skipping_children(&mut self) -> bool {
        let mut element = self.current.clone();
        loop {
            if let Some(sibling) = element.next_sibling_or_token() {
                self.current = sibling;
                return true;
            }
            match element.parent() {
                Some(parent) if parent.parent().is_some() => {
                    element = NodeOrToken::Node(parent);
                }
                _ => return false,
            }
        }
    }

    /// Pre-order successor.
    pub fn next(&mut self) -> bool {
        self.first_child() || self.next_skipping_children()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_prefix_respects_char_boundaries() {
        let text = "a→b";
        let tree = SyntaxTree::parse_prefix(text, 2);
        assert_eq!(tree.len(), 1);
        assert!(!tree.covers(text.len()));
        assert!(SyntaxTree::parse_prefix(text, 100).covers(text.len()));
    }

    #[test]
    fn range_query_includes_touching_nodes() {
        let tree = SyntaxTree::parse("`a` b\n");
        assert!(tree.any_in_range(3, 3, |e| e.kind() == SyntaxKind::CODE_SPAN));
        assert!(!tree.any_in_range(4, 5, |e| e.kind() == SyntaxKind::CODE_SPAN));
    }

    #[test]
    fn range_query_visits_nested_elements() {
        let tree = SyntaxTree::parse("```\nx\n```\n");
        let mut kinds = Vec::new();
        tree.for_each_in_range(0, 0, |e| {
            kinds.push(e.kind());
            ControlFlow::Continue(())
        });
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::FENCED_CODE,
                SyntaxKind::CODE_FENCE_BEGIN,
                SyntaxKind::BACKTICK
            ]
        );
    }

    #[test]
    fn cursor_walks_in_document_order() {
        let tree = SyntaxTree::parse("a\n\nb\n");
        let mut cursor = tree.cursor_at(0).unwrap();
        let mut starts = vec![cursor.range().0];
        while cursor.next() {
            starts.push(cursor.range().0);
        }
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(starts.last().copied(), Some(4));
    }

    #[test]
    fn cursor_past_end_is_none() {
        let tree = SyntaxTree::parse("abc");
        assert!(tree.cursor_at(3).is_none());
        assert!(SyntaxTree::empty().cursor_at(0).is_none());
    }

    #[test]
    fn skipping_children_climbs_to_parent_sibling() {
        let tree = SyntaxTree::parse("`x`\n\ny\n");
        let mut cursor = tree.cursor_at(0).unwrap();
        assert_eq!(cursor.kind(), SyntaxKind::PARAGRAPH);
        assert!(cursor.first_child());
        assert_eq!(cursor.kind(), SyntaxKind::CODE_SPAN);
        assert!(cursor.first_child());
        assert_eq!(cursor.kind(), SyntaxKind::CODE_SPAN_DELIM);
        // Climb out of CODE_SPAN to the NEWLINE that follows it
        cursor.next_skipping_children();
        cursor.next_skipping_children();
        cursor.next_skipping_children();
        assert_eq!(cursor.kind(), SyntaxKind::NEWLINE);
        assert_eq!(cursor.range(), (3, 4));
    }
}
