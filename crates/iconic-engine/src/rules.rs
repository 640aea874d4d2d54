//! Which syntax nodes hide shortcodes, and which ones can change how far
//! away from an edit the tree's structure reaches.

use iconic_syntax::SyntaxKind;

/// Static description of how the scanner treats node kinds.
#[derive(Debug)]
pub struct RegionRules {
    /// Nodes whose whole range is stepped over without reading text.
    pub skip: &'static [SyntaxKind],
    /// Nodes that, when an edit touches them, may have changed the structure
    /// of everything after them. The scan then runs to the end of the document.
    pub interference: &'static [SyntaxKind],
    /// `(child, block)`: an edit touching `child` inside a `block` moves the
    /// scan start back to the start of `block`.
    pub shift: &'static [(SyntaxKind, SyntaxKind)],
}

impl RegionRules {
    pub fn is_skip(&self, kind: SyntaxKind) -> bool {
        self.skip.contains(&kind)
    }

    pub fn interferes(&self, kind: SyntaxKind) -> bool {
        self.interference.contains(&kind)
    }

    /// The block kind whose start an edit on `kind` must rescan from.
    pub fn shift_target(&self, kind: SyntaxKind) -> Option<SyntaxKind> {
        self.shift
            .iter()
            .find(|(child, _)| *child == kind)
            .map(|(_, block)| *block)
    }
}

pub static MARKDOWN_RULES: RegionRules = RegionRules {
    skip: &[
        SyntaxKind::CODE_SPAN,
        SyntaxKind::FENCED_CODE,
        SyntaxKind::MATH_INLINE,
        SyntaxKind::MATH_BLOCK,
        SyntaxKind::HTML_BLOCK,
        SyntaxKind::HTML_TAG,
        SyntaxKind::COMMENT,
        SyntaxKind::COMMENT_BLOCK,
        SyntaxKind::FRONTMATTER,
        SyntaxKind::TAG,
        SyntaxKind::WIKILINK,
        SyntaxKind::EMBED,
        SyntaxKind::LINK_DEST,
        SyntaxKind::IMAGE,
        SyntaxKind::AUTOLINK,
        SyntaxKind::BARE_URL,
        SyntaxKind::ESCAPE,
        SyntaxKind::THEMATIC_BREAK,
        SyntaxKind::TABLE_DELIMITER_ROW,
    ],
    interference: &[
        SyntaxKind::FRONTMATTER_BEGIN,
        SyntaxKind::FRONTMATTER_END,
        SyntaxKind::CODE_FENCE_BEGIN,
        SyntaxKind::CODE_FENCE_END,
        SyntaxKind::MATH_BEGIN,
        SyntaxKind::MATH_END,
        SyntaxKind::HTML_BEGIN,
        SyntaxKind::HTML_END,
        SyntaxKind::COMMENT_BEGIN,
        SyntaxKind::COMMENT_END,
        SyntaxKind::COMMENT_MARKER,
        SyntaxKind::CODE_SPAN_DELIM,
        SyntaxKind::HTML_TAG,
    ],
    shift: &[
        (SyntaxKind::TABLE_DELIMITER_ROW, SyntaxKind::TABLE),
        (SyntaxKind::FRONTMATTER_END, SyntaxKind::FRONTMATTER),
    ],
};
