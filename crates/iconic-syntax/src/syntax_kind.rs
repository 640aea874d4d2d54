//! SyntaxKind enum for all tokens and nodes in the Markdown CST.
//!
//! Tokens and nodes share a single enum. Every byte of the source appears in
//! exactly one token, so node ranges are exact byte offsets into the text.

/// All syntax kinds for the Markdown CST.
///
/// Tokens come first (up to and including `EOF`), then composite nodes.
/// The `repr(u16)` matches rowan's raw kind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// Plain text run, including `:` and the other shortcode characters
    TEXT,
    /// `>`
    GT,
    /// `<`
    LT,
    /// `-`
    DASH,
    /// `*`
    STAR,
    /// `+`
    PLUS,
    /// `_`
    UNDERSCORE,
    /// Single backtick
    BACKTICK,
    /// `~`
    TILDE,
    /// `[`
    LBRACKET,
    /// `]`
    RBRACKET,
    /// `|`
    PIPE,
    /// `(`
    LPAREN,
    /// `)`
    RPAREN,
    /// `#`
    HASH,
    /// `!`
    BANG,
    /// `$`
    DOLLAR,
    /// `%`
    PERCENT,
    /// Lone backslash
    BACKSLASH,
    /// Backslash followed by ASCII punctuation, e.g. `\:`
    ESCAPE,
    /// Backtick run opening or closing a code span (composite)
    CODE_SPAN_DELIM,
    /// `%%`, `<!--` or `-->` bounding an inline comment (composite)
    COMMENT_MARKER,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// `---` fenced metadata block at the very start of the document
    FRONTMATTER,
    FRONTMATTER_BEGIN,
    FRONTMATTER_END,
    /// ATX heading (`# ...`)
    HEADING,
    /// Paragraph block
    PARAGRAPH,
    /// Blockquote container (`> ...`)
    BLOCK_QUOTE,
    /// Individual list item
    LIST_ITEM,
    /// Thematic break (`---`, `***`, `___`)
    THEMATIC_BREAK,
    /// Fenced code block
    FENCED_CODE,
    CODE_FENCE_BEGIN,
    CODE_FENCE_END,
    /// `$$` display math block
    MATH_BLOCK,
    MATH_BEGIN,
    MATH_END,
    /// Raw HTML block, runs until an empty line
    HTML_BLOCK,
    HTML_BEGIN,
    HTML_END,
    /// `%%` or `<!--` comment spanning lines
    COMMENT_BLOCK,
    COMMENT_BEGIN,
    COMMENT_END,
    /// Pipe table
    TABLE,
    TABLE_HEADER_ROW,
    /// `| --- | :-: |` alignment row
    TABLE_DELIMITER_ROW,
    TABLE_ROW,
    /// Inline content container (unmatched brackets and the like)
    INLINE,
    /// Inline code span
    CODE_SPAN,
    /// Inline math `$x$`
    MATH_INLINE,
    /// Inline comment `%%...%%` or `<!-- ... -->`
    COMMENT,
    /// Inline HTML tag `<span>`, `</span>`
    HTML_TAG,
    /// Hashtag `#tag`
    TAG,
    /// Wikilink (`[[target]]` or `[[target|alias]]`)
    WIKILINK,
    /// Embed (`![[target]]`)
    EMBED,
    /// Standard link `[text](url)`
    LINK,
    /// The `(url)` part of a link
    LINK_DEST,
    /// Image `![alt](url)`
    IMAGE,
    /// Autolink `<https://...>`
    AUTOLINK,
    /// Bare `http(s)://` URL in running text
    BARE_URL,
    /// Emphasis `*text*`
    EMPHASIS,
    /// Strong emphasis `**text**`
    STRONG,
    /// Strikethrough `~~text~~`
    STRIKETHROUGH,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia (whitespace/newlines).
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE)
    }

    /// Returns true for the line nodes that open or close a multi-line raw block.
    pub fn is_block_boundary(self) -> bool {
        matches!(
            self,
            Self::FRONTMATTER_BEGIN
                | Self::FRONTMATTER_END
                | Self::CODE_FENCE_BEGIN
                | Self::CODE_FENCE_END
                | Self::MATH_BEGIN
                | Self::MATH_END
                | Self::HTML_BEGIN
                | Self::HTML_END
                | Self::COMMENT_BEGIN
                | Self::COMMENT_END
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkdownLang {}

impl rowan::Language for MarkdownLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<MarkdownLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<MarkdownLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<MarkdownLang>;
