use std::ops::Range;

use serde::Serialize;

/// A recognised `:icon:` or `:icon|color:` occurrence.
///
/// `from..to` covers the whole shortcode including both delimiters, in byte
/// offsets of the current document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShortcodeToken {
    pub from: usize,
    pub to: usize,
    pub icon: String,
    /// Empty when no colour was given, or when the separator is followed
    /// directly by the closing delimiter.
    pub color: String,
    pub has_separator: bool,
}

impl ShortcodeToken {
    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    /// The same token moved by `delta` bytes.
    pub fn shifted(&self, delta: isize) -> Self {
        Self {
            from: self.from.saturating_add_signed(delta),
            to: self.to.saturating_add_signed(delta),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolt() -> ShortcodeToken {
        ShortcodeToken {
            from: 4,
            to: 10,
            icon: "bolt".to_string(),
            color: String::new(),
            has_separator: false,
        }
    }

    #[test]
    fn shifted_moves_both_ends() {
        let token = bolt().shifted(3);
        assert_eq!(token.range(), 7..13);
        assert_eq!(token.icon, "bolt");

        assert_eq!(bolt().shifted(-4).range(), 0..6);
    }
}
