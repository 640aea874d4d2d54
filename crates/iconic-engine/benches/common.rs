// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title :house:\n\nParagraph with :star|gold: and `:not-an-icon:` inside.\n\n- Bullet :check:\n  - Nested :x|#f00:\n\n```rust\nlet s = \":skipped:\";\n```\n\n| a | b |\n|---|---|\n| :one: | two |\n\n";
    base.repeat(size)
}

/// Offset just after the first `Paragraph with ` in the middle copy of the content.
#[allow(dead_code)]
pub fn middle_paragraph_offset(content: &str) -> usize {
    let middle = content.len() / 2;
    content[middle..]
        .find("Paragraph with ")
        .map(|i| middle + i + "Paragraph with ".len())
        .unwrap_or(0)
}
