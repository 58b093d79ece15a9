//! Slug derivation
//!
//! `Hello World!` → `hello-world`: drop everything outside
//! `[a-zA-Z0-9\s-]`, collapse whitespace/hyphen runs into one hyphen, trim
//! hyphens from both ends, lowercase.

use regex::Regex;
use std::sync::OnceLock;

fn disallowed() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s-]").expect("static pattern compiles"))
}

fn separators() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"[\s-]+").expect("static pattern compiles"))
}

/// Derives a slug from free text. May return an empty string.
pub fn slugify(input: &str) -> String {
    let kept = disallowed().replace_all(input, "");
    let joined = separators().replace_all(&kept, "-");
    joined.trim_matches('-').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("  --Rust  &  WebAssembly-- "), "rust-webassembly");
        assert_eq!(slugify("a_b c"), "ab-c");
        assert_eq!(slugify("Crème brûlée"), "crme-brle");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_output_is_valid_slug() {
        let pattern = Regex::new(crate::validation::SLUG_PATTERN).unwrap();
        for input in ["Hello World!", "2024 Year-in review", "x"] {
            assert!(pattern.is_match(&slugify(input)), "{}", input);
        }
    }
}
