//! Generated-identifier allocation.
//!
//! Generic parameters are re-exposed on generated wrappers, so their names
//! must be unique within one descriptor and legal in generated code even when
//! the source language allowed a name the target reserves.

use std::{collections::HashSet, sync::LazyLock};

///
/// RESERVED_WORDS
/// keywords of the generated language, strict and reserved
///

static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    // https://doc.rust-lang.org/reference/keywords.html
    [
        "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
        "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
        "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
        "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box",
        "do", "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
    ]
    .into_iter()
    .collect()
});

// keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: [&str; 4] = ["crate", "self", "Self", "super"];

/// Check if an identifier is a reserved word.
#[must_use]
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word)
}

/// Make a name usable as a generated identifier.
///
/// Reserved words become raw identifiers (`r#type`); the few keywords that
/// cannot be raw get a trailing underscore. Anything else is returned as-is.
#[must_use]
pub fn escape_ident(name: &str) -> String {
    if !is_reserved_word(name) {
        name.to_string()
    } else if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        format!("r#{name}")
    }
}

/// Whether `ident` can appear verbatim as an identifier in generated code.
#[must_use]
pub fn is_legal_ident(ident: &str) -> bool {
    let body = ident.strip_prefix("r#").unwrap_or(ident);
    if ident.starts_with("r#") && NON_RAW_KEYWORDS.contains(&body) {
        return false;
    }
    if !ident.starts_with("r#") && is_reserved_word(body) {
        return false;
    }

    let mut chars = body.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');

    valid_start && body != "_" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

///
/// IdentAllocator
///
/// Hands out escaped identifiers that are unique within one allocator. A name
/// already taken gets `_1`, `_2`, ... appended until it is free.
///

#[derive(Debug, Default)]
pub struct IdentAllocator {
    used: HashSet<String>,
}

impl IdentAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the escaped form of `name` without suffixing.
    /// Returns false if it was already taken.
    pub fn reserve(&mut self, name: &str) -> bool {
        self.used.insert(escape_ident(name))
    }

    #[must_use]
    pub fn is_used(&self, ident: &str) -> bool {
        self.used.contains(ident)
    }

    /// Allocate a unique identifier derived from `original`.
    pub fn allocate(&mut self, original: &str) -> String {
        let mut count = 0usize;
        let mut candidate = escape_ident(original);

        while self.used.contains(&candidate) {
            count += 1;
            candidate = escape_ident(&format!("{original}_{count}"));
        }

        self.used.insert(candidate.clone());
        candidate
    }
}

/// Allocate one identifier per original name, in order.
///
/// First occurrences are claimed before any suffix is handed out: plain names
/// first, so they always keep their spelling, then reserved names in their
/// escaped form. A reserved name is suffixed only when a plain name already
/// spells its escaped form (`self`, `self_` yields `self_1`, `self_`). Later
/// duplicates are suffixed around every claimed name, including ones further
/// down the list (`T`, `T`, `T_1` yields `T`, `T_2`, `T_1`).
#[must_use]
pub fn allocate_unique<S: AsRef<str>>(originals: &[S]) -> Vec<String> {
    let mut allocator = IdentAllocator::new();
    let mut seen = HashSet::new();
    let first: Vec<bool> = originals
        .iter()
        .map(|original| seen.insert(original.as_ref()))
        .collect();
    let mut idents: Vec<Option<String>> = vec![None; originals.len()];

    for reserved in [false, true] {
        for (index, original) in originals.iter().enumerate() {
            let original = original.as_ref();
            if first[index] && is_reserved_word(original) == reserved {
                idents[index] = Some(allocator.allocate(original));
            }
        }
    }

    idents
        .into_iter()
        .zip(originals)
        .map(|(ident, original)| ident.unwrap_or_else(|| allocator.allocate(original.as_ref())))
        .collect()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_allocation_appends_incrementing_suffix() {
        let mut allocator = IdentAllocator::new();

        assert_eq!(allocator.allocate("T"), "T");
        assert_eq!(allocator.allocate("T"), "T_1");
        assert_eq!(allocator.allocate("T"), "T_2");
        assert_eq!(allocator.allocate("U"), "U");
    }

    #[test]
    fn literal_suffix_names_do_not_collide() {
        assert_eq!(allocate_unique(&["T", "T_1"]), vec!["T", "T_1"]);
        assert_eq!(allocate_unique(&["T", "T", "T_1"]), vec!["T", "T_2", "T_1"]);
        assert_eq!(allocate_unique(&["T_1", "T", "T"]), vec!["T_1", "T", "T_2"]);
    }

    #[test]
    fn plain_name_keeps_spelling_over_escaped_keyword() {
        assert_eq!(allocate_unique(&["self", "self_"]), vec!["self_1", "self_"]);
        assert_eq!(allocate_unique(&["self_", "self"]), vec!["self_", "self_1"]);
        assert_eq!(
            allocate_unique(&["crate", "crate_", "crate"]),
            vec!["crate_1", "crate_", "crate_2"]
        );
    }

    #[test]
    fn reserved_words_are_escaped() {
        assert_eq!(escape_ident("type"), "r#type");
        assert_eq!(escape_ident("self"), "self_");
        assert_eq!(escape_ident("Value"), "Value");

        assert_eq!(
            allocate_unique(&["type", "type", "fn"]),
            vec!["r#type", "type_1", "r#fn"]
        );
    }

    #[test]
    fn legality_rejects_bare_keywords_and_bad_raw_forms() {
        assert!(is_legal_ident("T"));
        assert!(is_legal_ident("r#type"));
        assert!(is_legal_ident("self_"));
        assert!(!is_legal_ident("type"));
        assert!(!is_legal_ident("r#self"));
        assert!(!is_legal_ident("1T"));
        assert!(!is_legal_ident("_"));
        assert!(!is_legal_ident(""));
    }
}
