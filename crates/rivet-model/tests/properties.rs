use proptest::prelude::*;
use rivet_model::{
    accessibility::{Accessibility, effective_accessibility},
    ident::{allocate_unique, escape_ident, is_legal_ident, is_reserved_word},
    source::{MemorySource, TypeDecl},
};
use std::collections::HashSet;

const NAMES: [&str; 15] = [
    "T", "T_1", "U", "type", "fn", "Self", "crate", "self", "super", "value", "x", "self_",
    "crate_", "Self_", "super_",
];

fn arb_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(NAMES.to_vec())
}

fn arb_accessibility() -> impl Strategy<Value = Accessibility> {
    prop_oneof![
        Just(Accessibility::Private),
        Just(Accessibility::ProtectedAndInternal),
        Just(Accessibility::Protected),
        Just(Accessibility::Internal),
        Just(Accessibility::ProtectedOrInternal),
        Just(Accessibility::Public),
    ]
}

proptest! {
    #[test]
    fn allocated_idents_are_distinct_and_legal(
        names in prop::collection::vec(arb_name(), 0..12)
    ) {
        let idents = allocate_unique(names.as_slice());

        prop_assert_eq!(idents.len(), names.len());

        let distinct: HashSet<_> = idents.iter().collect();
        prop_assert_eq!(distinct.len(), idents.len());

        for ident in &idents {
            prop_assert!(is_legal_ident(ident), "illegal ident {}", ident);
        }
    }

    #[test]
    fn first_occurrence_keeps_its_name(
        names in prop::collection::vec(arb_name(), 1..12)
    ) {
        let idents = allocate_unique(names.as_slice());
        let mut seen = HashSet::new();

        for (name, ident) in names.iter().zip(&idents) {
            if !seen.insert(*name) {
                continue;
            }

            let escaped = escape_ident(name);
            if !is_reserved_word(name) {
                prop_assert_eq!(ident, *name);
            } else if !names.iter().any(|n| *n == escaped) {
                prop_assert_eq!(ident, &escaped);
            }
        }
    }

    #[test]
    fn nested_accessibility_is_chain_minimum(
        chain in prop::collection::vec(arb_accessibility(), 1..6)
    ) {
        let mut source = MemorySource::new();
        let mut current = source.declare(
            TypeDecl::class("Level0")
                .in_namespace("Acme")
                .accessibility(chain[0]),
        );

        for (depth, accessibility) in chain.iter().enumerate().skip(1) {
            current = source.declare(
                TypeDecl::class(format!("Level{depth}"))
                    .nested_in(current)
                    .accessibility(*accessibility),
            );
        }

        let expected = chain.iter().copied().min().expect("chain is non-empty");
        prop_assert_eq!(effective_accessibility(&source, current), expected);
    }
}
