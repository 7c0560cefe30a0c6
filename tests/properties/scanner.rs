//! Property tests for import scanning.

use proptest::prelude::*;

use lessbuild::scan_imports;

fn reference() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_./-]{1,24}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Scanning never panics on arbitrary input.
    #[test]
    fn property_scan_never_panics(content in "(?s).{0,512}") {
        let _ = scan_imports(&content);
    }

    /// PROPERTY: Every well-formed directive is found, in source order.
    #[test]
    fn property_scan_finds_all_directives_in_order(
        refs in proptest::collection::vec(reference(), 0..=8),
        filler in "[a-z{}:; \n]{0,40}",
    ) {
        let content: String = refs
            .iter()
            .map(|r| format!("@import \"{}\";\n{}\n", r, filler))
            .collect();

        prop_assert_eq!(scan_imports(&content), refs);
    }

    /// PROPERTY: Text without an `@import` keyword yields nothing.
    #[test]
    fn property_no_keyword_no_imports(content in "[^@]{0,256}") {
        prop_assert!(scan_imports(&content).is_empty());
    }
}
