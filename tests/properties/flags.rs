//! Property tests for compiler flag rendering.

use proptest::prelude::*;

use lessbuild::config::{CompilationOptions, Compression, OptimizationLevel};
use lessbuild::process::compiler_flags;

fn compression() -> impl Strategy<Value = Compression> {
    prop_oneof![
        Just(Compression::None),
        Just(Compression::Whitespace),
        Just(Compression::Yui),
    ]
}

fn optimization() -> impl Strategy<Value = Option<OptimizationLevel>> {
    prop_oneof![
        Just(None),
        Just(Some(OptimizationLevel::O0)),
        Just(Some(OptimizationLevel::O1)),
        Just(Some(OptimizationLevel::O2)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Each flag appears exactly when its option is set, in a
    /// fixed order, and rendering is deterministic.
    #[test]
    fn property_flags_follow_options(
        strict_imports in any::<bool>(),
        relative_urls in any::<bool>(),
        compression in compression(),
        optimization in optimization(),
        root_path in proptest::option::of("/[a-z]{1,8}/"),
    ) {
        let options = CompilationOptions {
            strict_imports,
            relative_urls,
            compression,
            optimization,
            root_path: root_path.clone(),
            ..CompilationOptions::default()
        };

        let flags = compiler_flags(&options);
        prop_assert_eq!(&flags, &compiler_flags(&options));

        prop_assert_eq!(flags.contains(&"--strict-imports".to_string()), strict_imports);
        prop_assert_eq!(flags.contains(&"--relative-urls".to_string()), relative_urls);
        prop_assert_eq!(
            flags.iter().any(|f| f == "--compress" || f == "--yui-compress"),
            compression != Compression::None
        );
        prop_assert_eq!(flags.iter().any(|f| f.starts_with("-O")), optimization.is_some());

        match root_path {
            Some(path) => {
                let at = flags.iter().position(|f| f == "--rootpath").unwrap();
                prop_assert_eq!(&flags[at + 1], &path);
            }
            None => prop_assert!(!flags.contains(&"--rootpath".to_string())),
        }

        if strict_imports {
            prop_assert_eq!(flags[0].as_str(), "--strict-imports");
        }
        if relative_urls {
            prop_assert_eq!(flags.last().map(String::as_str), Some("--relative-urls"));
        }
    }
}
