//! Property tests for transitive staleness over random import graphs.

use std::fs::File;
use std::time::{Duration, SystemTime};

use proptest::prelude::*;
use tempfile::TempDir;

use lessbuild::staleness::{check, Staleness};

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
}

/// Node count plus, per node, the indices it imports (may form cycles).
fn graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..=6).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(0..n, 0..=3), n)
    })
}

/// Nodes reachable from node 0, excluding node 0 itself unless re-entered.
fn reachable(edges: &[Vec<usize>]) -> Vec<bool> {
    let mut seen = vec![false; edges.len()];
    let mut stack = edges[0].clone();
    while let Some(i) = stack.pop() {
        if !seen[i] {
            seen[i] = true;
            stack.extend(edges[i].iter().copied());
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The check terminates on any graph, cycles included, and is
    /// stale exactly when some reachable import is newer than the output.
    #[test]
    fn property_staleness_matches_reachability(
        edges in graph(),
        newer in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let dir = TempDir::new().unwrap();
        let n = edges.len();

        for (i, imports) in edges.iter().enumerate() {
            let content: String = imports
                .iter()
                .map(|j| format!("@import \"n{}.less\";\n", j))
                .collect();
            let path = dir.path().join(format!("n{}.less", i));
            std::fs::write(&path, content).unwrap();
            let mtime = if i > 0 && newer[i] { at(200) } else { at(0) };
            File::options().write(true).open(&path).unwrap().set_modified(mtime).unwrap();
        }

        let dest = dir.path().join("out.css");
        std::fs::write(&dest, "").unwrap();
        File::options().write(true).open(&dest).unwrap().set_modified(at(100)).unwrap();

        let root = dir.path().join("n0.less");
        let result = check(&root, &dest, false);

        let seen = reachable(&edges);
        let expected_stale = (1..n).any(|i| seen[i] && newer[i]);

        prop_assert_eq!(result.is_stale(), expected_stale);
        if !expected_stale {
            prop_assert_eq!(result, Staleness::UpToDate);
        }
    }

    /// PROPERTY: Force always wins, whatever the timestamps.
    #[test]
    fn property_force_is_always_stale(src_secs in 0u64..1000, dst_secs in 0u64..1000) {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.less");
        let dst = dir.path().join("a.css");
        std::fs::write(&src, "").unwrap();
        std::fs::write(&dst, "").unwrap();
        File::options().write(true).open(&src).unwrap().set_modified(at(src_secs)).unwrap();
        File::options().write(true).open(&dst).unwrap().set_modified(at(dst_secs)).unwrap();

        prop_assert_eq!(check(&src, &dst, true), Staleness::Forced);
        prop_assert_eq!(check(&src, &dst, false).is_stale(), src_secs > dst_secs);
    }
}
