//! Property tests for lessbuild.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "terminates on cycles".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/scanner.rs"]
mod scanner;

#[path = "properties/staleness.rs"]
mod staleness;

#[path = "properties/flags.rs"]
mod flags;
