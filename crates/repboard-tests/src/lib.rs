//! Test support crate. The suites live under `tests/`.

pub mod helpers;
