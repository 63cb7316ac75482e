//! Workspace root package.
//!
//! Exists so `rusty-hook` can install the pre-commit hooks declared in the
//! root manifest. All code lives in the member crates under `crates/`.
