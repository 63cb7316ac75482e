//! SkinHealth CLI library.
//!
//! Rendering helpers and the backend client used by the `skinhealth-cli`
//! binary.

pub mod backend;
pub mod output;
pub mod terminal;
