// One module per top-level subcommand; main.rs only parses and dispatches.

pub mod chat;
pub mod distance;
pub mod model;
pub mod nearby;
