//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Command, DEFAULT_DATA_DIR, FetchArgs, ViewArgs};
pub use types::BaseMap;
