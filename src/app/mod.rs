mod fetch;
mod viewer;

pub(crate) use fetch::run_fetch;
pub(crate) use viewer::{is_interactive, run_view};
