mod runner;
mod session;


pub(crate) use runner::{is_interactive, run_view};
