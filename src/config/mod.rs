//! Configuration loading, credential resolution and application to CLI
//! arguments.
mod apply;
mod credentials;
mod loader;
mod parse;
pub mod types;


pub use apply::{apply_fetch_config, apply_view_config};
pub use credentials::{
    Credentials, PASSWORD_ENV, PLACEHOLDER_PASSWORD, PLACEHOLDER_USERNAME, USERNAME_ENV,
    resolve_credentials,
};
pub use loader::{DEFAULT_CONFIG_FILES, load_config};

#[cfg(test)]
pub(crate) use credentials::resolve_credentials_with;
#[cfg(test)]
pub(crate) use loader::load_config_file;
pub(crate) use parse::parse_duration_value;
