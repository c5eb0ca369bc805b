use std::fmt;

use tracing::debug;

use crate::error::ConfigError;

use super::types::ConfigFile;

pub const USERNAME_ENV: &str = "mbus";
pub const PASSWORD_ENV: &str = "mbpw";
pub const PLACEHOLDER_USERNAME: &str = "your_username";
pub const PLACEHOLDER_PASSWORD: &str = "your_password";

/// Movebank account used for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Resolves credentials from the command line, then the `mbus`/`mbpw`
/// environment variables, then the config file's `[credentials]` section.
/// Each field is resolved on its own, so the layers may be mixed.
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredentials`] when either field is absent
/// everywhere, and [`ConfigError::PlaceholderCredentials`] when the template
/// values were never replaced.
pub fn resolve_credentials(
    cli_username: Option<&str>,
    cli_password: Option<&str>,
    config: Option<&ConfigFile>,
) -> Result<Credentials, ConfigError> {
    resolve_credentials_with(cli_username, cli_password, config, |name| {
        std::env::var(name).ok()
    })
}

pub(crate) fn resolve_credentials_with<F>(
    cli_username: Option<&str>,
    cli_password: Option<&str>,
    config: Option<&ConfigFile>,
    env: F,
) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let section = config.and_then(|config| config.credentials.as_ref());
    let pick = |cli: Option<&str>, env_name: &str, from_config: Option<&String>| {
        if let Some(value) = non_empty(cli.map(str::to_owned)) {
            debug!("Using {} from the command line", env_name);
            return Some(value);
        }
        if let Some(value) = non_empty(env(env_name)) {
            debug!("Using {} from the environment", env_name);
            return Some(value);
        }
        non_empty(from_config.cloned())
    };

    let username = pick(
        cli_username,
        USERNAME_ENV,
        section.and_then(|section| section.username.as_ref()),
    );
    let password = pick(
        cli_password,
        PASSWORD_ENV,
        section.and_then(|section| section.password.as_ref()),
    );
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ConfigError::MissingCredentials);
    };
    if username == PLACEHOLDER_USERNAME || password == PLACEHOLDER_PASSWORD {
        return Err(ConfigError::PlaceholderCredentials);
    }
    Ok(Credentials::new(username, password))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
