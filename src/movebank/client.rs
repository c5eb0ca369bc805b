use std::time::Duration;

use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info};
use url::Url;

use crate::config::Credentials;
use crate::error::HttpError;

use super::EntityRequest;

pub const DEFAULT_BASE_URL: &str = "https://www.movebank.org/movebank/service/direct-read";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
const USER_AGENT: &str = concat!("movetrack/", env!("CARGO_PKG_VERSION"));
const LICENSE_MARKER: &[u8] = b"License Terms:";
const LICENSE_PARAM: &str = "license-md5";

/// Read access to the direct-read service.
#[async_trait]
pub trait DirectRead {
    /// Returns the response body of a successful request.
    async fn fetch_text(&self, request: &EntityRequest) -> Result<String, HttpError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the direct-read endpoint with automatic license
/// acceptance.
#[derive(Debug, Clone)]
pub struct MovebankClient {
    http: Client,
    base_url: Url,
    credentials: Credentials,
}

impl MovebankClient {
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(settings: &ClientSettings, credentials: Credentials) -> Result<Self, HttpError> {
        let base_url =
            Url::parse(&settings.base_url).map_err(|source| HttpError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                source,
            })?;
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| HttpError::BuildClientFailed { source })?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    async fn send(
        &self,
        entity: &str,
        pairs: &[(&'static str, String)],
        cookies: Option<&str>,
    ) -> Result<Response, HttpError> {
        let mut request = self
            .http
            .get(self.base_url.clone())
            .query(pairs)
            .basic_auth(self.credentials.username(), Some(self.credentials.password()));
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies);
        }
        let response = request
            .send()
            .await
            .map_err(|source| HttpError::RequestFailed {
                entity: entity.to_owned(),
                source,
            })?;
        debug!("Request: {} -> {}", response.url(), response.status());
        Ok(response)
    }
}

#[async_trait]
impl DirectRead for MovebankClient {
    async fn fetch_text(&self, request: &EntityRequest) -> Result<String, HttpError> {
        let entity = request.to_string();
        let mut pairs = request.query_pairs();

        let response = self.send(&entity, &pairs, None).await?;
        let response = check_status(&entity, response, false).await?;
        let cookies = forwarded_cookies(response.headers());
        let body = read_body(&entity, response).await?;
        if !contains_marker(&body) {
            return Ok(String::from_utf8_lossy(&body).into_owned());
        }

        info!("License terms detected for {} - accepting automatically", entity);
        pairs.push((LICENSE_PARAM, license_digest(&body)));
        let response = self.send(&entity, &pairs, cookies.as_deref()).await?;
        let response = check_status(&entity, response, true).await?;
        let body = read_body(&entity, response).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

async fn check_status(
    entity: &str,
    response: Response,
    license_resend: bool,
) -> Result<Response, HttpError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::FORBIDDEN {
        let entity = entity.to_owned();
        return Err(if license_resend {
            HttpError::LicenseRejected { entity }
        } else {
            HttpError::PermissionDenied { entity }
        });
    }
    let body = response.text().await.unwrap_or_default();
    Err(HttpError::Status {
        entity: entity.to_owned(),
        status: status.as_u16(),
        body,
    })
}

async fn read_body(entity: &str, response: Response) -> Result<Vec<u8>, HttpError> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|source| HttpError::ReadBody {
            entity: entity.to_owned(),
            source,
        })
}

fn contains_marker(body: &[u8]) -> bool {
    body.windows(LICENSE_MARKER.len())
        .any(|window| window == LICENSE_MARKER)
}

/// Hex MD5 of the license page, which the service expects back verbatim.
#[must_use]
pub fn license_digest(body: &[u8]) -> String {
    format!("{:x}", Md5::digest(body))
}

/// Turns `Set-Cookie` headers into a single `Cookie` header value.
fn forwarded_cookies(headers: &HeaderMap) -> Option<String> {
    let pairs: Vec<&str> = headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    (!pairs.is_empty()).then(|| pairs.join("; "))
}
