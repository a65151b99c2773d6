use crate::utils::error::{LocatorError, Result};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("arrondissement/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Joins `path` onto `endpoint`, tolerating a trailing slash on either side.
pub fn endpoint_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Maps non-success statuses onto geocoding errors.
pub fn check_status(provider: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LocatorError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        return Err(LocatorError::GeocodingError {
            message: format!("{} returned HTTP {}", provider, status),
        });
    }
    Ok(response)
}
