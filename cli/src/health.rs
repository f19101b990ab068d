//! API connectivity indicator

use std::fmt;
use std::time::Duration;

use colored::Colorize;

/// Result of probing the health-check endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiStatus::Connected => write!(f, "{} {}", "●".green(), "Connected".green().bold()),
            ApiStatus::Disconnected => write!(f, "{} {}", "●".red(), "Disconnected".red().bold()),
        }
    }
}

/// Issue a GET against `url`.
///
/// Any HTTP response whose body can be read counts as connected, whatever
/// its status. Transport errors, body read failures and timeouts count as
/// disconnected.
pub async fn check_api(url: &str, timeout: Duration) -> ApiStatus {
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            log::warn!("Failed to build HTTP client: {}", e);
            return ApiStatus::Disconnected;
        }
    };

    match client.get(url).send().await {
        Ok(response) => {
            log::debug!("{} answered {}", url, response.status());
            match response.bytes().await {
                Ok(_) => ApiStatus::Connected,
                Err(e) => {
                    log::debug!("{} body unreadable: {}", url, e);
                    ApiStatus::Disconnected
                }
            }
        }
        Err(e) => {
            log::debug!("{} unreachable: {}", url, e);
            ApiStatus::Disconnected
        }
    }
}
