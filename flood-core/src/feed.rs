//! Download of the tabular feeds over HTTP.

use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Attempts made before giving up on a feed.
pub const MAX_TRIES: u32 = 3;

/// Delay before the first retry; doubled after each failed attempt.
pub const INITIAL_BACKOFF_MILLIS: u64 = 1000;

/// Fetch a feed body, retrying with exponential backoff.
///
/// Returns `None` when every attempt fails or the body is empty; callers
/// fall back to their cached or embedded data in that case.
pub async fn fetch_feed(client: &Client, url: &str) -> Option<String> {
    let mut sleep_millis = INITIAL_BACKOFF_MILLIS;

    for attempt in 1..=MAX_TRIES {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status() != StatusCode::OK {
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt,
                        MAX_TRIES,
                        url,
                        response.status()
                    );
                } else {
                    match response.text().await {
                        Ok(body) if body.trim().is_empty() => {
                            warn!("Attempt {}/{}: Empty response for {}", attempt, MAX_TRIES, url);
                        }
                        Ok(body) => return Some(body),
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Failed to read response body for {}: {}",
                                attempt, MAX_TRIES, url, e
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Attempt {}/{}: Request failed for {}: {}", attempt, MAX_TRIES, url, e);
            }
        }

        if attempt < MAX_TRIES {
            info!("Sleeping for {} milliseconds before retry for {}", sleep_millis, url);
            tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
            sleep_millis *= 2;
        }
    }

    warn!("All attempts failed for {}", url);
    None
}
