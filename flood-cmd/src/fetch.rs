//! `fetch`: download a feed and store it for the other commands.

use anyhow::Result;
use clap::ValueEnum;
use flood_core::feed::fetch_feed;
use flood_core::rainfall::HistoricalRainfallRecord;
use flood_core::region::RegionObservation;
use log::info;
use std::time::Duration;

/// Which feed a downloaded body holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedKind {
    #[default]
    Reservoirs,
    Rainfall,
}

/// Number of rows in a feed body; fails when the body is not a feed of
/// the given kind.
pub fn count_rows(kind: FeedKind, body: &str) -> Result<usize> {
    let rows = match kind {
        FeedKind::Reservoirs => RegionObservation::parse_feed_csv(body)?.len(),
        FeedKind::Rainfall => HistoricalRainfallRecord::parse_feed_csv(body)?.len(),
    };
    Ok(rows)
}

pub async fn run_fetch(url: &str, output: &str, kind: FeedKind) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    let body = match fetch_feed(&client, url).await {
        Some(body) => body,
        None => anyhow::bail!("Feed unavailable after retries: {}", url),
    };
    let rows = count_rows(kind, &body)?;
    if rows == 0 {
        anyhow::bail!("Feed at {} has no usable {:?} rows", url, kind);
    }

    std::fs::write(output, &body)?;
    info!("Fetched {} {:?} rows from {} into {}", rows, kind, url, output);
    Ok(())
}
