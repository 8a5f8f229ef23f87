//! Session-scoped client for the VFL feed
//!
//! Construction performs the two discovery calls (API key, season metadata)
//! over a shared `reqwest::Client`; `get_full` then lists the matchday's
//! fixtures and fetches the featured market's odds for each one, strictly in
//! order. Session state is set once at construction and never refreshed.

use std::time::Duration;

use chrono::{Local, TimeZone};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::FeedError;
use crate::feed::export::{Export, OddsTable, OutputFormat};
use crate::retry::RetryPolicy;
use crate::trace::{Trace, TraceLevel};
use crate::types::{EventsResponse, FixtureRecord, MarketsResponse, Timeline};
use crate::{
    EVENTS_BOOKMAKER_ID, MARKET_KEY, MENU_BASE, MENU_GAMES_PATH, REQUEST_TIMEOUT_SECS, RGS_BASE,
    TIMELINE_PATH,
};

/// Client for the virtual-football fixture and odds feed
#[derive(Debug)]
pub struct OddsClient {
    http: Client,
    rgs_base: String,
    menu_base: String,
    retry: RetryPolicy,
    trace: Trace,
    api_key: String,
    season_id: String,
    match_day: String,
}

impl OddsClient {
    /// Connect to the live feed hosts and run both discovery steps
    pub async fn connect(level: TraceLevel) -> Result<Self, FeedError> {
        Self::connect_to(RGS_BASE, MENU_BASE, level, RetryPolicy::default()).await
    }

    /// Connect against custom hosts (tests point both at a mock server).
    /// Any failure is traced at ERROR level and wrapped in
    /// [`FeedError::Initialization`] with the cause preserved.
    pub async fn connect_to(
        rgs_base: &str,
        menu_base: &str,
        level: TraceLevel,
        retry: RetryPolicy,
    ) -> Result<Self, FeedError> {
        let trace = Trace::new(level);
        match Self::bootstrap(rgs_base, menu_base, trace, retry).await {
            Ok(client) => Ok(client),
            Err(err) => {
                let err = FeedError::during_init(err);
                trace.error(&err.to_string());
                Err(err)
            }
        }
    }

    async fn bootstrap(
        rgs_base: &str,
        menu_base: &str,
        trace: Trace,
        retry: RetryPolicy,
    ) -> Result<Self, FeedError> {
        for base in [rgs_base, menu_base] {
            Url::parse(base)
                .map_err(|e| FeedError::BaseUrl { url: base.to_string(), source: e })?;
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(FeedError::Client)?;

        let mut client = Self {
            http,
            rgs_base: rgs_base.trim_end_matches('/').to_string(),
            menu_base: menu_base.trim_end_matches('/').to_string(),
            retry,
            trace,
            api_key: String::new(),
            season_id: String::new(),
            match_day: String::new(),
        };
        trace.success("Session initialized");

        client.api_key = client.discover_api_key().await?;
        trace.success("Parsed API key");
        trace.info(&format!("Current API key: {}", client.api_key));

        let (season_id, match_day) = client.discover_season_meta().await?;
        client.season_id = season_id;
        client.match_day = match_day;
        trace.success("Season metadata parsed successfully");
        trace.info(&format!("Current season ID: {}", client.season_id));
        trace.info(&format!("Current matchday: {}", client.match_day));

        Ok(client)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn season_id(&self) -> &str {
        &self.season_id
    }

    pub fn match_day(&self) -> &str {
        &self.match_day
    }

    /// GET with bounded retry on transport failures only. An HTTP error
    /// status is returned as a response; the body parse reports it.
    async fn get_with_retry(&self, url: &str) -> Result<Response, FeedError> {
        let mut attempt = 1u32;
        loop {
            debug!("GET {} (attempt {})", url, attempt);
            match self.http.get(url).send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(FeedError::Transport {
                            url: url.to_string(),
                            attempts: attempt,
                            source: err,
                        });
                    }
                    self.trace.warning("Request failed. Retrying");
                    warn!("GET {} failed on attempt {}: {}", url, attempt, err);
                    let backoff = self.retry.backoff_ms(attempt);
                    if backoff > 0 {
                        tokio::time::sleep(Duration::from_millis(backoff)).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let response = self.get_with_retry(url).await?;
        response
            .text()
            .await
            .map_err(|e| FeedError::parse(url, format!("failed to read body: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FeedError> {
        let response = self.get_with_retry(url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| FeedError::parse(url, format!("failed to decode JSON: {e}")))
    }

    /// Scrape the session API key from the bookmaker menu page
    async fn discover_api_key(&self) -> Result<String, FeedError> {
        self.trace.info("Requesting API key");
        let url = format!("{}{}", self.menu_base, MENU_GAMES_PATH);
        let body = self.get_text(&url).await?;
        extract_api_key(&body)
            .map(str::to_string)
            .ok_or_else(|| FeedError::parse(&url, "`key=` marker not found"))
    }

    /// Current season ID and matchday from the timeline endpoint
    async fn discover_season_meta(&self) -> Result<(String, String), FeedError> {
        self.trace.info("Requesting season metadata");
        let url = format!("{}{}", self.rgs_base, TIMELINE_PATH);
        let timeline: Timeline = self.get_json(&url).await?;
        let season_id = timeline
            .season_id()
            .ok_or_else(|| FeedError::parse(&url, "season_name has no season token"))?
            .to_string();
        Ok((season_id, timeline.matchday))
    }

    fn events_url(&self) -> String {
        format!(
            "{}/bgw-services-af-rest/rest/bookmakers/{}/events?ptype=vfl&key={}&tag=vfl-{}-{}&lang=en",
            self.rgs_base, EVENTS_BOOKMAKER_ID, self.api_key, self.season_id, self.match_day
        )
    }

    fn market_url(&self, bookmaker_id: &str, uniform_id: &str) -> String {
        format!(
            "{}/bgw-services-af-rest/rest/bookmakers/{}/markets?key={}&ptype=vfl&event={}&lang=en",
            self.rgs_base, bookmaker_id, MARKET_KEY, uniform_id
        )
    }

    /// List this matchday's fixtures in provider order, each projected to a
    /// record with its market URL and competitor label
    pub async fn list_fixtures(&self) -> Result<Vec<FixtureRecord>, FeedError> {
        self.trace.info("Getting team list");
        let url = self.events_url();
        let resp: EventsResponse = self.get_json(&url).await?;
        let page = resp.data.first().ok_or_else(|| FeedError::parse(&url, "empty data array"))?;

        Ok(page
            .events
            .iter()
            .map(|ev| {
                FixtureRecord::new(
                    self.market_url(&ev.bookmaker_id, &ev.uniform_id),
                    ev.competitors_label(),
                )
            })
            .collect())
    }

    /// Fetch each record's market endpoint and merge in the featured
    /// market's kickoff time and selection odds. When several groups
    /// qualify, later groups overwrite overlapping keys (last write wins);
    /// non-overlapping keys from every group are kept.
    pub async fn fetch_odds(&self, records: &mut [FixtureRecord]) -> Result<(), FeedError> {
        self.trace.info("Requesting market data for each competitors");
        for record in records.iter_mut() {
            self.trace.info(&format!("Requesting data for {}", record.competitors));
            let resp: MarketsResponse = self.get_json(&record.url).await?;
            let page =
                resp.data.first().ok_or_else(|| FeedError::parse(&record.url, "empty data array"))?;

            for group in page.markets.iter().filter(|g| g.is_featured()) {
                if let Some(time) = format_kickoff(group.timestamp) {
                    record.time = Some(time);
                }
                // is_featured guarantees a first entry
                if let Some(entry) = group.market.first() {
                    for selection in &entry.selections {
                        record.odds.insert(selection.description.clone(), selection.odds);
                    }
                }
            }
            self.trace.success(&format!("Data for {} requested successfully", record.competitors));
        }
        Ok(())
    }

    /// Run the full listing + odds pass and shape the result.
    /// `format` must be `"csv"` or `"json"`; failures are traced at ERROR
    /// level before propagating with their kind intact.
    pub async fn get_full(&self, format: &str) -> Result<Export, FeedError> {
        match self.collect(format).await {
            Ok(export) => Ok(export),
            Err(err) => {
                self.trace.error(&err.to_string());
                Err(err)
            }
        }
    }

    async fn collect(&self, format: &str) -> Result<Export, FeedError> {
        let format = OutputFormat::from_str(format)
            .ok_or_else(|| FeedError::InvalidFormat(format.to_string()))?;

        let mut records = self.list_fixtures().await?;
        self.trace.success("team list parsed successfully");
        self.fetch_odds(&mut records).await?;
        self.trace
            .success(&format!("Parsing success. Returning result in {} format", format.as_str()));

        Ok(match format {
            OutputFormat::Csv => Export::Table(OddsTable::from_records(&records)),
            OutputFormat::Json => Export::Records(records),
        })
    }
}

/// Substring strictly between the first `key=` and the next `&` after it.
/// Either marker missing is None; the caller fails explicitly instead of
/// slicing garbage.
fn extract_api_key(body: &str) -> Option<&str> {
    let start = body.find("key=")? + 4;
    let rest = &body[start..];
    let end = rest.find('&')?;
    Some(&rest[..end])
}

/// Kickoff epoch seconds as a local `YYYY-MM-DD HH:MM:SS` string
fn format_kickoff(epoch_secs: i64) -> Option<String> {
    Local
        .timestamp_opt(epoch_secs, 0)
        .earliest()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_api_key() {
        let body = "...getGames?x=1&key=ABC123&lang=en";
        assert_eq!(extract_api_key(body), Some("ABC123"));
    }

    #[test]
    fn test_extract_api_key_takes_first_marker() {
        let body = "key=FIRST&other=1&key=SECOND&";
        assert_eq!(extract_api_key(body), Some("FIRST"));
    }

    #[test]
    fn test_extract_api_key_missing_marker() {
        assert_eq!(extract_api_key("no marker here"), None);
    }

    #[test]
    fn test_extract_api_key_missing_terminator() {
        assert_eq!(extract_api_key("prefix key=ABC123"), None);
    }

    #[test]
    fn test_format_kickoff() {
        let epoch = 1704067200;
        let expected =
            Local.timestamp_opt(epoch, 0).unwrap().format("%Y-%m-%d %H:%M:%S").to_string();
        assert_eq!(format_kickoff(epoch), Some(expected));
        assert_eq!(format_kickoff(epoch).unwrap().len(), 19);
    }
}
