//! Betradar Virtual Football League (VFL) feed adapter
//!
//! Components:
//! - `feed`: session-scoped [`feed::OddsClient`] plus CSV/JSON export shaping
//! - `types`: serde mirror of the provider payloads and the flattened
//!   [`types::FixtureRecord`]
//! - `retry`: bounded exponential backoff for transport failures
//! - `trace`: leveled progress output (`[*] INFO:` style prefixes)
//! - `error`: [`error::FeedError`] taxonomy
//!
//! The feed is assembled from four dependent GET calls: discover an API key
//! from the bookmaker menu page, discover the current season/matchday from
//! the timeline endpoint, list the fixtures for that matchday, then fetch
//! the featured market's odds for each fixture in order. Everything is
//! sequential over one shared HTTP session.

pub mod error;
pub mod feed;
pub mod retry;
pub mod trace;
pub mod types;

pub use error::FeedError;
pub use feed::{Export, OddsClient, OddsTable, OutputFormat};
pub use retry::RetryPolicy;
pub use trace::{Trace, TraceLevel};
pub use types::FixtureRecord;

/// RGS host serving the timeline, events and market endpoints
pub const RGS_BASE: &str = "https://rgs.betradar.com";

/// Bookmaker menu host; its games page embeds the session API key
pub const MENU_BASE: &str = "https://virtual.bet9ja.com";

/// Path of the menu page the API key is scraped from
pub const MENU_GAMES_PATH: &str = "/betradardesktopmenu/IntegrationBetradar/getGames";

/// Path + query of the season timeline endpoint
pub const TIMELINE_PATH: &str = "/vflkcgaming/timeline.php?lang=en&screen=vleague";

/// Bookmaker ID used for the fixture listing endpoint
pub const EVENTS_BOOKMAKER_ID: u32 = 27;

/// Static key baked into every per-fixture market URL
pub const MARKET_KEY: &str = "pK9saJZcyZRVRgZ9";

/// Per-request timeout for every feed call
pub const REQUEST_TIMEOUT_SECS: u64 = 5;
