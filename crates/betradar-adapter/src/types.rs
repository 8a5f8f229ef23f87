//! Wire types for the Betradar VFL feed and the flattened fixture record
//!
//! # Design notes
//! 1. The feed is loose about scalar types: `matchday`, `bookmakerId` and
//!    `uniformId` arrive as strings or numbers depending on the deployment,
//!    and `odds` arrive as decimal strings. Tolerant deserializers normalize
//!    them so callers never branch on JSON types.
//! 2. Collections default to empty instead of failing the whole payload.
//! 3. The per-fixture field set varies by market, so [`FixtureRecord`] keeps
//!    a fixed shape with a nested `selection -> odds` map that flattens back
//!    into the record on serialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Deserialize a field that may be a JSON string or number into a String
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Visitor};

    struct StringOrNumberVisitor;

    impl<'de> Visitor<'de> for StringOrNumberVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: Error>(self, s: &str) -> Result<Self::Value, E> {
            Ok(s.to_string())
        }

        fn visit_string<E: Error>(self, s: String) -> Result<Self::Value, E> {
            Ok(s)
        }

        fn visit_u64<E: Error>(self, n: u64) -> Result<Self::Value, E> {
            Ok(n.to_string())
        }

        fn visit_i64<E: Error>(self, n: i64) -> Result<Self::Value, E> {
            Ok(n.to_string())
        }

        fn visit_f64<E: Error>(self, n: f64) -> Result<Self::Value, E> {
            Ok(n.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

/// Deserialize odds that may be a JSON number or a decimal string
fn odds_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Visitor};

    struct OddsVisitor;

    impl<'de> Visitor<'de> for OddsVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an odds value as a number or decimal string")
        }

        fn visit_f64<E: Error>(self, n: f64) -> Result<Self::Value, E> {
            Ok(n)
        }

        fn visit_u64<E: Error>(self, n: u64) -> Result<Self::Value, E> {
            Ok(n as f64)
        }

        fn visit_i64<E: Error>(self, n: i64) -> Result<Self::Value, E> {
            Ok(n as f64)
        }

        fn visit_str<E: Error>(self, s: &str) -> Result<Self::Value, E> {
            s.trim().parse().map_err(|e| E::custom(format!("invalid odds '{}': {}", s, e)))
        }
    }

    deserializer.deserialize_any(OddsVisitor)
}

// ============================================================================
// Timeline endpoint
// ============================================================================

/// Season timeline payload from `timeline.php`
#[derive(Clone, Debug, Deserialize)]
pub struct Timeline {
    /// Display name, e.g. "VFL Season 42"; the trailing token is the ID
    pub season_name: String,
    /// Round number within the season
    #[serde(deserialize_with = "string_or_number")]
    pub matchday: String,
}

impl Timeline {
    /// Season identifier: the last whitespace-separated token of the name
    pub fn season_id(&self) -> Option<&str> {
        self.season_name.split_whitespace().last()
    }
}

// ============================================================================
// Events endpoint (fixture listing)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub data: Vec<EventsPage>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub events: Vec<FixtureEvent>,
}

/// One scheduled fixture as listed by the events endpoint
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub bookmaker_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub uniform_id: String,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
}

impl FixtureEvent {
    /// Team names joined with `" - "`, e.g. `"TeamA - TeamB"`
    pub fn competitors_label(&self) -> String {
        self.competitors.iter().map(|c| c.team_name.as_str()).collect::<Vec<_>>().join(" - ")
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub team_name: String,
}

// ============================================================================
// Markets endpoint (per-fixture odds)
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct MarketsResponse {
    #[serde(default)]
    pub data: Vec<MarketsPage>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MarketsPage {
    #[serde(default)]
    pub markets: Vec<MarketGroup>,
}

/// One market group; `timestamp` is the fixture kickoff in epoch seconds
#[derive(Clone, Debug, Deserialize)]
pub struct MarketGroup {
    pub timestamp: i64,
    #[serde(default)]
    pub market: Vec<MarketEntry>,
}

impl MarketGroup {
    /// The featured market is the group whose first entry has sortIndex 1
    pub fn is_featured(&self) -> bool {
        self.market.first().map(|m| m.sort_index) == Some(1)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketEntry {
    pub sort_index: i64,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// One outcome within a market, e.g. "Home" at 2.35
#[derive(Clone, Debug, Deserialize)]
pub struct Selection {
    pub description: String,
    #[serde(deserialize_with = "odds_value")]
    pub odds: f64,
}

// ============================================================================
// Flattened output record
// ============================================================================

/// One fixture with its featured-market odds merged in
///
/// `url` and `competitors` are set at listing time; `time` and the odds map
/// are filled by the odds pass. A fixture whose market response had no
/// featured group keeps `time = None` and an empty map. Serializes as a flat
/// object: `time` omitted when absent, odds keys hoisted to the top level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FixtureRecord {
    pub url: String,
    pub competitors: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(flatten)]
    pub odds: BTreeMap<String, f64>,
}

impl FixtureRecord {
    pub fn new(url: impl Into<String>, competitors: impl Into<String>) -> Self {
        Self { url: url.into(), competitors: competitors.into(), time: None, odds: BTreeMap::new() }
    }
}
