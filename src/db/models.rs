use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default rating for a team with no stored record.
pub const DEFAULT_RATING: f64 = 1500.0;

/// A team's current Elo-style strength rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamRating {
    /// Unique key; upserts match on this name
    pub team_name: String,
    /// Rating points (1500 is an average side)
    pub rating: f64,
}

/// A `teamrating` document as held by the store
#[derive(Debug, Clone)]
pub struct StoredRating {
    /// Store-internal id, never exposed over HTTP
    pub id: i64,
    pub team_name: String,
    pub rating: f64,
    pub updated_at: DateTime<Utc>,
}
