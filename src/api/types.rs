//! Request and response bodies for the HTTP API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::predictor::MatchState;
use crate::ratings::UpsertStatus;

/// Live match snapshot to price
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PredictionRequest {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_score: u32,
    #[serde(default)]
    pub away_score: u32,
    /// Minutes played (0-120+)
    #[serde(default)]
    pub minute: i32,
    #[serde(default)]
    pub is_neutral: bool,
}

impl PredictionRequest {
    pub fn match_state(&self) -> MatchState {
        MatchState {
            home_score: self.home_score,
            away_score: self.away_score,
            minute: self.minute,
            is_neutral: self.is_neutral,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub team_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchLinkRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub status: UpsertStatus,
}

#[derive(Debug, Serialize)]
pub struct MatchLinkResponse {
    pub status: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub filename: Option<String>,
    /// Bytes received; the content itself is discarded
    pub size: u64,
    pub match_id: Option<String>,
}

/// Store diagnostics returned by `GET /test`
#[derive(Debug, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}
