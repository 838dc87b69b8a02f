//! Rating accessor: team ratings by name, backed by an optional document store.
//!
//! Every operation checks for a configured store first and fails with
//! [`AppError::StoreUnavailable`] when there is none. A team without a stored
//! document is not an error; it rates [`DEFAULT_RATING`].

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::models::{TeamRating, DEFAULT_RATING};
use crate::db::DocumentStore;
use crate::error::AppError;

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertStatus {
    Created,
    Updated,
}

#[derive(Clone)]
pub struct RatingAccessor {
    store: Option<Arc<dyn DocumentStore>>,
}

impl RatingAccessor {
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Result<&Arc<dyn DocumentStore>, AppError> {
        self.store.as_ref().ok_or(AppError::StoreUnavailable)
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Stored rating for `team_name`, or [`DEFAULT_RATING`] if none exists.
    pub async fn get(&self, team_name: &str) -> Result<f64, AppError> {
        let store = self.store()?;
        match store.find_team_rating(team_name).await? {
            Some(doc) => Ok(doc.rating),
            None => {
                debug!("No rating stored for {}, using default", team_name);
                Ok(DEFAULT_RATING)
            }
        }
    }

    /// Replace the rating of an existing team in place, or insert a new one.
    ///
    /// Find-then-write, not atomic: two concurrent upserts for the same new
    /// team can both insert.
    pub async fn upsert(&self, rating: &TeamRating) -> Result<UpsertStatus, AppError> {
        let store = self.store()?;
        match store.find_team_rating(&rating.team_name).await? {
            Some(existing) => {
                store.update_team_rating(existing.id, rating).await?;
                info!(
                    "Rating updated: {} {:.1} -> {:.1} (previous set {})",
                    existing.team_name, existing.rating, rating.rating, existing.updated_at
                );
                Ok(UpsertStatus::Updated)
            }
            None => {
                store.insert_team_rating(rating).await?;
                info!("Rating created: {} {:.1}", rating.team_name, rating.rating);
                Ok(UpsertStatus::Created)
            }
        }
    }

    /// Ratings for both sides of a fixture.
    ///
    /// Without a configured store both sides rate [`DEFAULT_RATING`];
    /// failures of a configured store still propagate.
    pub async fn ratings_for(&self, home_team: &str, away_team: &str) -> Result<(f64, f64), AppError> {
        if !self.is_configured() {
            debug!("No store configured, rating {} vs {} at default", home_team, away_team);
            return Ok((DEFAULT_RATING, DEFAULT_RATING));
        }
        let home = self.get(home_team).await?;
        let away = self.get(away_team).await?;
        Ok((home, away))
    }

    /// Persist a match link. Callers treat failure as non-fatal.
    pub async fn record_match_link(&self, url: &str) -> Result<(), AppError> {
        let store = self.store()?;
        store.insert_match_link(url).await?;
        Ok(())
    }
}
