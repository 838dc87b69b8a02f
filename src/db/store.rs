use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::{StoredRating, TeamRating};

/// Document store capability the rating accessor is built on.
///
/// Lookups are keyed by team name; writes address a document by the
/// store-internal id returned from a previous lookup.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Logical database name, for diagnostics.
    fn name(&self) -> &str;

    /// First `teamrating` document with this team name, if any.
    async fn find_team_rating(&self, team_name: &str) -> Result<Option<StoredRating>>;

    /// Overwrite the fields of an existing `teamrating` document.
    async fn update_team_rating(&self, id: i64, rating: &TeamRating) -> Result<()>;

    /// Insert a new `teamrating` document and return its id.
    async fn insert_team_rating(&self, rating: &TeamRating) -> Result<i64>;

    /// Insert a `matchlink` document and return its id.
    async fn insert_match_link(&self, url: &str) -> Result<i64>;

    /// Names of the collections held by the store.
    async fn list_collections(&self) -> Result<Vec<String>>;
}
