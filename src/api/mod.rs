use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use schemars::schema_for;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

pub mod types;

use crate::db::models::TeamRating;
use crate::error::AppError;
use crate::predictor::{predict_outcome, PredictionResult};
use crate::ratings::RatingAccessor;
use types::*;

/// Collections listed by `GET /test`.
const MAX_LISTED_COLLECTIONS: usize = 10;
/// Store error text shown by `GET /test` is cut to this many chars.
const DIAGNOSTIC_ERROR_CHARS: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub ratings: RatingAccessor,
    /// Whether DATABASE_URL / DATABASE_NAME were provided
    pub database_url_set: bool,
    pub database_name_set: bool,
    pub max_upload_bytes: usize,
}

/// Build the Axum router for the API.
pub fn router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);
    Router::new()
        .route("/", get(root_handler))
        .route("/test", get(diagnostics_handler))
        .route(
            "/api/teams/rating",
            get(get_rating_handler).post(upsert_rating_handler),
        )
        .route("/api/predict", post(predict_handler))
        .route("/api/match-link", post(match_link_handler))
        .route(
            "/api/upload-video",
            post(upload_video_handler).layer(upload_limit),
        )
        .route("/schema", get(schema_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /
async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Soccer Predictor API",
    })
}

/// GET /test
async fn diagnostics_handler(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let set_flag = |set: bool| (if set { "✅ Set" } else { "❌ Not Set" }).to_string();
    let mut resp = DiagnosticsResponse {
        backend: "✅ Running".into(),
        database: "❌ Not Available".into(),
        database_url: set_flag(state.database_url_set),
        database_name: set_flag(state.database_name_set),
        connection_status: "Not Connected".into(),
        collections: Vec::new(),
    };

    match state.ratings.store() {
        Ok(store) => {
            resp.connection_status = "Connected".into();
            match store.list_collections().await {
                Ok(names) => {
                    resp.collections = names.into_iter().take(MAX_LISTED_COLLECTIONS).collect();
                    resp.database = "✅ Connected & Working".into();
                }
                Err(e) => {
                    let msg: String = e.to_string().chars().take(DIAGNOSTIC_ERROR_CHARS).collect();
                    resp.database = format!("⚠️  Connected but Error: {}", msg);
                }
            }
        }
        Err(_) => resp.database = "⚠️  Available but not initialized".into(),
    }
    Json(resp)
}

/// POST /api/teams/rating
async fn upsert_rating_handler(
    State(state): State<Arc<AppState>>,
    team: Result<Json<TeamRating>, JsonRejection>,
) -> Result<Json<UpsertResponse>, AppError> {
    let Json(team) = team?;
    let status = state.ratings.upsert(&team).await?;
    Ok(Json(UpsertResponse { status }))
}

/// GET /api/teams/rating?team_name=
async fn get_rating_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RatingQuery>, QueryRejection>,
) -> Result<Json<TeamRating>, AppError> {
    let Query(query) = query?;
    let rating = state.ratings.get(&query.team_name).await?;
    Ok(Json(TeamRating {
        team_name: query.team_name,
        rating,
    }))
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    req: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, AppError> {
    let Json(req) = req?;
    let (r_home, r_away) = state.ratings.ratings_for(&req.home_team, &req.away_team).await?;
    let result = predict_outcome(r_home, r_away, &req.match_state())?;
    debug!(
        "{} ({:.0}) vs {} ({:.0}) {}-{} @{}': H {:.4} D {:.4} A {:.4}",
        req.home_team,
        r_home,
        req.away_team,
        r_away,
        req.home_score,
        req.away_score,
        req.minute,
        result.p_home,
        result.p_draw,
        result.p_away
    );
    Ok(Json(result))
}

/// POST /api/match-link
///
/// The link is informational: a failed write is logged and the request
/// still succeeds.
async fn match_link_handler(
    State(state): State<Arc<AppState>>,
    link: Result<Json<MatchLinkRequest>, JsonRejection>,
) -> Result<Json<MatchLinkResponse>, AppError> {
    let Json(link) = link?;
    if let Err(e) = state.ratings.record_match_link(&link.url).await {
        warn!("Match link not stored ({}): {}", link.url, e);
    }
    Ok(Json(MatchLinkResponse {
        status: "received",
        url: link.url,
    }))
}

/// POST /api/upload-video (multipart: `file`, optional `match_id`)
async fn upload_video_handler(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;
    let mut upload: Option<(Option<String>, u64)> = None;
    let mut match_id = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let mut size = 0u64;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len() as u64;
                }
                upload = Some((filename, size));
            }
            Some("match_id") => match_id = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, size) = upload.ok_or(AppError::MissingField("file"))?;
    info!(
        "Video received: {} ({} bytes, match {})",
        filename.as_deref().unwrap_or("<unnamed>"),
        size,
        match_id.as_deref().unwrap_or("-")
    );
    Ok(Json(UploadResponse {
        status: "stored-temp",
        filename,
        size,
        match_id,
    }))
}

/// GET /schema
async fn schema_handler() -> Json<Value> {
    Json(json!({
        "TeamRating": schema_for!(TeamRating),
        "PredictionRequest": schema_for!(PredictionRequest),
        "PredictionResult": schema_for!(PredictionResult),
    }))
}
