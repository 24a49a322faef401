use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::post::models::FeedItem;
use crate::post::models::FeedQuery;
use crate::user::models::Identity;

pub async fn feed(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Query(params): Query<FeedParams>,
) -> Result<ApiSuccess<Vec<FeedItemData>>, ApiError> {
    let query = FeedQuery {
        limit: params.limit.unwrap_or(FeedQuery::DEFAULT_LIMIT),
        offset: params.offset.unwrap_or(0),
    };

    state
        .post_service
        .feed(&actor, query)
        .await
        .map_err(ApiError::from)
        .map(|items| {
            ApiSuccess::new(StatusCode::OK, items.iter().map(FeedItemData::from).collect())
        })
}

/// Query-string pagination window; out-of-range values are clamped, not
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItemData {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub author_username: String,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

impl From<&FeedItem> for FeedItemData {
    fn from(item: &FeedItem) -> Self {
        Self {
            id: item.id.0,
            title: item.title.clone(),
            content: item.content.clone(),
            owner_id: item.owner_id.as_i64(),
            author_username: item.author_username.clone(),
            tags: item.tags.clone(),
            version: item.version,
            created_at: item.created_at,
            comment_count: item.comment_count,
        }
    }
}
