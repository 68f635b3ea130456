/// Per-user views over the record store
///
/// All views are read-only. Profile updates and feedback are validated and
/// echoed back but not persisted.
///
/// # Endpoints (bearer token required)
///
/// - `GET  /api/user/stats`
/// - `GET  /api/user/favorites`
/// - `GET  /api/user/usage-history`
/// - `PUT  /api/user/profile`
/// - `GET  /api/user/timeline`
/// - `POST /api/user/feedback`
/// - `GET  /api/user/recommendations`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::parse_body,
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use toolbox_shared::{
    auth::middleware::Principal,
    models::{favorite::Favorite, feedback::Feedback, tool_usage::ToolUsage},
    tools,
};
use uuid::Uuid;

/// Timeline entries returned at most
pub const TIMELINE_LIMIT: usize = 20;

/// Recommendations returned at most
pub const RECOMMENDATION_LIMIT: usize = 3;

// --- Stats ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MostUsedTool {
    pub name: String,
    pub count: u64,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_usage: u64,
    pub tools_used: usize,
    pub favorites_count: usize,
    pub most_used_tool: Option<MostUsedTool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub tool_name: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub stats: StatsSummary,
    pub tool_usage: Vec<ToolUsage>,
    pub favorites: Vec<FavoriteEntry>,
}

/// Builds the stats view from usage sorted most-used first
pub fn build_stats(usage: Vec<ToolUsage>, favorites: Vec<Favorite>) -> StatsResponse {
    let most_used_tool = usage.first().map(|top| MostUsedTool {
        name: top.tool_name.clone(),
        count: top.usage_count,
        last_used: top.last_used,
    });

    StatsResponse {
        stats: StatsSummary {
            total_usage: usage.iter().map(|record| record.usage_count).sum(),
            tools_used: usage.len(),
            favorites_count: favorites.len(),
            most_used_tool,
        },
        tool_usage: usage,
        favorites: favorites
            .into_iter()
            .map(|fav| FavoriteEntry {
                tool_name: fav.tool_name,
                added_at: fav.created_at,
            })
            .collect(),
    }
}

/// Usage totals, most used tool and favorites
pub async fn stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<StatsResponse> {
    let usage = ToolUsage::list_by_user(&state.store, principal.user_id).await;
    let favorites = Favorite::list_by_user(&state.store, principal.user_id).await;

    Json(build_stats(usage, favorites))
}

// --- Favorites ---

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Favorite>,
}

/// The caller's favorites, newest first
pub async fn favorites(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<FavoritesResponse> {
    Json(FavoritesResponse {
        favorites: Favorite::list_by_user(&state.store, principal.user_id).await,
    })
}

// --- Usage history ---

/// Usage frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    High,
    Medium,
    Low,
}

impl Frequency {
    /// `high` from 10 uses, `medium` from 5
    pub fn from_count(count: u64) -> Self {
        match count {
            10.. => Frequency::High,
            5..=9 => Frequency::Medium,
            _ => Frequency::Low,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub tool_name: String,
    pub usage_count: u64,
    pub last_used: DateTime<Utc>,
    pub frequency: Frequency,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total_tools: usize,
    pub total_usage: u64,
    pub high_frequency_tools: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
    pub summary: HistorySummary,
}

pub fn build_history(usage: Vec<ToolUsage>) -> HistoryResponse {
    let history: Vec<HistoryEntry> = usage
        .into_iter()
        .map(|record| HistoryEntry {
            frequency: Frequency::from_count(record.usage_count),
            tool_name: record.tool_name,
            usage_count: record.usage_count,
            last_used: record.last_used,
        })
        .collect();

    let summary = HistorySummary {
        total_tools: history.len(),
        total_usage: history.iter().map(|entry| entry.usage_count).sum(),
        high_frequency_tools: history
            .iter()
            .filter(|entry| entry.frequency == Frequency::High)
            .count(),
    };

    HistoryResponse { history, summary }
}

/// Per-tool usage with frequency bands
pub async fn usage_history(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<HistoryResponse> {
    let usage = ToolUsage::list_by_user(&state.store, principal.user_id).await;
    Json(build_history(usage))
}

// --- Profile ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: Uuid,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: ProfileUser,
}

/// Echoes a profile update
///
/// Nothing is written; the stored user is unchanged.
pub async fn update_profile(
    Extension(principal): Extension<Principal>,
    Json(body): Json<JsonValue>,
) -> ApiResult<Json<ProfileResponse>> {
    let req: ProfileRequest = parse_body(body)?;

    Ok(Json(ProfileResponse {
        message: "Profile updated".to_string(),
        user: ProfileUser {
            id: principal.user_id,
            username: req.username,
            avatar_url: req.avatar_url,
        },
    }))
}

// --- Timeline ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    ToolUsage,
    Favorite,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub action: &'static str,
    pub tool_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub icon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub timeline: Vec<TimelineEntry>,
    pub total: usize,
}

/// Merges usage and favorites, newest first, capped at [`TIMELINE_LIMIT`]
///
/// `total` counts every event before the cap.
pub fn build_timeline(usage: Vec<ToolUsage>, favorites: Vec<Favorite>) -> TimelineResponse {
    let mut timeline: Vec<TimelineEntry> = usage
        .into_iter()
        .map(|record| TimelineEntry {
            kind: TimelineKind::ToolUsage,
            action: "Used tool",
            tool_name: record.tool_name,
            count: Some(record.usage_count),
            timestamp: record.last_used,
            icon: "🔧",
        })
        .chain(favorites.into_iter().map(|fav| TimelineEntry {
            kind: TimelineKind::Favorite,
            action: "Favorited tool",
            tool_name: fav.tool_name,
            count: None,
            timestamp: fav.created_at,
            icon: "⭐",
        }))
        .collect();

    timeline.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let total = timeline.len();
    timeline.truncate(TIMELINE_LIMIT);

    TimelineResponse { timeline, total }
}

/// Recent activity
pub async fn timeline(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<TimelineResponse> {
    let usage = ToolUsage::list_by_user(&state.store, principal.user_id).await;
    let favorites = Favorite::list_by_user(&state.store, principal.user_id).await;

    Json(build_timeline(usage, favorites))
}

// --- Feedback ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub tool_name: Option<String>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEcho {
    pub tool_name: String,
    pub rating: f64,
    pub comment: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: String,
    pub feedback: FeedbackEcho,
}

impl From<Feedback> for FeedbackEcho {
    fn from(feedback: Feedback) -> Self {
        Self {
            tool_name: feedback.tool_name,
            rating: feedback.rating,
            comment: feedback.comment,
            submitted_at: feedback.created_at,
        }
    }
}

/// Validates feedback and echoes it back
///
/// # Errors
///
/// - `400 Bad Request`: Missing tool name or rating, or rating outside 1-5
pub async fn submit_feedback(
    Extension(principal): Extension<Principal>,
    Json(body): Json<JsonValue>,
) -> ApiResult<Json<FeedbackResponse>> {
    let req: FeedbackRequest = parse_body(body)?;

    let (Some(tool_name), Some(rating)) = (req.tool_name.filter(|name| !name.is_empty()), req.rating)
    else {
        return Err(ApiError::BadRequest(
            "Please provide a tool name and a rating".to_string(),
        ));
    };

    let feedback = Feedback::new(tool_name, rating, req.comment)?;
    tracing::info!(
        user_id = %principal.user_id,
        tool = %feedback.tool_name,
        rating = feedback.rating,
        "Feedback received"
    );

    Ok(Json(FeedbackResponse {
        message: "Feedback submitted".to_string(),
        feedback: feedback.into(),
    }))
}

// --- Recommendations ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub tool_name: &'static str,
    pub reason: &'static str,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
    pub message: String,
}

/// Scores every catalog tool the user has not used and keeps the top few
pub fn recommend(usage: &[ToolUsage], rng: &mut impl Rng) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = tools::CATALOG
        .iter()
        .filter(|tool| !usage.iter().any(|record| record.tool_name == tool.id))
        .map(|tool| Recommendation {
            tool_name: tool.id,
            reason: "Recommended from your usage",
            score: rng.gen_range(0.0..100.0),
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations.truncate(RECOMMENDATION_LIMIT);
    recommendations
}

/// Tools the caller has not tried yet
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<RecommendationsResponse> {
    let usage = ToolUsage::list_by_user(&state.store, principal.user_id).await;
    let recommendations = recommend(&usage, &mut rand::thread_rng());

    let message = if recommendations.is_empty() {
        "You have tried every tool!"
    } else {
        "Recommended tools for you"
    };

    Json(RecommendationsResponse {
        recommendations,
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::{rngs::StdRng, SeedableRng};

    fn usage(user_id: Uuid, tool: &str, count: u64, last_used: DateTime<Utc>) -> ToolUsage {
        ToolUsage {
            id: Uuid::new_v4(),
            user_id,
            tool_name: tool.to_string(),
            usage_count: count,
            last_used,
        }
    }

    fn favorite(user_id: Uuid, tool: &str, created_at: DateTime<Utc>) -> Favorite {
        Favorite {
            id: Uuid::new_v4(),
            user_id,
            tool_name: tool.to_string(),
            created_at,
        }
    }

    #[test]
    fn test_frequency_bands() {
        assert_eq!(Frequency::from_count(0), Frequency::Low);
        assert_eq!(Frequency::from_count(4), Frequency::Low);
        assert_eq!(Frequency::from_count(5), Frequency::Medium);
        assert_eq!(Frequency::from_count(9), Frequency::Medium);
        assert_eq!(Frequency::from_count(10), Frequency::High);
    }

    #[test]
    fn test_build_stats() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let stats = build_stats(
            vec![usage(user, "translation", 5, now), usage(user, "code-assistant", 2, now)],
            vec![favorite(user, "translation", now)],
        );

        assert_eq!(stats.stats.total_usage, 7);
        assert_eq!(stats.stats.tools_used, 2);
        assert_eq!(stats.stats.favorites_count, 1);
        assert_eq!(stats.stats.most_used_tool.as_ref().map(|t| t.count), Some(5));

        let empty = build_stats(Vec::new(), Vec::new());
        assert!(empty.stats.most_used_tool.is_none());
        assert_eq!(
            serde_json::to_value(&empty).unwrap()["stats"]["mostUsedTool"],
            JsonValue::Null
        );
    }

    #[test]
    fn test_build_history_summary() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let history = build_history(vec![
            usage(user, "a", 12, now),
            usage(user, "b", 6, now),
            usage(user, "c", 1, now),
        ]);

        assert_eq!(history.summary.total_tools, 3);
        assert_eq!(history.summary.total_usage, 19);
        assert_eq!(history.summary.high_frequency_tools, 1);
        assert_eq!(history.history[1].frequency, Frequency::Medium);
    }

    #[test]
    fn test_timeline_sorted_and_capped() {
        let user = Uuid::new_v4();
        let base = Utc::now();

        let usage_records: Vec<_> = (0..15)
            .map(|i| usage(user, &format!("tool-{i}"), 1, base - Duration::minutes(i * 2)))
            .collect();
        let favorites: Vec<_> = (0..10)
            .map(|i| favorite(user, &format!("fav-{i}"), base - Duration::minutes(i * 2 + 1)))
            .collect();

        let timeline = build_timeline(usage_records, favorites);

        assert_eq!(timeline.total, 25);
        assert_eq!(timeline.timeline.len(), TIMELINE_LIMIT);
        assert!(timeline
            .timeline
            .windows(2)
            .all(|pair| pair[0].timestamp >= pair[1].timestamp));
        assert_eq!(timeline.timeline[0].kind, TimelineKind::ToolUsage);
        assert_eq!(timeline.timeline[1].kind, TimelineKind::Favorite);
        assert_eq!(timeline.timeline[1].count, None);
    }

    #[test]
    fn test_recommend_skips_used_tools() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let used = vec![
            usage(user, "text-generator", 1, now),
            usage(user, "translation", 1, now),
        ];

        let mut rng = StdRng::seed_from_u64(7);
        let recommendations = recommend(&used, &mut rng);

        assert_eq!(recommendations.len(), RECOMMENDATION_LIMIT);
        assert!(recommendations
            .iter()
            .all(|r| r.tool_name != "text-generator" && r.tool_name != "translation"));
        assert!(recommendations
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score));
        assert!(recommendations.iter().all(|r| (0.0..100.0).contains(&r.score)));
    }

    #[test]
    fn test_recommend_all_used() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let used: Vec<_> = tools::CATALOG
            .iter()
            .map(|tool| usage(user, tool.id, 1, now))
            .collect();

        assert!(recommend(&used, &mut rand::thread_rng()).is_empty());
    }
}
