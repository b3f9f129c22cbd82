use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{minigame, minigame_content, minigame_history};
use crate::schemas::{datetime, AccountSummary};

pub const MINIGAMES_PER_PAGE: u64 = 30;

/// Time phase of a minigame relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MinigamePhase {
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MinigamePayload {
    #[validate(length(min = 1, max = 255, message = "The title field is required."))]
    pub title: String,
    #[validate(range(min = 0.0, message = "The default timer field must be at least 0."))]
    pub default_timer: f64,
    #[validate(range(min = 0, message = "The default points field must be at least 0."))]
    pub default_points: i32,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MinigameQuery {
    pub status: Option<MinigamePhase>,
    pub search: Option<String>,
    pub account_id: Option<i64>,
    #[validate(range(min = 1, max = 999))]
    pub per_page: Option<u64>,
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinigameListItem {
    #[serde(flatten)]
    pub minigame: minigame::Model,
    pub account: Option<AccountSummary>,
    pub contents_count: u64,
    pub contents_sum_points: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinigameDetail {
    #[serde(flatten)]
    pub minigame: minigame::Model,
    pub account: Option<AccountSummary>,
    pub contents: Vec<minigame_content::Model>,
}

/// One question of a content batch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMinigameContent {
    #[validate(length(min = 1, message = "The question field is required."))]
    pub question: String,
    #[validate(range(min = 1, max = 4, message = "The correct answer field must be between 1 and 4."))]
    pub correct_answer: i32,
    #[validate(length(min = 1, message = "The option 1 field is required."))]
    pub option_1: String,
    #[validate(length(min = 1, message = "The option 2 field is required."))]
    pub option_2: String,
    #[validate(length(min = 1, message = "The option 3 field is required."))]
    pub option_3: String,
    #[validate(length(min = 1, message = "The option 4 field is required."))]
    pub option_4: String,
    #[validate(range(min = 0))]
    pub points: i32,
    #[validate(range(min = 0.0))]
    pub timer: f64,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page_number: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreMinigameContents {
    #[validate(length(min = 1, message = "The contents field is required."), nested)]
    pub contents: Vec<NewMinigameContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MinigameContentUpdate {
    pub id: i64,
    #[validate(length(min = 1, message = "The question field is required."))]
    pub question: String,
    #[validate(range(min = 1, max = 4, message = "The correct answer field must be between 1 and 4."))]
    pub correct_answer: i32,
    #[validate(length(min = 1, message = "The option 1 field is required."))]
    pub option_1: String,
    #[validate(length(min = 1, message = "The option 2 field is required."))]
    pub option_2: String,
    #[validate(length(min = 1, message = "The option 3 field is required."))]
    pub option_3: String,
    #[validate(length(min = 1, message = "The option 4 field is required."))]
    pub option_4: String,
    #[validate(range(min = 0))]
    pub points: i32,
    #[validate(range(min = 0.0))]
    pub timer: f64,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page_number: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMinigameContents {
    #[validate(length(min = 1, message = "The contents field is required."), nested)]
    pub contents: Vec<MinigameContentUpdate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StoreHistoryRequest {
    pub minigame_id: i64,
    #[validate(range(min = 0))]
    pub total_score: i32,
    #[validate(range(min = 0))]
    pub correct_count: i32,
    #[validate(range(min = 0))]
    pub incorrect_count: i32,
}

/// A play attempt enriched for leaderboards
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub history: minigame_history::Model,
    pub account: Option<AccountSummary>,
    pub minigame_title: Option<String>,
    pub total_possible_points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_plain_datetime() {
        let body = serde_json::json!({
            "title": "Fractions",
            "default_timer": 30,
            "default_points": 100,
            "starts_at": "2025-06-01 08:00:00",
        });
        let payload: MinigamePayload = serde_json::from_value(body).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.starts_at.to_rfc3339(), "2025-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_payload_rejects_negative_timer() {
        let body = serde_json::json!({
            "title": "Fractions",
            "default_timer": -1.5,
            "default_points": 100,
            "starts_at": "2025-06-01T08:00:00Z",
        });
        let payload: MinigamePayload = serde_json::from_value(body).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("default_timer"));
    }

    #[test]
    fn test_content_update_reports_indexed_field() {
        let body = serde_json::json!({
            "contents": [{
                "id": 7,
                "question": "2 + 2?",
                "correct_answer": 5,
                "option_1": "1", "option_2": "2", "option_3": "3", "option_4": "4",
                "points": 10,
                "timer": 15,
            }]
        });
        let batch: UpdateMinigameContents = serde_json::from_value(body).unwrap();
        assert_eq!(batch.contents[0].id, 7);
        let errors = crate::error::flatten_validation_errors(&batch.validate().unwrap_err());
        assert!(errors.contains_key("contents.0.correct_answer"));
    }

    #[test]
    fn test_phase_parses_lowercase() {
        let phase: MinigamePhase = serde_json::from_str("\"ongoing\"").unwrap();
        assert_eq!(phase, MinigamePhase::Ongoing);
    }
}
