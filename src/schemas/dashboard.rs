use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DashboardQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Scopes book and minigame counts to one owner
    pub account_id: Option<i64>,
    /// Scopes user counts and the average score to one teacher's students
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RoleBreakdown {
    pub admin: StatusCounts,
    pub teacher: StatusCounts,
    pub student: StatusCounts,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct UserCounts {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub by_role: RoleBreakdown,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MinigameCounts {
    pub total: u64,
    pub completed: u64,
    pub upcoming: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub user_counts: UserCounts,
    pub book_counts: StatusCounts,
    pub minigame_counts: MinigameCounts,
    pub average_minigame_score: Option<f64>,
}
