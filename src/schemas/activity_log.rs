use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::activity_log;

pub const ACTIVITY_LOGS_PER_PAGE: u64 = 15;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateActivityLog {
    #[validate(length(min = 1, max = 255, message = "The description field is required."))]
    pub description: String,
    #[validate(length(min = 1, max = 255, message = "The module field is required."))]
    pub module: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityLogQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub per_page: Option<u64>,
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityLogEntry {
    #[serde(flatten)]
    pub log: activity_log::Model,
    pub account_name: String,
}
