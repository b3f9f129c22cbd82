use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::account::{self, AccountRole, AccountStatus};

/// Strip surrounding whitespace before validation sees the value
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "type")]
    pub role: AccountRole,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(
        length(min = 8, message = "The password field must be at least 8 characters."),
        must_match(
            other = "password_confirmation",
            message = "The password field confirmation does not match."
        )
    )]
    pub password: String,
    pub password_confirmation: String,
    #[validate(length(min = 1, max = 255, message = "The first name field is required."))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The last name field is required."))]
    pub last_name: String,
    pub user_role: AccountRole,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub teacher_id: Option<i64>,
}

/// Self-service profile update
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInformationRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "The first name field is required."))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The last name field is required."))]
    pub last_name: String,
    #[serde(default)]
    pub user_role: Option<AccountRole>,
}

/// Admin update of another account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 1, max = 255, message = "The first name field is required."))]
    pub first_name: String,
    #[validate(length(max = 255))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "The last name field is required."))]
    pub last_name: String,
    pub user_role: AccountRole,
    #[serde(default)]
    pub teacher_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeStatusRequest {
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "The current password field is required."))]
    pub current_password: String,
    #[validate(
        length(min = 8, message = "The new password field must be at least 8 characters."),
        must_match(
            other = "new_password_confirmation",
            message = "The new password field confirmation does not match."
        )
    )]
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// Filters for `GET /accounts/get`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AccountQuery {
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
    pub user_role: Option<AccountRole>,
    pub exclude_user_role: Option<AccountRole>,
    pub is_deleted: Option<bool>,
    pub exclude_self: Option<bool>,
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<u64>,
}

/// Public face of an account when embedded in another resource
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountSummary {
    pub id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub user_role: AccountRole,
}

impl From<&account::Model> for AccountSummary {
    fn from(account: &account::Model) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            middle_name: account.middle_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            user_role: account.user_role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub user: account::Model,
}
