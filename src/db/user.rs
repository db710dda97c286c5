/// User database model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database
///
/// `refresh_token`/`refresh_token_expiry` and `password_reset_token`/
/// `password_reset_token_expiry` are always set and cleared together.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    pub name_surname: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    pub password_reset_token: Option<String>,
    pub password_reset_token_expiry: Option<DateTime<Utc>>,
    pub failed_login_attempts: i64,
    pub lockout_until: Option<DateTime<Utc>>,
    pub lockout_enabled: bool,
    pub created_at: DateTime<Utc>,
}
