/// Persistent user store
///
/// The single adapter owning all SQL against the users table. Protocol code
/// never issues queries of its own; every per-account mutation here is a
/// single UPDATE so row-level atomicity serializes concurrent writers.
use crate::{
    db::user::User,
    error::{ApiError, ApiResult},
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, user_name, normalized_user_name, email, normalized_email, \
     name_surname, password_hash, refresh_token, refresh_token_expiry, \
     password_reset_token, password_reset_token_expiry, failed_login_attempts, \
     lockout_until, lockout_enabled, created_at";

#[derive(Clone)]
pub struct UserStore {
    db: SqlitePool,
}

impl UserStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert a new user record
    pub async fn insert(&self, user: &User) -> ApiResult<()> {
        let result = sqlx::query(
            "INSERT INTO users (id, user_name, normalized_user_name, email, normalized_email, \
             name_surname, password_hash, refresh_token, refresh_token_expiry, \
             password_reset_token, password_reset_token_expiry, failed_login_attempts, \
             lockout_until, lockout_enabled, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        )
        .bind(&user.id)
        .bind(&user.user_name)
        .bind(&user.normalized_user_name)
        .bind(&user.email)
        .bind(&user.normalized_email)
        .bind(&user.name_surname)
        .bind(&user.password_hash)
        .bind(&user.refresh_token)
        .bind(user.refresh_token_expiry)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_token_expiry)
        .bind(user.failed_login_attempts)
        .bind(user.lockout_until)
        .bind(user.lockout_enabled)
        .bind(user.created_at)
        .execute(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Two registrations can race past the existence checks; the unique
            // indexes are the final arbiter.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                if db_err.message().contains("normalized_email") {
                    Err(ApiError::DuplicateEmail)
                } else {
                    Err(ApiError::DuplicateUsername)
                }
            }
            Err(e) => Err(ApiError::Database(e)),
        }
    }

    /// Get user by id
    pub async fn find_by_id(&self, id: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(user)
    }

    /// Get user by normalized email
    pub async fn find_by_normalized_email(&self, normalized_email: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE normalized_email = ?1"
        ))
        .bind(normalized_email)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(user)
    }

    /// Get user by normalized username
    pub async fn find_by_normalized_username(
        &self,
        normalized_user_name: &str,
    ) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE normalized_user_name = ?1"
        ))
        .bind(normalized_user_name)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(user)
    }

    /// Get user by a normalized identifier that may be either email or username
    pub async fn find_by_email_or_username(&self, normalized: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE normalized_email = ?1 OR normalized_user_name = ?1"
        ))
        .bind(normalized)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(user)
    }

    /// Get user by their current refresh token (exact match)
    pub async fn find_by_refresh_token(&self, refresh_token: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE refresh_token = ?1"
        ))
        .bind(refresh_token)
        .fetch_optional(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(user)
    }

    /// Check if a normalized email is already taken
    pub async fn exists_with_email(&self, normalized_email: &str) -> ApiResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE normalized_email = ?1")
                .bind(normalized_email)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    /// Check if a normalized username is already taken
    pub async fn exists_with_username(&self, normalized_user_name: &str) -> ApiResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE normalized_user_name = ?1")
                .bind(normalized_user_name)
                .fetch_one(&self.db)
                .await
                .map_err(ApiError::Database)?;

        Ok(count > 0)
    }

    /// Record a failed login attempt
    ///
    /// Increments the counter and, when the post-increment count reaches the
    /// threshold on a lockout-enabled account, stamps the lockout in the same
    /// statement so concurrent failures cannot under-count.
    pub async fn record_failed_login(
        &self,
        id: &str,
        max_failed_attempts: i64,
        lock_until: DateTime<Utc>,
    ) -> ApiResult<()> {
        sqlx::query(
            "UPDATE users SET \
                 failed_login_attempts = failed_login_attempts + 1, \
                 lockout_until = CASE \
                     WHEN lockout_enabled = 1 AND failed_login_attempts + 1 >= ?2 THEN ?3 \
                     ELSE lockout_until \
                 END \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(max_failed_attempts)
        .bind(lock_until)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Record a successful login
    ///
    /// Resets the failure counter, clears any lockout, and stores the freshly
    /// issued refresh token with its expiry in one write.
    pub async fn record_successful_login(
        &self,
        id: &str,
        refresh_token: &str,
        refresh_token_expiry: DateTime<Utc>,
    ) -> ApiResult<()> {
        sqlx::query(
            "UPDATE users SET \
                 failed_login_attempts = 0, \
                 lockout_until = NULL, \
                 refresh_token = ?2, \
                 refresh_token_expiry = ?3 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(refresh_token)
        .bind(refresh_token_expiry)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Rotate a refresh token, compare-and-swap on the old value
    ///
    /// Returns false when the stored token no longer matches `old_token`,
    /// i.e. a concurrent rotation already won.
    pub async fn rotate_refresh_token(
        &self,
        id: &str,
        old_token: &str,
        new_token: &str,
        new_expiry: DateTime<Utc>,
    ) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = ?3, refresh_token_expiry = ?4 \
             WHERE id = ?1 AND refresh_token = ?2",
        )
        .bind(id)
        .bind(old_token)
        .bind(new_token)
        .bind(new_expiry)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    /// Store a password-reset token and its expiry
    pub async fn set_reset_token(
        &self,
        id: &str,
        reset_token: &str,
        expiry: DateTime<Utc>,
    ) -> ApiResult<()> {
        sqlx::query(
            "UPDATE users SET password_reset_token = ?2, password_reset_token_expiry = ?3 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(reset_token)
        .bind(expiry)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(())
    }

    /// Apply a password reset, compare-and-swap on the reset token
    ///
    /// Replaces the hash, consumes the reset token, and invalidates any
    /// outstanding refresh token in a single write. Returns false when the
    /// token was already consumed.
    pub async fn apply_password_reset(
        &self,
        id: &str,
        password_hash: &str,
        reset_token: &str,
    ) -> ApiResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET \
                 password_hash = ?2, \
                 password_reset_token = NULL, \
                 password_reset_token_expiry = NULL, \
                 refresh_token = NULL, \
                 refresh_token_expiry = NULL \
             WHERE id = ?1 AND password_reset_token = ?3",
        )
        .bind(id)
        .bind(password_hash)
        .bind(reset_token)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(result.rows_affected() == 1)
    }

    /// List users ordered by creation time
    pub async fn list_page(&self, offset: i64, limit: i64) -> ApiResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(users)
    }

    /// Clear expired password-reset token pairs, returning affected rows
    pub async fn sweep_expired_reset_tokens(&self, now: DateTime<Utc>) -> ApiResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET password_reset_token = NULL, password_reset_token_expiry = NULL \
             WHERE password_reset_token_expiry < ?1",
        )
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(result.rows_affected())
    }

    /// Clear expired refresh token pairs, returning affected rows
    pub async fn sweep_expired_refresh_tokens(&self, now: DateTime<Utc>) -> ApiResult<u64> {
        let result = sqlx::query(
            "UPDATE users SET refresh_token = NULL, refresh_token_expiry = NULL \
             WHERE refresh_token_expiry < ?1",
        )
        .bind(now)
        .execute(&self.db)
        .await
        .map_err(ApiError::Database)?;

        Ok(result.rows_affected())
    }
}
