/// Account manager
///
/// Owns the credential lifecycle: registration, the login state machine
/// (password verification, failed-attempt counting, lockout), refresh-token
/// rotation, the password-reset protocol, the paginated user listing, and
/// the expired-token sweep.
use crate::{
    account::{lockout, RegisterRequest, TokenResponse, UserListItem},
    db::user::User,
    error::{ApiError, ApiResult},
    mailer::Mailer,
    password,
    store::UserStore,
    token::TokenIssuer,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Refresh tokens outlive the access token they were issued with by this much.
const REFRESH_TOKEN_EXTRA_DAYS: i64 = 7;
/// Password-reset tokens are valid for one hour.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Message returned by the forgot-password flow regardless of whether the
/// email belongs to an account.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If the email exists, a password reset link has been sent.";

pub struct AccountManager {
    store: UserStore,
    tokens: Arc<TokenIssuer>,
    mailer: Arc<Mailer>,
}

impl AccountManager {
    pub fn new(store: UserStore, tokens: Arc<TokenIssuer>, mailer: Arc<Mailer>) -> Self {
        Self {
            store,
            tokens,
            mailer,
        }
    }

    /// Register a new user
    ///
    /// Uniqueness is checked on the uppercase-invariant forms, email first,
    /// so a request conflicting on both reports the email conflict.
    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<String> {
        let normalized_email = req.email.to_uppercase();
        if self.store.exists_with_email(&normalized_email).await? {
            return Err(ApiError::DuplicateEmail);
        }

        let normalized_user_name = req.user_name.to_uppercase();
        if self.store.exists_with_username(&normalized_user_name).await? {
            return Err(ApiError::DuplicateUsername);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            user_name: req.user_name.clone(),
            normalized_user_name,
            email: req.email.clone(),
            normalized_email,
            name_surname: req.name_surname.clone(),
            password_hash: password::hash_password(&req.password)?,
            refresh_token: None,
            refresh_token_expiry: None,
            password_reset_token: None,
            password_reset_token_expiry: None,
            failed_login_attempts: 0,
            lockout_until: None,
            lockout_enabled: true,
            created_at: Utc::now(),
        };

        self.store.insert(&user).await?;

        tracing::info!("Registered user {}", user.id);
        Ok(user.id)
    }

    /// Authenticate a user and issue a token pair
    ///
    /// The lockout admission check runs before password verification; a
    /// locked account is rejected without touching the hash or the counter.
    pub async fn login(&self, email_or_user_name: &str, plain_password: &str) -> ApiResult<TokenResponse> {
        let normalized = email_or_user_name.to_uppercase();
        let user = self
            .store
            .find_by_email_or_username(&normalized)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let now = Utc::now();
        if let lockout::Admission::Locked { remaining } =
            lockout::check_admission(user.lockout_enabled, user.lockout_until, now)
        {
            tracing::warn!("Login attempt for locked account {}", user.id);
            return Err(ApiError::AccountLocked(lockout::remaining_minutes(remaining)));
        }

        if !password::verify_password(plain_password, &user.password_hash) {
            let lock_until = now + lockout::lockout_duration();
            self.store
                .record_failed_login(&user.id, lockout::MAX_FAILED_ATTEMPTS, lock_until)
                .await?;

            if user.lockout_enabled
                && user.failed_login_attempts + 1 >= lockout::MAX_FAILED_ATTEMPTS
            {
                tracing::warn!(
                    "Account {} locked after {} failed attempts",
                    user.id,
                    user.failed_login_attempts + 1
                );
            }

            return Err(ApiError::InvalidCredentials);
        }

        let issued = self.tokens.create_access_token(&user)?;
        let refresh_expiry = issued.expiration + Duration::days(REFRESH_TOKEN_EXTRA_DAYS);
        self.store
            .record_successful_login(&user.id, &issued.refresh_token, refresh_expiry)
            .await?;

        tracing::info!("User {} logged in", user.id);
        Ok(TokenResponse {
            access_token: issued.access_token,
            expiration: issued.expiration,
            refresh_token: issued.refresh_token,
        })
    }

    /// Exchange a refresh token for a new token pair
    ///
    /// Rotation is single-use: the stored token is swapped for the new one
    /// only if it still equals the presented one, so of two concurrent
    /// requests with the same token at most one succeeds.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenResponse> {
        let user = self
            .store
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Unknown refresh token presented");
                ApiError::InvalidRefreshToken
            })?;

        match user.refresh_token_expiry {
            Some(expiry) if expiry >= Utc::now() => {}
            _ => {
                tracing::warn!("Expired refresh token for user {}", user.id);
                return Err(ApiError::InvalidRefreshToken);
            }
        }

        let issued = self.tokens.create_access_token(&user)?;
        let refresh_expiry = issued.expiration + Duration::days(REFRESH_TOKEN_EXTRA_DAYS);
        let rotated = self
            .store
            .rotate_refresh_token(&user.id, refresh_token, &issued.refresh_token, refresh_expiry)
            .await?;

        if !rotated {
            // A concurrent rotation won the race; the presented token is gone.
            tracing::warn!("Lost refresh rotation race for user {}", user.id);
            return Err(ApiError::InvalidRefreshToken);
        }

        tracing::info!("Rotated refresh token for user {}", user.id);
        Ok(TokenResponse {
            access_token: issued.access_token,
            expiration: issued.expiration,
            refresh_token: issued.refresh_token,
        })
    }

    /// Issue a password-reset token and email it to the account holder
    ///
    /// The response is identical whether or not the email belongs to an
    /// account, and the token is persisted before the send is attempted so a
    /// failing mail provider cannot lose it.
    pub async fn forgot_password(&self, email: &str) -> ApiResult<String> {
        let normalized = email.to_uppercase();
        let user = match self.store.find_by_normalized_email(&normalized).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Password reset requested for unknown email");
                return Ok(FORGOT_PASSWORD_MESSAGE.to_string());
            }
        };

        // Two concatenated 128-bit random segments, hex without hyphens.
        let reset_token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let expiry = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.store
            .set_reset_token(&user.id, &reset_token, expiry)
            .await?;

        if self.mailer.is_configured() {
            if let Err(e) = self
                .mailer
                .send_password_reset_email(&user.email, &reset_token)
                .await
            {
                tracing::error!("Failed to send password reset email to user {}: {}", user.id, e);
            } else {
                tracing::info!("Password reset email sent to user {}", user.id);
            }
        } else {
            tracing::warn!("Email not configured, reset token stored but not sent");
        }

        Ok(FORGOT_PASSWORD_MESSAGE.to_string())
    }

    /// Redeem a password-reset token
    ///
    /// On success the reset pair is consumed and every outstanding refresh
    /// token is invalidated in the same write.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> ApiResult<()> {
        let normalized = email.to_uppercase();
        let user = self
            .store
            .find_by_normalized_email(&normalized)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Password reset attempted for unknown email");
                ApiError::InvalidResetToken
            })?;

        match (&user.password_reset_token, user.password_reset_token_expiry) {
            (Some(stored), Some(expiry)) if stored == token && expiry >= Utc::now() => {}
            _ => {
                tracing::warn!("Invalid or expired reset token for user {}", user.id);
                return Err(ApiError::InvalidResetToken);
            }
        }

        let new_hash = password::hash_password(new_password)?;
        let applied = self
            .store
            .apply_password_reset(&user.id, &new_hash, token)
            .await?;

        if !applied {
            tracing::warn!("Reset token for user {} was already consumed", user.id);
            return Err(ApiError::InvalidResetToken);
        }

        tracing::info!("Password reset for user {}", user.id);
        Ok(())
    }

    /// List users, zero-based page of the given size
    pub async fn list_users(&self, page: i64, size: i64) -> ApiResult<Vec<UserListItem>> {
        let users = self.store.list_page(page * size, size).await?;

        Ok(users
            .into_iter()
            .map(|user| UserListItem {
                id: user.id,
                email: user.email,
                name_surname: user.name_surname,
                user_name: user.user_name,
            })
            .collect())
    }

    /// Clear expired reset and refresh token pairs
    ///
    /// Returns (reset_cleared, refresh_cleared). Idempotent: a second run
    /// with no new expirations clears nothing.
    pub async fn sweep_expired_tokens(&self) -> ApiResult<(u64, u64)> {
        let now = Utc::now();

        let reset_cleared = self.store.sweep_expired_reset_tokens(now).await?;
        let refresh_cleared = self.store.sweep_expired_refresh_tokens(now).await?;

        if reset_cleared > 0 || refresh_cleared > 0 {
            tracing::info!(reset_cleared, refresh_cleared, "Cleared expired tokens");
        } else {
            tracing::debug!("Token sweep: nothing expired");
        }

        Ok((reset_cleared, refresh_cleared))
    }
}
