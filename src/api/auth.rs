/// Authentication endpoints
use crate::{
    account::{
        ForgotPasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
        ResetPasswordRequest, TokenResponse,
    },
    context::AppContext,
    error::{ApiError, ApiResult},
    response::ServiceResponse,
};
use axum::{extract::State, routing::post, Json, Router};
use validator::Validate;

/// Build auth routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh-token", post(refresh_token))
        .route("/api/v1/auth/forgot-password", post(forgot_password))
        .route("/api/v1/auth/reset-password", post(reset_password))
}

/// Flatten validator output into the pass-through error list
fn check_request<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(|errors| {
        let messages = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for {}.", field),
                })
            })
            .collect();
        ApiError::ValidationFailed(messages)
    })
}

/// Register endpoint
async fn register(
    State(ctx): State<AppContext>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<ServiceResponse<String>>> {
    check_request(&req)?;

    let id = ctx.account_manager.register(&req).await?;

    Ok(Json(ServiceResponse::success(
        id,
        "User created successfully.",
    )))
}

/// Login endpoint
async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ServiceResponse<TokenResponse>>> {
    check_request(&req)?;

    let tokens = ctx
        .account_manager
        .login(&req.email_or_user_name, &req.password)
        .await?;

    Ok(Json(ServiceResponse::success(
        tokens,
        "Authentication successful",
    )))
}

/// Refresh token endpoint
async fn refresh_token(
    State(ctx): State<AppContext>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<ServiceResponse<TokenResponse>>> {
    let tokens = ctx.account_manager.refresh(&req.refresh_token).await?;

    Ok(Json(ServiceResponse::success(
        tokens,
        "Tokens refreshed successfully!",
    )))
}

/// Forgot password endpoint
///
/// Always answers with the same success-shaped response so the caller cannot
/// probe which emails have accounts.
async fn forgot_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<ServiceResponse<String>>> {
    let message = ctx.account_manager.forgot_password(&req.email).await?;

    Ok(Json(ServiceResponse::message_only(message)))
}

/// Reset password endpoint
async fn reset_password(
    State(ctx): State<AppContext>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<ServiceResponse<String>>> {
    check_request(&req)?;

    ctx.account_manager
        .reset_password(&req.email, &req.token, &req.new_password)
        .await?;

    Ok(Json(ServiceResponse::message_only(
        "Password has been reset successfully. Please log in with your new password.",
    )))
}
