/// Bearer-token authentication helpers
use crate::{
    context::AppContext,
    error::{ApiError, ApiResult},
    token::AccessClaims,
};
use axum::http::HeaderMap;

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| {
            if s.starts_with("Bearer ") {
                Some(s[7..].to_string())
            } else {
                None
            }
        })
}

/// Require authentication - validate the bearer token or return 401
pub fn require_auth(ctx: &AppContext, headers: &HeaderMap) -> ApiResult<AccessClaims> {
    let token = extract_bearer_token(headers)
        .ok_or_else(|| ApiError::Authentication("Missing authorization header".to_string()))?;

    ctx.token_issuer.decode_access_token(&token)
}
