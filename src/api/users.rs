/// User listing endpoints
use crate::{
    account::UserListItem,
    api::middleware,
    context::AppContext,
    error::ApiResult,
    response::ServiceResponse,
};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/v1/users", get(list_users))
}

/// Pagination query, zero-based page
#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    page: i64,
    #[serde(default = "default_page_size")]
    size: i64,
}

fn default_page_size() -> i64 {
    10
}

/// Paginated user listing (requires authentication)
async fn list_users(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ServiceResponse<Vec<UserListItem>>>> {
    middleware::require_auth(&ctx, &headers)?;

    let page = query.page.max(0);
    let size = query.size.clamp(1, 100);
    let users = ctx.account_manager.list_users(page, size).await?;

    Ok(Json(ServiceResponse::success(users, "")))
}
