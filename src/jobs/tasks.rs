/// Background task implementations
use crate::{context::AppContext, error::ApiResult};

/// Clear expired reset-token and refresh-token pairs
pub async fn sweep_expired_tokens(ctx: &AppContext) -> ApiResult<u64> {
    let (reset_cleared, refresh_cleared) = ctx.account_manager.sweep_expired_tokens().await?;

    Ok(reset_cleared + refresh_cleared)
}
