/// Argus ID - user account and authentication service
///
/// Registration, login with account lockout, refresh-token rotation,
/// password reset, and a paginated user listing over HTTP.

mod account;
mod api;
mod config;
mod context;
mod db;
mod error;
mod jobs;
mod mailer;
mod password;
mod response;
mod server;
mod store;
mod token;

use config::ServerConfig;
use context::AppContext;
use error::ApiResult;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "argus_id=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;
    let ctx = Arc::new(ctx);

    // Start background jobs
    let scheduler = Arc::new(jobs::JobScheduler::new(Arc::clone(&ctx)));
    scheduler.start();

    // Start server
    server::serve((*ctx).clone()).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ___
   /   |  _________ ___  _______
  / /| | / ___/ __ `/ / / / ___/
 / ___ |/ /  / /_/ / /_/ (__  )
/_/  |_/_/   \__, /\__,_/____/
            /____/

        Argus ID v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
