use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

pub mod tasks;

/// Job scheduler for background tasks
pub struct JobScheduler {
    context: Arc<crate::context::AppContext>,
}

impl JobScheduler {
    pub fn new(context: Arc<crate::context::AppContext>) -> Self {
        Self { context }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) {
        info!("Starting background job scheduler");

        tokio::spawn(Self::expired_token_sweep_job(Arc::clone(&self)));

        info!("Background jobs started");
    }

    /// Clear expired reset and refresh token pairs (runs every hour)
    async fn expired_token_sweep_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(3600)); // Every hour

        loop {
            interval.tick().await;
            info!("Running expired token sweep");

            match tasks::sweep_expired_tokens(&scheduler.context).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Cleared {} expired token pairs", count);
                    } else {
                        info!("Token sweep: nothing expired");
                    }
                }
                Err(e) => error!("Failed to sweep expired tokens: {}", e),
            }
        }
    }
}
