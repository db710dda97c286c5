/// Application context and dependency wiring
use crate::{
    account::AccountManager,
    config::ServerConfig,
    db,
    error::ApiResult,
    mailer::Mailer,
    store::UserStore,
    token::TokenIssuer,
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub account_manager: Arc<AccountManager>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let pool = db::create_pool(&config.storage.user_db, db::DatabaseOptions::default()).await?;
        db::run_migrations(&pool).await?;
        db::test_connection(&pool).await?;

        let store = UserStore::new(pool);
        let token_issuer = Arc::new(TokenIssuer::new(config.token.clone()));
        let mailer = Arc::new(Mailer::new(
            config.email.clone(),
            config.service.public_url.clone(),
        )?);
        let account_manager = Arc::new(AccountManager::new(
            store,
            Arc::clone(&token_issuer),
            mailer,
        ));

        Ok(Self {
            config: Arc::new(config),
            account_manager,
            token_issuer,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> ApiResult<()> {
        let dir = &config.storage.data_directory;
        if !dir.exists() {
            tokio::fs::create_dir_all(dir).await?;
        }

        Ok(())
    }
}
