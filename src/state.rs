use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::ai::{CareerAi, GeminiModel, GenerativeModel};
use crate::config::{AppConfig, StoreBackend};
use crate::store::{MemStore, PgStore, Store};

/// Shared application state injected into route handlers. Nothing here is a
/// process-wide singleton; everything is constructed once at startup and
/// passed by handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub ai: CareerAi,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn Store> = match config.store_backend {
            StoreBackend::Memory => {
                tracing::info!("using in-memory store");
                Arc::new(MemStore::new())
            }
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL missing for postgres store")?;
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                tracing::info!("using postgres store");
                Arc::new(PgStore::new(pool))
            }
        };

        let model = GeminiModel::new(config.gemini.api_key.clone(), config.gemini.model.clone())?;
        let ai = CareerAi::new(Arc::new(model) as Arc<dyn GenerativeModel>);

        Ok(Self { store, ai, config })
    }

    pub fn from_parts(store: Arc<dyn Store>, ai: CareerAi, config: Arc<AppConfig>) -> Self {
        Self { store, ai, config }
    }

    /// In-memory state for tests: `MemStore` plus whatever model double the
    /// test supplies. Touches no network or database.
    pub fn fake(model: Arc<dyn GenerativeModel>) -> Self {
        use crate::config::{GeminiConfig, JwtConfig};

        let config = Arc::new(AppConfig {
            store_backend: StoreBackend::Memory,
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 60,
            },
            gemini: GeminiConfig {
                api_key: "test".into(),
                model: "test-model".into(),
            },
        });

        Self {
            store: Arc::new(MemStore::new()),
            ai: CareerAi::new(model),
            config,
        }
    }
}
