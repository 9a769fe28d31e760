use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::TimeDelta;

use crate::config::Config;
use crate::utils::retry::{retry_with_backoff, Backoff};

pub mod badges;
pub mod book_filter;
pub mod progress;
pub mod store;

use store::{LearningStore, MongoLearningStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn LearningStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn LearningStore>) -> Self {
        Self { config, store }
    }

    /// Connects to MongoDB and verifies the connection before serving.
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let client = mongodb::Client::with_uri_str(&config.mongo_uri)
            .await
            .context("Failed to create MongoDB client")?;
        let store = MongoLearningStore::new(client.database(&config.mongo_database));

        tracing::info!("Pinging MongoDB database {}", config.mongo_database);
        retry_with_backoff(Backoff::default(), "MongoDB ping", || async {
            tokio::time::timeout(std::time::Duration::from_secs(5), store.ping())
                .await
                .map_err(|_| anyhow!("MongoDB ping timeout after 5s"))?
                .map_err(anyhow::Error::from)
        })
        .await?;
        tracing::info!("MongoDB connection established");

        Ok(Self::new(config, Arc::new(store)))
    }

    pub fn session_gap(&self) -> TimeDelta {
        self.config.session_gap()
    }
}
