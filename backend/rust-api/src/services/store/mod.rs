//! Persistence seam for the progress views. Handlers only see
//! [`LearningStore`]; production runs on MongoDB, tests on the in-memory store.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Book, EarnedBadge, QuizAttemptRecord};

pub mod memory;
pub mod mongo;

pub use memory::InMemoryLearningStore;
pub use mongo::MongoLearningStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LearningStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    /// Every attempt the student ever submitted, in no particular order.
    async fn attempts_for_user(&self, user_id: i64) -> Result<Vec<QuizAttemptRecord>, StoreError>;

    async fn record_attempt(
        &self,
        attempt: QuizAttemptRecord,
    ) -> Result<QuizAttemptRecord, StoreError>;

    async fn badges_for_user(&self, user_id: i64) -> Result<Vec<EarnedBadge>, StoreError>;

    async fn list_books(&self) -> Result<Vec<Book>, StoreError>;
}
