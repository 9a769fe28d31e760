use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LearningStore, StoreError};
use crate::models::{Book, EarnedBadge, QuizAttemptRecord};

/// Store backed by plain vectors. Used by tests and local demos.
#[derive(Debug, Default)]
pub struct InMemoryLearningStore {
    attempts: RwLock<Vec<QuizAttemptRecord>>,
    badges: RwLock<Vec<(i64, EarnedBadge)>>,
    books: RwLock<Vec<Book>>,
}

impl InMemoryLearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attempts(mut self, attempts: Vec<QuizAttemptRecord>) -> Self {
        self.attempts.get_mut().extend(attempts);
        self
    }

    pub fn with_badges(mut self, user_id: i64, badges: Vec<EarnedBadge>) -> Self {
        self.badges
            .get_mut()
            .extend(badges.into_iter().map(|badge| (user_id, badge)));
        self
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books.get_mut().extend(books);
        self
    }
}

#[async_trait]
impl LearningStore for InMemoryLearningStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn attempts_for_user(&self, user_id: i64) -> Result<Vec<QuizAttemptRecord>, StoreError> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|attempt| attempt.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn record_attempt(
        &self,
        mut attempt: QuizAttemptRecord,
    ) -> Result<QuizAttemptRecord, StoreError> {
        if attempt.id.is_none() {
            attempt.id = Some(Uuid::new_v4().to_string());
        }
        self.attempts.write().await.push(attempt.clone());
        Ok(attempt)
    }

    async fn badges_for_user(&self, user_id: i64) -> Result<Vec<EarnedBadge>, StoreError> {
        let badges = self.badges.read().await;
        Ok(badges
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, badge)| badge.clone())
            .collect())
    }

    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.books.read().await.clone())
    }
}
