use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

/// Mutation applied to a stored attempt under the repository lock.
pub type AttemptUpdate<'a> = &'a mut (dyn FnMut(&mut QuizAttempt) -> AppResult<()> + Send);

#[async_trait]
pub trait QuizSessionRepository: Send + Sync {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<QuizAttempt>>;
    /// Runs `apply` on the stored attempt and returns the result. Nothing is written if
    /// `apply` fails.
    async fn update_with(&self, id: &Uuid, apply: AttemptUpdate<'_>) -> AppResult<QuizAttempt>;
    async fn delete(&self, id: &Uuid) -> AppResult<bool>;
    async fn delete_by_owner(&self, owner_id: &str) -> AppResult<usize>;
    async fn count(&self) -> AppResult<usize>;
}

#[derive(Clone, Default)]
pub struct InMemoryQuizSessionRepository {
    attempts: Arc<RwLock<HashMap<Uuid, QuizAttempt>>>,
}

impl InMemoryQuizSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryQuizSessionRepository {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if attempts.contains_key(&attempt.id) {
            return Err(AppError::InvalidState(format!(
                "Quiz attempt '{}' already exists",
                attempt.id
            )));
        }
        attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &Uuid) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.get(id).cloned())
    }

    async fn update_with(&self, id: &Uuid, apply: AttemptUpdate<'_>) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        let stored = attempts
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("quiz attempt".to_string()))?;

        let mut updated = stored.clone();
        apply(&mut updated)?;
        updated.touch();
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &Uuid) -> AppResult<bool> {
        let mut attempts = self.attempts.write().await;
        Ok(attempts.remove(id).is_some())
    }

    async fn delete_by_owner(&self, owner_id: &str) -> AppResult<usize> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, attempt| attempt.owner_id != owner_id);
        Ok(before - attempts.len())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.attempts.read().await.len())
    }
}
