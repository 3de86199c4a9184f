use std::{sync::Arc, time::Duration};

use super::{
    backend::CompletionBackend, parse::parse_questions, prompt::build_quiz_prompt,
    GenerationError, GenerationProfile,
};
use crate::{errors::AppResult, quiz::QuestionSet};

pub struct QuizGenerator {
    backend: Arc<dyn CompletionBackend>,
    timeout: Duration,
}

impl QuizGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Builds the prompt, calls the backend once and validates the reply.
    pub async fn generate(
        &self,
        text: &str,
        profile: GenerationProfile,
    ) -> Result<QuestionSet, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }

        let prompt = build_quiz_prompt(text, profile.question_count());
        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_| GenerationError::TimedOut)??;

        let questions = parse_questions(&raw)?;
        log::info!(
            "Generated {} questions ({} profile, {} requested)",
            questions.len(),
            profile,
            profile.question_count()
        );
        Ok(questions)
    }

    /// Like [`generate`](Self::generate), with the cause logged and collapsed into an `AppError`.
    pub async fn generate_quiz(
        &self,
        text: &str,
        profile: GenerationProfile,
    ) -> AppResult<QuestionSet> {
        self.generate(text, profile).await.map_err(|e| {
            log::error!("Error generating quiz: {}", e);
            e.into()
        })
    }
}
