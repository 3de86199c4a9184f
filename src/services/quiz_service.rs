use std::sync::Arc;

use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{require_owner, IdentityProvider, Session, SessionChange},
    context::Language,
    errors::{AppError, AppResult, InputError},
    export::ResultExporter,
    generation::{GenerationProfile, QuizGenerator},
    models::{
        domain::QuizAttempt,
        dto::{
            request::GenerateQuizRequest,
            response::{AttemptView, NavigationResponse, QuizResultView},
        },
    },
    quiz::Advance,
    repositories::QuizSessionRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizSessionRepository>,
    generator: QuizGenerator,
    exporter: ResultExporter,
    default_profile: GenerationProfile,
    min_text_chars: usize,
}

/// Caller-side guard: runs before anything is sent to the model.
pub fn check_text_input(text: &str, min_chars: usize) -> Result<(), InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyText);
    }
    if trimmed.chars().count() < min_chars {
        return Err(InputError::TextTooShort { min: min_chars });
    }
    Ok(())
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizSessionRepository>,
        generator: QuizGenerator,
        default_profile: GenerationProfile,
        min_text_chars: usize,
    ) -> Self {
        Self {
            repository,
            generator,
            exporter: ResultExporter,
            default_profile,
            min_text_chars,
        }
    }

    /// Generates a quiz from `request.text` and makes it the owner's only active attempt.
    pub async fn start_quiz(
        &self,
        owner: &Session,
        request: GenerateQuizRequest,
    ) -> AppResult<AttemptView> {
        check_text_input(&request.text, self.min_text_chars)?;
        request.validate()?;

        let profile = request.profile.unwrap_or(self.default_profile);
        let questions = self
            .generator
            .generate_quiz(request.text.trim(), profile)
            .await?;

        let replaced = self.repository.delete_by_owner(&owner.user_id).await?;
        if replaced > 0 {
            log::debug!("Discarded {} earlier attempt(s) for {}", replaced, owner.user_id);
        }

        let attempt = self
            .repository
            .insert(QuizAttempt::new(owner.user_id.clone(), questions))
            .await?;
        log::info!(
            "Started quiz attempt {} for {} ({} questions)",
            attempt.id,
            owner.user_id,
            attempt.session.questions().len()
        );
        Ok(AttemptView::from(&attempt))
    }

    async fn owned_attempt(&self, owner: &Session, id: &Uuid) -> AppResult<QuizAttempt> {
        let attempt = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("quiz attempt".to_string()))?;
        require_owner(owner, &attempt.owner_id)?;
        Ok(attempt)
    }

    pub async fn get_attempt(&self, owner: &Session, id: &Uuid) -> AppResult<AttemptView> {
        let attempt = self.owned_attempt(owner, id).await?;
        Ok(AttemptView::from(&attempt))
    }

    pub async fn select_answer(
        &self,
        owner: &Session,
        id: &Uuid,
        option_index: usize,
    ) -> AppResult<AttemptView> {
        let attempt = self
            .repository
            .update_with(id, &mut |attempt| {
                require_owner(owner, &attempt.owner_id)?;
                attempt.session.select_answer(option_index)
            })
            .await?;
        Ok(AttemptView::from(&attempt))
    }

    pub async fn next(&self, owner: &Session, id: &Uuid) -> AppResult<NavigationResponse> {
        self.navigate(owner, id, |attempt| attempt.session.next())
            .await
    }

    pub async fn previous(&self, owner: &Session, id: &Uuid) -> AppResult<NavigationResponse> {
        self.navigate(owner, id, |attempt| attempt.session.previous())
            .await
    }

    async fn navigate(
        &self,
        owner: &Session,
        id: &Uuid,
        step: fn(&mut QuizAttempt) -> Advance,
    ) -> AppResult<NavigationResponse> {
        let mut outcome = Advance::Ignored;
        let attempt = self
            .repository
            .update_with(id, &mut |attempt| {
                require_owner(owner, &attempt.owner_id)?;
                outcome = step(attempt);
                Ok(())
            })
            .await?;

        if outcome == Advance::Completed {
            let score = attempt.session.score();
            log::info!(
                "Quiz attempt {} completed: {}/{}",
                attempt.id,
                score.correct_count,
                score.total
            );
        }

        Ok(NavigationResponse {
            outcome: outcome.into(),
            attempt: AttemptView::from(&attempt),
        })
    }

    pub async fn result(
        &self,
        owner: &Session,
        id: &Uuid,
        language: Language,
    ) -> AppResult<QuizResultView> {
        let attempt = self.owned_attempt(owner, id).await?;
        QuizResultView::build(&attempt, language)
            .ok_or_else(|| AppError::InvalidState("quiz is not completed yet".to_string()))
    }

    pub async fn export(&self, owner: &Session, id: &Uuid) -> AppResult<Vec<u8>> {
        let attempt = self.owned_attempt(owner, id).await?;
        if !attempt.session.is_completed() {
            return Err(AppError::InvalidState(
                "quiz is not completed yet".to_string(),
            ));
        }
        self.exporter.export(&attempt.session).await
    }

    pub async fn discard(&self, owner: &Session, id: &Uuid) -> AppResult<()> {
        self.owned_attempt(owner, id).await?;
        self.repository.delete(id).await?;
        log::info!("Discarded quiz attempt {}", id);
        Ok(())
    }

    /// Drops a user's attempts as soon as the identity provider reports a sign-out.
    pub fn spawn_sign_out_listener(
        self: &Arc<Self>,
        identity: &dyn IdentityProvider,
    ) -> JoinHandle<()> {
        let mut changes = identity.subscribe();
        let service = Arc::clone(self);

        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(SessionChange::SignedOut { user_id }) => {
                        match service.repository.delete_by_owner(&user_id).await {
                            Ok(count) if count > 0 => {
                                log::info!("Cleared {} attempt(s) after sign-out", count)
                            }
                            Ok(_) => {}
                            Err(e) => log::error!("Failed to clear attempts for {}: {}", user_id, e),
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Sign-out listener skipped {} session events", skipped)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        generation::backend::MockCompletionBackend,
        repositories::InMemoryQuizSessionRepository,
        test_utils::fixtures::{fenced_reply, long_text},
    };
    use chrono::Utc;
    use std::time::Duration;

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: format!("{}@example.com", user_id),
            expires_at: Utc::now(),
        }
    }

    fn service_with(mock: MockCompletionBackend) -> QuizService {
        QuizService::new(
            Arc::new(InMemoryQuizSessionRepository::new()),
            QuizGenerator::new(Arc::new(mock), Duration::from_secs(5)),
            GenerationProfile::Compact,
            200,
        )
    }

    fn replying(count: usize) -> MockCompletionBackend {
        let mut mock = MockCompletionBackend::new();
        mock.expect_complete()
            .returning(move |_| Ok(fenced_reply(count)));
        mock
    }

    fn request(text: String) -> GenerateQuizRequest {
        GenerateQuizRequest {
            text,
            profile: None,
        }
    }

    #[test]
    fn text_guard_checks_empty_then_length() {
        assert_eq!(check_text_input("   ", 200), Err(InputError::EmptyText));
        assert_eq!(
            check_text_input(&long_text(50), 200),
            Err(InputError::TextTooShort { min: 200 })
        );
        assert!(check_text_input(&long_text(200), 200).is_ok());
    }

    #[actix_rt::test]
    async fn short_text_never_reaches_generator() {
        let mut mock = MockCompletionBackend::new();
        mock.expect_complete().times(0);
        let service = service_with(mock);

        let err = service
            .start_quiz(&session("u1"), request(long_text(50)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidInput(InputError::TextTooShort { min: 200 })
        ));
    }

    #[actix_rt::test]
    async fn start_quiz_replaces_previous_attempt() {
        let service = service_with(replying(10));
        let owner = session("u1");

        let first = service
            .start_quiz(&owner, request(long_text(250)))
            .await
            .unwrap();
        let second = service
            .start_quiz(&owner, request(long_text(250)))
            .await
            .unwrap();

        assert_eq!(second.total_questions, 10);
        assert!(matches!(
            service.get_attempt(&owner, &first.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.get_attempt(&owner, &second.id).await.is_ok());
    }

    #[actix_rt::test]
    async fn attempts_are_private_to_their_owner() {
        let service = service_with(replying(3));
        let view = service
            .start_quiz(&session("u1"), request(long_text(250)))
            .await
            .unwrap();

        let intruder = session("u2");
        assert!(matches!(
            service.get_attempt(&intruder, &view.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(service.select_answer(&intruder, &view.id, 0).await.is_err());
        assert!(service.discard(&intruder, &view.id).await.is_err());
    }

    #[actix_rt::test]
    async fn full_run_produces_result_and_export() {
        // fenced_reply answers are i % 4
        let service = service_with(replying(3));
        let owner = session("u1");
        let view = service
            .start_quiz(&owner, request(long_text(250)))
            .await
            .unwrap();

        assert!(matches!(
            service.result(&owner, &view.id, Language::En).await,
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            service.export(&owner, &view.id).await,
            Err(AppError::InvalidState(_))
        ));

        for answer in [0, 1, 3] {
            service.select_answer(&owner, &view.id, answer).await.unwrap();
            service.next(&owner, &view.id).await.unwrap();
        }

        let result = service.result(&owner, &view.id, Language::En).await.unwrap();
        assert_eq!(result.score.correct_count, 2);
        assert_eq!(result.percentage_label, "66.67%");

        let pdf = service.export(&owner, &view.id).await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[actix_rt::test]
    async fn next_without_answer_is_ignored() {
        let service = service_with(replying(2));
        let owner = session("u1");
        let view = service
            .start_quiz(&owner, request(long_text(250)))
            .await
            .unwrap();

        let response = service.next(&owner, &view.id).await.unwrap();
        assert_eq!(
            response.outcome,
            crate::models::dto::response::NavigationOutcome::Ignored
        );
        assert_eq!(response.attempt.current_index, 0);
    }

    #[actix_rt::test]
    async fn sign_out_clears_attempts() {
        use crate::{auth::{JwtIdentityProvider, JwtService}, config::Config};

        let service = Arc::new(service_with(replying(2)));
        let identity = JwtIdentityProvider::new(JwtService::new(&Config::test_config().jwt_secret, 1));
        let listener = service.spawn_sign_out_listener(&identity);

        let token = identity.jwt().create_token("u1", "u1@example.com").unwrap();
        let owner = identity.current_session(&token).await.unwrap();
        let view = service
            .start_quiz(&owner, request(long_text(250)))
            .await
            .unwrap();

        identity.sign_out(&token).await.unwrap();

        let mut cleared = false;
        for _ in 0..50 {
            if service.get_attempt(&owner, &view.id).await.is_err() {
                cleared = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(cleared);
        listener.abort();
    }
}
