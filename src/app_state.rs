use std::sync::Arc;

use crate::{
    auth::{IdentityProvider, JwtIdentityProvider, JwtService},
    config::Config,
    extraction::{DocumentLoader, LopdfLoader},
    generation::{CompletionBackend, HttpCompletionBackend, QuizGenerator},
    repositories::InMemoryQuizSessionRepository,
    services::{extraction_service::ExtractionService, quiz_service::QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub extraction_service: Arc<ExtractionService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Production wiring. Must be called inside a Tokio runtime: it starts the sign-out
    /// listener.
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(HttpCompletionBackend::from_config(&config));
        let identity = Arc::new(JwtIdentityProvider::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        )));

        log::info!(
            "Quiz generation via {} (model {}, {} profile)",
            backend.endpoint(),
            config.llm_model,
            config.quiz_profile
        );

        Self::from_parts(config, backend, Arc::new(LopdfLoader), identity)
    }

    pub fn from_parts(
        config: Config,
        backend: Arc<dyn CompletionBackend>,
        loader: Arc<dyn DocumentLoader>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let generator = QuizGenerator::new(backend, config.generation_timeout());
        let quiz_service = Arc::new(QuizService::new(
            Arc::new(InMemoryQuizSessionRepository::new()),
            generator,
            config.quiz_profile,
            config.min_text_chars,
        ));
        quiz_service.spawn_sign_out_listener(identity.as_ref());

        let extraction_service = Arc::new(ExtractionService::new(loader, &config));

        Self {
            quiz_service,
            extraction_service,
            identity,
            config: Arc::new(config),
        }
    }
}
