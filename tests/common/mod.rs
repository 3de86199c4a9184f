#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use quizforge::{
    app_state::AppState,
    auth::{IdentityProvider, JwtIdentityProvider, JwtService},
    config::Config,
    extraction::{DocumentLoader, PageSource},
    generation::{CompletionBackend, GenerationError},
};

/// Replies with a fixed string and counts how often it was asked.
pub struct ScriptedBackend {
    reply: Result<String, GenerationError>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn replying(reply: String) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: GenerationError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// A document whose pages are given up front; `Err` entries fail that page.
#[derive(Clone)]
pub struct ScriptedLoader {
    pages: Vec<Result<String, String>>,
}

impl ScriptedLoader {
    pub fn new(pages: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self { pages })
    }
}

struct ScriptedPages(Vec<Result<String, String>>);

impl PageSource for ScriptedPages {
    fn page_count(&self) -> usize {
        self.0.len()
    }

    fn page_text(&mut self, number: usize) -> Result<String, String> {
        self.0[number - 1].clone()
    }
}

impl DocumentLoader for ScriptedLoader {
    fn open(&self, _bytes: Vec<u8>) -> Result<Box<dyn PageSource>, String> {
        Ok(Box::new(ScriptedPages(self.pages.clone())))
    }
}

/// A fence-wrapped model reply whose correct answers are `answers`.
pub fn reply_with_answers(answers: &[usize]) -> String {
    let questions: Vec<_> = answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            serde_json::json!({
                "question": format!("Question {}", i + 1),
                "options": ["A", "B", "C", "D"],
                "correctAnswer": answer,
            })
        })
        .collect();
    format!("```json\n{}\n```", serde_json::json!({ "questions": questions }))
}

pub fn long_text(chars: usize) -> String {
    "the quick brown fox ".chars().cycle().take(chars).collect()
}

pub fn test_config() -> Config {
    Config {
        generation_timeout_secs: 5,
        extraction_timeout_secs: 5,
        ..Config::default()
    }
}

pub struct TestContext {
    pub state: AppState,
    pub jwt: JwtService,
    pub backend: Arc<ScriptedBackend>,
}

impl TestContext {
    pub fn new(backend: Arc<ScriptedBackend>, loader: Arc<ScriptedLoader>) -> Self {
        Self::with_config(backend, loader, test_config())
    }

    pub fn with_config(
        backend: Arc<ScriptedBackend>,
        loader: Arc<ScriptedLoader>,
        config: Config,
    ) -> Self {
        let identity: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(
            JwtService::new(&config.jwt_secret, 1),
        ));
        let jwt = JwtService::new(&config.jwt_secret, 1);
        let state = AppState::from_parts(config, backend.clone(), loader, identity);
        Self {
            state,
            jwt,
            backend,
        }
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.jwt
            .create_token(user_id, &format!("{}@example.com", user_id))
            .expect("token is created")
    }
}
