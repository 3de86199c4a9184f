pub mod quiz_session_repository;

pub use quiz_session_repository::{
    AttemptUpdate, InMemoryQuizSessionRepository, QuizSessionRepository,
};
