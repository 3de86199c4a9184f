pub mod quiz_attempt;

pub use quiz_attempt::QuizAttempt;
