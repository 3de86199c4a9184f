use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    context::Language,
    models::domain::QuizAttempt,
    quiz::{Advance, Feedback, Phase, ReviewItem, ScoreResult},
};

/// The current question as the client may see it: no correct answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub id: Uuid,
    pub phase: Phase,
    pub current_index: usize,
    pub total_questions: usize,
    pub answered_count: usize,
    pub is_last_question: bool,
    pub question: QuestionView,
    pub selected_answer: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&QuizAttempt> for AttemptView {
    fn from(attempt: &QuizAttempt) -> Self {
        let session = &attempt.session;
        let current = session.current_question();

        AttemptView {
            id: attempt.id,
            phase: session.phase(),
            current_index: session.current_index(),
            total_questions: session.questions().len(),
            answered_count: session.answers().len(),
            is_last_question: session.is_last_question(),
            question: QuestionView {
                question: current.question().to_string(),
                options: current.options().to_vec(),
            },
            selected_answer: session.selected_answer(),
            created_at: attempt.created_at,
            modified_at: attempt.modified_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOutcome {
    Moved,
    Completed,
    Ignored,
}

impl From<Advance> for NavigationOutcome {
    fn from(advance: Advance) -> Self {
        match advance {
            Advance::Moved(_) => NavigationOutcome::Moved,
            Advance::Completed => NavigationOutcome::Completed,
            Advance::Ignored => NavigationOutcome::Ignored,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub outcome: NavigationOutcome,
    pub attempt: AttemptView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultView {
    pub id: Uuid,
    pub score: ScoreResult,
    pub percentage_label: String,
    pub feedback: Feedback,
    pub review: Vec<ReviewItem>,
}

impl QuizResultView {
    /// `None` until the attempt is completed.
    pub fn build(attempt: &QuizAttempt, language: Language) -> Option<Self> {
        let session = &attempt.session;
        let feedback = session.feedback(language)?;
        let score = session.score();

        Some(QuizResultView {
            id: attempt.id,
            percentage_label: format!("{}%", score.display_percentage()),
            score,
            feedback,
            review: session.review(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTextResponse {
    pub text: String,
    pub characters: usize,
}

impl ExtractedTextResponse {
    pub fn new(text: String) -> Self {
        Self {
            characters: text.chars().count(),
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
