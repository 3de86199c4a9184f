use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    feedback::Feedback,
    question::{Question, QuestionSet},
    score::ScoreResult,
};
use crate::{
    context::Language,
    errors::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InProgress,
    Completed,
}

/// What a navigation call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Completed,
    Ignored,
}

/// Sparse map of question index to selected option index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<usize, usize>);

impl AnswerRecord {
    pub fn record(&mut self, question_index: usize, option_index: usize) {
        self.0.insert(question_index, option_index);
    }

    pub fn get(&self, question_index: usize) -> Option<usize> {
        self.0.get(&question_index).copied()
    }

    pub fn is_answered(&self, question_index: usize) -> bool {
        self.0.contains_key(&question_index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub index: usize,
    pub question: String,
    pub selected_option: Option<String>,
    pub correct_option: String,
    pub is_correct: bool,
}

/// Answer tracking and navigation over one generated question set.
#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: QuestionSet,
    answers: AnswerRecord,
    current_index: usize,
    phase: Phase,
}

impl QuizSession {
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            questions,
            answers: AnswerRecord::default(),
            current_index: 0,
            phase: Phase::InProgress,
        }
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.answers.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index == self.questions.last_index()
    }

    /// Records `option_index` for the current question, replacing any earlier choice.
    pub fn select_answer(&mut self, option_index: usize) -> AppResult<()> {
        if self.is_completed() {
            return Err(AppError::InvalidState(
                "quiz is already completed".to_string(),
            ));
        }

        let options = self.current_question().options().len();
        if option_index >= options {
            return Err(AppError::ValidationError(format!(
                "option index {} is out of range (0..{})",
                option_index, options
            )));
        }

        self.answers.record(self.current_index, option_index);
        Ok(())
    }

    pub fn next(&mut self) -> Advance {
        if self.is_completed() || !self.answers.is_answered(self.current_index) {
            return Advance::Ignored;
        }

        if self.is_last_question() {
            self.phase = Phase::Completed;
            Advance::Completed
        } else {
            self.current_index += 1;
            Advance::Moved(self.current_index)
        }
    }

    pub fn previous(&mut self) -> Advance {
        if self.is_completed() || self.current_index == 0 {
            return Advance::Ignored;
        }

        self.current_index -= 1;
        Advance::Moved(self.current_index)
    }

    pub fn score(&self) -> ScoreResult {
        ScoreResult::compute(&self.questions, &self.answers)
    }

    /// Feedback for the final score. `None` while the quiz is still in progress.
    pub fn feedback(&self, language: Language) -> Option<Feedback> {
        if !self.is_completed() {
            return None;
        }
        Some(Feedback::for_percentage(self.score().percentage, language))
    }

    pub fn review(&self) -> Vec<ReviewItem> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = self.answers.get(index);
                ReviewItem {
                    index,
                    question: question.question().to_string(),
                    selected_option: selected
                        .and_then(|option| question.option(option))
                        .map(str::to_string),
                    correct_option: question.correct_option().to_string(),
                    is_correct: selected == Some(question.correct_answer()),
                }
            })
            .collect()
    }
}
