use serde::Serialize;

use super::{question::QuestionSet, session::AnswerRecord};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub correct_count: usize,
    pub total: usize,
    pub percentage: f64,
}

impl ScoreResult {
    pub fn compute(questions: &QuestionSet, answers: &AnswerRecord) -> Self {
        let correct_count = questions
            .iter()
            .enumerate()
            .filter(|(index, question)| answers.get(*index) == Some(question.correct_answer()))
            .count();
        let total = questions.len();

        let percentage = if total == 0 {
            0.0
        } else {
            correct_count as f64 / total as f64 * 100.0
        };

        Self {
            correct_count,
            total,
            percentage,
        }
    }

    /// Percentage rounded for display, e.g. `66.67`.
    pub fn display_percentage(&self) -> String {
        let rounded = (self.percentage * 100.0).round() / 100.0;
        if rounded.fract() == 0.0 {
            format!("{:.0}", rounded)
        } else {
            format!("{:.2}", rounded)
        }
    }
}
