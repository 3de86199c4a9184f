use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyPrompt,

    #[error("expected {OPTION_COUNT} options, got {0}")]
    WrongOptionCount(usize),

    #[error("correct answer index {0} is outside 0..={max}", max = OPTION_COUNT - 1)]
    AnswerOutOfRange(i64),

    #[error("question set is empty")]
    EmptySet,
}

/// One multiple-choice item. Always has exactly four options and a correct answer in `0..4`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawQuestion")]
pub struct Question {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

/// The question shape as the model writes it, before any invariant is checked.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i64,
}

impl Question {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        Self::try_from(RawQuestion {
            question: question.into(),
            options,
            correct_answer: correct_answer as i64,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let question = raw.question.trim().to_string();
        if question.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if raw.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount(raw.options.len()));
        }
        if raw.correct_answer < 0 || raw.correct_answer >= OPTION_COUNT as i64 {
            return Err(QuestionError::AnswerOutOfRange(raw.correct_answer));
        }

        Ok(Question {
            question,
            options: raw.options,
            correct_answer: raw.correct_answer as usize,
        })
    }
}

/// The ordered, non-empty questions of one quiz attempt. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet(Vec<Question>);

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptySet);
        }
        Ok(Self(questions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for QuestionSet {
    type Output = Question;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["Paris", "Rome", "Madrid", "Berlin"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn question_deserializes_from_model_schema() {
        let json = r#"{
            "question": "What is the capital of France?",
            "options": ["Paris", "Rome", "Madrid", "Berlin"],
            "correctAnswer": 0
        }"#;

        let question: Question = serde_json::from_str(json).expect("question should parse");
        assert_eq!(question.question(), "What is the capital of France?");
        assert_eq!(question.options().len(), OPTION_COUNT);
        assert_eq!(question.correct_option(), "Paris");
    }

    #[test]
    fn question_serializes_with_camel_case_answer() {
        let question = Question::new("Capital?", options(), 2).unwrap();
        let value = serde_json::to_value(&question).unwrap();

        assert_eq!(value["correctAnswer"], 2);
        assert_eq!(value["options"][2], "Madrid");
    }

    #[test]
    fn question_rejects_wrong_option_count() {
        let err = Question::new("Capital?", vec!["Paris".into(), "Rome".into()], 0).unwrap_err();
        assert_eq!(err, QuestionError::WrongOptionCount(2));
    }

    #[test]
    fn question_rejects_out_of_range_answers() {
        assert_eq!(
            Question::new("Capital?", options(), 4).unwrap_err(),
            QuestionError::AnswerOutOfRange(4)
        );

        let json = r#"{"question": "Q", "options": ["a", "b", "c", "d"], "correctAnswer": -1}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn question_rejects_blank_prompt() {
        assert_eq!(
            Question::new("   ", options(), 0).unwrap_err(),
            QuestionError::EmptyPrompt
        );
    }

    #[test]
    fn question_set_must_not_be_empty() {
        assert_eq!(QuestionSet::new(vec![]).unwrap_err(), QuestionError::EmptySet);

        let set = QuestionSet::new(vec![Question::new("Q", options(), 1).unwrap()]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.last_index(), 0);
        assert_eq!(set[0].correct_answer(), 1);
    }
}
