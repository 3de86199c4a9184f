use serde_json::Value;

use super::{fence::strip_code_fence, GenerationError};
use crate::quiz::{Question, QuestionSet, RawQuestion};

/// Turns raw model output into a validated question set.
///
/// Entries that do not satisfy the question invariant are dropped and logged. The call fails
/// only when the payload itself is malformed or nothing usable survives.
pub fn parse_questions(raw: &str) -> Result<QuestionSet, GenerationError> {
    let body = strip_code_fence(raw).trim();
    if body.is_empty() {
        return Err(GenerationError::NoContent);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| GenerationError::Parse(e.to_string()))?;

    let entries = value
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GenerationError::InvalidFormat("missing 'questions' array".to_string())
        })?;

    let total = entries.len();
    let questions: Vec<Question> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let parsed = serde_json::from_value::<RawQuestion>(entry.clone())
                .map_err(|e| e.to_string())
                .and_then(|raw| Question::try_from(raw).map_err(|e| e.to_string()));

            match parsed {
                Ok(question) => Some(question),
                Err(reason) => {
                    log::warn!("Dropping generated question {}: {}", index, reason);
                    None
                }
            }
        })
        .collect();

    if questions.len() < total {
        log::warn!("Kept {} of {} generated questions", questions.len(), total);
    }

    QuestionSet::new(questions)
        .map_err(|_| GenerationError::InvalidFormat("no valid questions in response".to_string()))
}
