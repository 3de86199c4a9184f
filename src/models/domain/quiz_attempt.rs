use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::quiz::{QuestionSet, QuizSession};

/// One user's run through a generated quiz. Lives only in memory.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub owner_id: String,
    pub session: QuizSession,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn new(owner_id: impl Into<String>, questions: QuestionSet) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            session: QuizSession::new(questions),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::question_set;

    #[test]
    fn new_attempt_starts_a_fresh_session() {
        let attempt = QuizAttempt::new("user-1", question_set(&[0, 1]));

        assert_eq!(attempt.owner_id, "user-1");
        assert_eq!(attempt.session.current_index(), 0);
        assert_eq!(attempt.created_at, attempt.modified_at);
    }

    #[test]
    fn touch_moves_modified_at_forward() {
        let mut attempt = QuizAttempt::new("user-1", question_set(&[0]));
        let created = attempt.created_at;

        attempt.touch();
        assert!(attempt.modified_at >= created);
    }
}
