pub mod feedback;
pub mod question;
pub mod score;
pub mod session;

pub use feedback::{tier_for, Feedback, FeedbackLevel, FEEDBACK_TIERS};
pub use question::{Question, QuestionError, QuestionSet, RawQuestion, OPTION_COUNT};
pub use score::ScoreResult;
pub use session::{Advance, AnswerRecord, Phase, QuizSession, ReviewItem};
