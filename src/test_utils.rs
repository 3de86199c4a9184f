#[cfg(test)]
pub mod fixtures {
    use std::{thread, time::Duration};

    use crate::{
        extraction::{DocumentLoader, PageSource},
        quiz::{Question, QuestionSet},
    };

    /// In-memory document loader with scripted page results.
    #[derive(Clone, Debug, Default)]
    pub struct FakeLoader {
        pages: Vec<Result<String, String>>,
        open_error: Option<String>,
        panic_on_page: Option<usize>,
        page_delay: Duration,
    }

    impl FakeLoader {
        pub fn new(pages: Vec<Result<String, String>>) -> Self {
            Self {
                pages,
                ..Self::default()
            }
        }

        pub fn with_pages(pages: &[&str]) -> Self {
            Self::new(pages.iter().map(|p| Ok(p.to_string())).collect())
        }

        pub fn failing(reason: &str) -> Self {
            Self {
                open_error: Some(reason.to_string()),
                ..Self::default()
            }
        }

        pub fn panicking_on_page(page: usize, pages: &[&str]) -> Self {
            Self {
                panic_on_page: Some(page),
                ..Self::with_pages(pages)
            }
        }

        pub fn with_page_delay(mut self, delay: Duration) -> Self {
            self.page_delay = delay;
            self
        }
    }

    struct FakePages(FakeLoader);

    impl PageSource for FakePages {
        fn page_count(&self) -> usize {
            self.0.pages.len()
        }

        fn page_text(&mut self, number: usize) -> Result<String, String> {
            if !self.0.page_delay.is_zero() {
                thread::sleep(self.0.page_delay);
            }
            if self.0.panic_on_page == Some(number) {
                panic!("decoder blew up on page {}", number);
            }
            self.0.pages[number - 1].clone()
        }
    }

    impl DocumentLoader for FakeLoader {
        fn open(&self, _bytes: Vec<u8>) -> Result<Box<dyn PageSource>, String> {
            match &self.open_error {
                Some(reason) => Err(reason.clone()),
                None => Ok(Box::new(FakePages(self.clone()))),
            }
        }
    }

    /// Builds a question set whose correct answers are `correct`.
    pub fn question_set(correct: &[usize]) -> QuestionSet {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, answer)| {
                Question::new(
                    format!("Question {}", i + 1),
                    vec![
                        "Option A".to_string(),
                        "Option B".to_string(),
                        "Option C".to_string(),
                        "Option D".to_string(),
                    ],
                    *answer,
                )
                .expect("fixture question is valid")
            })
            .collect();
        QuestionSet::new(questions).expect("fixture set is not empty")
    }

    /// A model reply wrapped in a json fence, with `count` valid questions.
    pub fn fenced_reply(count: usize) -> String {
        let questions: Vec<_> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "question": format!("Generated question {}", i + 1),
                    "options": ["w", "x", "y", "z"],
                    "correctAnswer": i % 4,
                })
            })
            .collect();
        format!(
            "```json\n{}\n```",
            serde_json::json!({ "questions": questions })
        )
    }

    pub fn long_text(chars: usize) -> String {
        "abcdefghij ".chars().cycle().take(chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::generation::parse_questions;

    #[test]
    fn test_fixtures_question_set() {
        let set = question_set(&[1, 0, 0]);
        assert_eq!(set.len(), 3);
        assert_eq!(set[0].correct_option(), "Option B");
    }

    #[test]
    fn test_fixtures_fenced_reply_parses() {
        let set = parse_questions(&fenced_reply(10)).unwrap();
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_fixtures_long_text() {
        assert_eq!(long_text(250).chars().count(), 250);
    }
}
