/// Template for quiz generation. `{question_count}` and `{text}` are substituted before sending.
pub const QUIZ_GENERATION_PROMPT: &str = r#"Based on the following text, create {question_count} multiple-choice questions with 4 options each. Format the response as a JSON object with a 'questions' array where each question object has the following structure:
    {
      "question": "The question text",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": 0
    }

    Text: {text}

    Remember to:
    0. Only respond with the JSON object, starting with "{" and ending with "}". Do not add any commentary.
    1. Make questions that test understanding, not just memorization
    2. Ensure all options are plausible
    3. Distribute correct answers evenly across the four positions
    4. Keep questions clear and concise
    5. "correctAnswer" is the 0-based index of the correct option, a number between 0 and 3
    6. If the language of the text is not English, write the questions and options in the same language as the text (e.g. Arabic text, Arabic answers)"#;
