use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::constants::QUIZ_GENERATION_PROMPT;

/// How many questions to ask the model for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProfile {
    #[default]
    Compact,
    Extended,
}

impl GenerationProfile {
    pub fn question_count(self) -> usize {
        match self {
            GenerationProfile::Compact => 10,
            GenerationProfile::Extended => 15,
        }
    }
}

impl FromStr for GenerationProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(GenerationProfile::Compact),
            "extended" => Ok(GenerationProfile::Extended),
            other => Err(format!("unknown generation profile '{}'", other)),
        }
    }
}

impl fmt::Display for GenerationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationProfile::Compact => f.write_str("compact"),
            GenerationProfile::Extended => f.write_str("extended"),
        }
    }
}

/// Fills the template. The source text is embedded verbatim, so the same input always yields
/// the same prompt.
pub fn build_quiz_prompt(text: &str, question_count: usize) -> String {
    QUIZ_GENERATION_PROMPT
        .replace("{question_count}", &question_count.to_string())
        .replace("{text}", text)
}
