use serde::Deserialize;
use validator::Validate;

use crate::generation::GenerationProfile;

/// Upper bound on submitted text; anything larger would not fit a prompt anyway.
pub const MAX_TEXT_CHARS: u64 = 100_000;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[validate(length(max = MAX_TEXT_CHARS, message = "Text is too long"))]
    pub text: String,

    #[serde(default)]
    pub profile: Option<GenerationProfile>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAnswerRequest {
    pub option_index: usize,
}
