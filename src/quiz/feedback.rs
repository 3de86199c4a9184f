use serde::Serialize;

use crate::context::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    NeedsReview,
    Developing,
    Fair,
    Good,
    Excellent,
    Perfect,
}

#[derive(Debug)]
pub struct FeedbackTier {
    pub level: FeedbackLevel,
    lower: f64,
    lower_inclusive: bool,
    upper: f64,
    message_en: &'static str,
    message_ar: &'static str,
}

impl FeedbackTier {
    pub fn contains(&self, percentage: f64) -> bool {
        let above_lower = if self.lower_inclusive {
            percentage >= self.lower
        } else {
            percentage > self.lower
        };
        above_lower && percentage <= self.upper
    }

    pub fn message(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.message_en,
            Language::Ar => self.message_ar,
        }
    }
}

/// Six tiers that partition `[0, 100]`: `[0,20]`, `(20,40]`, `(40,60]`, `(60,80]`, `(80,99]`, `(99,100]`.
pub static FEEDBACK_TIERS: [FeedbackTier; 6] = [
    FeedbackTier {
        level: FeedbackLevel::NeedsReview,
        lower: 0.0,
        lower_inclusive: true,
        upper: 20.0,
        message_en: "Keep going! Review the material and try again.",
        message_ar: "استمر! راجع المادة وحاول مرة أخرى.",
    },
    FeedbackTier {
        level: FeedbackLevel::Developing,
        lower: 20.0,
        lower_inclusive: false,
        upper: 40.0,
        message_en: "You're getting started. A second read will help a lot.",
        message_ar: "بداية جيدة. قراءة ثانية ستساعدك كثيراً.",
    },
    FeedbackTier {
        level: FeedbackLevel::Fair,
        lower: 40.0,
        lower_inclusive: false,
        upper: 60.0,
        message_en: "Not bad! You understand some of the key ideas.",
        message_ar: "ليس سيئاً! أنت تفهم بعض الأفكار الرئيسية.",
    },
    FeedbackTier {
        level: FeedbackLevel::Good,
        lower: 60.0,
        lower_inclusive: false,
        upper: 80.0,
        message_en: "Good work! You have a solid grasp of the material.",
        message_ar: "عمل جيد! لديك فهم جيد للمادة.",
    },
    FeedbackTier {
        level: FeedbackLevel::Excellent,
        lower: 80.0,
        lower_inclusive: false,
        upper: 99.0,
        message_en: "Excellent! Just a few details to polish.",
        message_ar: "ممتاز! بقيت بعض التفاصيل فقط.",
    },
    FeedbackTier {
        level: FeedbackLevel::Perfect,
        lower: 99.0,
        lower_inclusive: false,
        upper: 100.0,
        message_en: "Perfect score! You've mastered this material.",
        message_ar: "علامة كاملة! لقد أتقنت هذه المادة.",
    },
];

/// Tier for a percentage. Out-of-range values are clamped into `[0, 100]`.
pub fn tier_for(percentage: f64) -> &'static FeedbackTier {
    let clamped = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };

    FEEDBACK_TIERS
        .iter()
        .find(|tier| tier.contains(clamped))
        .unwrap_or(&FEEDBACK_TIERS[0])
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
}

impl Feedback {
    pub fn for_percentage(percentage: f64, language: Language) -> Self {
        let tier = tier_for(percentage);
        Self {
            level: tier.level,
            message: tier.message(language).to_string(),
        }
    }
}
