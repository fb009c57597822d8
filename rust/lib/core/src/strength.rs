//! Password strength heuristic.

use serde::{Deserialize, Serialize};

/// Highest score [`score`] returns.
pub const MAX_SCORE: u8 = 3;

/// Visual state of the strength indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => StrengthLevel::Weak,
            2 => StrengthLevel::Medium,
            _ => StrengthLevel::Strong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLevel::Weak => "weak",
            StrengthLevel::Medium => "medium",
            StrengthLevel::Strong => "strong",
        }
    }
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score a candidate password in `0..=MAX_SCORE`.
///
/// One point each for: length >= 8, length >= 12, both ASCII lower and upper
/// case, an ASCII digit, any character outside `[a-zA-Z0-9]`.
pub fn score(password: &str) -> u8 {
    let len = password.chars().count();
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let points = [
        len >= 8,
        len >= 12,
        has_lower && has_upper,
        has_digit,
        has_symbol,
    ]
    .into_iter()
    .filter(|&hit| hit)
    .count() as u8;

    points.min(MAX_SCORE)
}

/// Indicator state for the given input. `None` hides the indicator.
pub fn indicator(password: &str) -> Option<StrengthLevel> {
    if password.is_empty() {
        None
    } else {
        Some(StrengthLevel::from_score(score(password)))
    }
}
