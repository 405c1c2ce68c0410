use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier; partitions the catalog, the decks and the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Position of the tier in per-tier arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Human-facing label shown on the wheel legend and question cards.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Makkelijk",
            Difficulty::Medium => "Gemiddeld",
            Difficulty::Hard => "Moeilijk",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {raw}")]
pub struct ParseDifficultyError {
    raw: String,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError { raw: s.to_owned() }),
        }
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id} has empty text")]
    EmptyText { id: QuestionId },

    #[error("question {id} has no difficulty")]
    MissingDifficulty { id: QuestionId },

    #[error("question {id} is {found} but was loaded into the {expected} tier")]
    TierMismatch {
        id: QuestionId,
        expected: Difficulty,
        found: Difficulty,
    },
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in catalog files and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub guidance: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft as a member of the given tier.
    ///
    /// A missing difficulty takes the tier; a declared one must match it.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for blank ids/text or a mismatched tier.
    pub fn validate_in(mut self, tier: Difficulty) -> Result<Question, QuestionError> {
        match self.difficulty {
            Some(found) if found != tier => {
                let id = QuestionId::new(self.id).map_err(|_| QuestionError::EmptyId)?;
                Err(QuestionError::TierMismatch {
                    id,
                    expected: tier,
                    found,
                })
            }
            _ => {
                self.difficulty = Some(tier);
                self.validate()
            }
        }
    }

    /// Validate a self-describing draft.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for blank ids/text or a missing difficulty.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = QuestionId::new(self.id).map_err(|_| QuestionError::EmptyId)?;

        let text = self.text.trim();
        if text.is_empty() {
            return Err(QuestionError::EmptyText { id });
        }
        let Some(difficulty) = self.difficulty else {
            return Err(QuestionError::MissingDifficulty { id });
        };

        Ok(Question {
            text: text.to_owned(),
            difficulty,
            category: self.category.trim().to_owned(),
            guidance: normalize_optional(self.guidance),
            tip: normalize_optional(self.tip),
            id,
        })
    }
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

/// An immutable discussion question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft")]
pub struct Question {
    id: QuestionId,
    text: String,
    difficulty: Difficulty,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    guidance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tip: Option<String>,
}

impl Question {
    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Facilitator guidance shown on request.
    #[must_use]
    pub fn guidance(&self) -> Option<&str> {
        self.guidance.as_deref()
    }

    #[must_use]
    pub fn tip(&self) -> Option<&str> {
        self.tip.as_deref()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
