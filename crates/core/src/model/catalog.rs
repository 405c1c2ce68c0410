use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Difficulty, Question, QuestionDraft, QuestionError};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("the {0} tier has no questions")]
    EmptyCatalog(Difficulty),

    #[error("question id {0} appears more than once")]
    DuplicateId(QuestionId),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error("catalog could not be parsed: {0}")]
    Parse(String),
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    easy: Vec<QuestionDraft>,
    #[serde(default)]
    medium: Vec<QuestionDraft>,
    #[serde(default)]
    hard: Vec<QuestionDraft>,
}

/// The full, validated question set, one non-empty list per tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tiers: [Vec<Question>; 3],
    by_id: HashMap<QuestionId, (Difficulty, usize)>,
}

impl Catalog {
    /// Validate three tier lists into a catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCatalog` for an empty tier,
    /// `CatalogError::DuplicateId` when an id repeats (also across tiers),
    /// and `CatalogError::Question` for invalid entries.
    pub fn new(
        easy: Vec<QuestionDraft>,
        medium: Vec<QuestionDraft>,
        hard: Vec<QuestionDraft>,
    ) -> Result<Self, CatalogError> {
        let mut tiers: [Vec<Question>; 3] = Default::default();
        let mut by_id = HashMap::new();

        for (tier, drafts) in Difficulty::ALL.into_iter().zip([easy, medium, hard]) {
            if drafts.is_empty() {
                return Err(CatalogError::EmptyCatalog(tier));
            }
            let questions = &mut tiers[tier.index()];
            for draft in drafts {
                let question = draft.validate_in(tier)?;
                if by_id.contains_key(question.id()) {
                    return Err(CatalogError::DuplicateId(question.id().clone()));
                }
                by_id.insert(question.id().clone(), (tier, questions.len()));
                questions.push(question);
            }
        }

        Ok(Self { tiers, by_id })
    }

    /// Parse and validate a JSON catalog of the form
    /// `{"easy": [..], "medium": [..], "hard": [..]}`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, otherwise the same
    /// errors as [`Catalog::new`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(raw).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::new(file.easy, file.medium, file.hard)
    }

    /// The question set bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data is itself invalid.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    #[must_use]
    pub fn tier(&self, tier: Difficulty) -> &[Question] {
        &self.tiers[tier.index()]
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Question> {
        let (tier, idx) = self.by_id.get(id)?;
        self.tiers[tier.index()].get(*idx)
    }

    /// Total number of questions across all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
