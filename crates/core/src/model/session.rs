use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Difficulty, Question, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStatsError {
    #[error("total draws ({total}) does not match tier counts ({sum})")]
    CountMismatch { total: u32, sum: u32 },

    #[error("skipped ({skipped}) exceeds total draws ({total})")]
    TooManySkips { skipped: u32, total: u32 },
}

#[derive(Debug, Deserialize)]
struct PersistedStats {
    easy: u32,
    medium: u32,
    hard: u32,
    total: u32,
    skipped: u32,
}

/// Draw counters for a facilitation session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedStats")]
pub struct SessionStats {
    easy: u32,
    medium: u32,
    hard: u32,
    total: u32,
    skipped: u32,
}

impl TryFrom<PersistedStats> for SessionStats {
    type Error = SessionStatsError;

    fn try_from(raw: PersistedStats) -> Result<Self, Self::Error> {
        Self::from_persisted(raw.easy, raw.medium, raw.hard, raw.total, raw.skipped)
    }
}

impl SessionStats {
    /// Rehydrate counters from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionStatsError::CountMismatch` if totals do not align and
    /// `SessionStatsError::TooManySkips` if more skips than draws are recorded.
    pub fn from_persisted(
        easy: u32,
        medium: u32,
        hard: u32,
        total: u32,
        skipped: u32,
    ) -> Result<Self, SessionStatsError> {
        let sum = easy.saturating_add(medium).saturating_add(hard);
        if sum != total {
            return Err(SessionStatsError::CountMismatch { total, sum });
        }
        if skipped > total {
            return Err(SessionStatsError::TooManySkips { skipped, total });
        }

        Ok(Self {
            easy,
            medium,
            hard,
            total,
            skipped,
        })
    }

    /// Count one draw for `tier`.
    pub fn record_draw(&mut self, tier: Difficulty) {
        match tier {
            Difficulty::Easy => self.easy = self.easy.saturating_add(1),
            Difficulty::Medium => self.medium = self.medium.saturating_add(1),
            Difficulty::Hard => self.hard = self.hard.saturating_add(1),
        }
        self.total = self.total.saturating_add(1);
    }

    pub fn record_skip(&mut self) {
        self.skipped = self.skipped.saturating_add(1);
    }

    #[must_use]
    pub fn count(&self, tier: Difficulty) -> u32 {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    #[must_use]
    pub fn easy(&self) -> u32 {
        self.easy
    }

    #[must_use]
    pub fn medium(&self) -> u32 {
        self.medium
    }

    #[must_use]
    pub fn hard(&self) -> u32 {
        self.hard
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.skipped
    }
}

/// The persisted part of a session. Decks are never included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub stats: SessionStats,
    pub session_done: Vec<QuestionId>,
    pub discussed_questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_draw_keeps_total_in_sync() {
        let mut stats = SessionStats::default();
        stats.record_draw(Difficulty::Easy);
        stats.record_draw(Difficulty::Hard);
        stats.record_draw(Difficulty::Hard);
        stats.record_skip();

        assert_eq!(stats.total(), 3);
        assert_eq!(stats.count(Difficulty::Hard), 2);
        assert_eq!(stats.skipped(), 1);
    }

    #[test]
    fn from_persisted_rejects_mismatched_total() {
        let err = SessionStats::from_persisted(1, 1, 1, 4, 0).unwrap_err();
        assert_eq!(err, SessionStatsError::CountMismatch { total: 4, sum: 3 });
    }

    #[test]
    fn from_persisted_rejects_excess_skips() {
        let err = SessionStats::from_persisted(1, 0, 0, 1, 2).unwrap_err();
        assert_eq!(err, SessionStatsError::TooManySkips { skipped: 2, total: 1 });
    }

    #[test]
    fn stats_deserialize_validates() {
        let ok: SessionStats = serde_json::from_str(
            r#"{"easy":2,"medium":1,"hard":0,"total":3,"skipped":1}"#,
        )
        .unwrap();
        assert_eq!(ok.total(), 3);

        let bad = serde_json::from_str::<SessionStats>(
            r#"{"easy":2,"medium":1,"hard":0,"total":9,"skipped":1}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let json = serde_json::to_value(SessionSnapshot::default()).unwrap();
        assert!(json.get("sessionDone").is_some());
        assert!(json.get("discussedQuestions").is_some());
        assert_eq!(json["stats"]["skipped"], 0);
    }
}
