use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::deck::DeckManager;
use crate::model::{Difficulty, Question, QuestionId, SessionSnapshot, SessionStats};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question has been drawn yet")]
    NoActiveQuestion,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Everything a running facilitation session owns: the draw piles, the
/// counters, the discussed questions and the question on the table.
#[derive(Debug, Clone)]
pub struct SessionState {
    decks: DeckManager,
    stats: SessionStats,
    done: HashSet<QuestionId>,
    discussed: Vec<Question>,
    current: Option<Question>,
}

impl SessionState {
    #[must_use]
    pub fn new(decks: DeckManager) -> Self {
        Self {
            decks,
            stats: SessionStats::default(),
            done: HashSet::new(),
            discussed: Vec::new(),
            current: None,
        }
    }

    /// Put `question` on the table and count it as a draw for `tier`.
    pub fn record_draw(&mut self, tier: Difficulty, question: Question) {
        self.put_current(tier, question);
    }

    /// Draw from the `tier` pile and record it.
    pub fn draw(&mut self, tier: Difficulty) -> &Question {
        let question = self.decks.draw(tier);
        self.put_current(tier, question)
    }

    /// Replace the current question with another one of the same tier.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveQuestion` before the first draw; the
    /// state is left untouched.
    pub fn skip(&mut self) -> Result<&Question, SessionError> {
        let tier = self
            .current
            .as_ref()
            .map(Question::difficulty)
            .ok_or(SessionError::NoActiveQuestion)?;

        self.stats.record_skip();
        Ok(self.draw(tier))
    }

    /// Mark the current question as discussed.
    ///
    /// Returns `false` if it was already marked.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveQuestion` before the first draw.
    pub fn mark_done(&mut self) -> Result<bool, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoActiveQuestion)?;
        if !self.done.insert(current.id().clone()) {
            return Ok(false);
        }
        self.discussed.push(current.clone());
        Ok(true)
    }

    /// Wipe the session and reshuffle every pile.
    pub fn reset(&mut self) {
        self.stats = SessionStats::default();
        self.done.clear();
        self.discussed.clear();
        self.current = None;
        self.decks.reset();
        info!("session reset");
    }

    /// Percentage of draws that ended up discussed, rounded half up.
    #[must_use]
    pub fn completion_rate(&self) -> u32 {
        let total = u64::from(self.stats.total());
        if total == 0 {
            return 0;
        }
        let discussed = self.discussed.len() as u64;
        let rate = (discussed * 200 + total) / (2 * total);
        u32::try_from(rate).unwrap_or(u32::MAX)
    }

    // Accessors
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn is_done(&self, id: &QuestionId) -> bool {
        self.done.contains(id)
    }

    /// Discussed questions in the order they were marked.
    #[must_use]
    pub fn discussed(&self) -> &[Question] {
        &self.discussed
    }

    #[must_use]
    pub fn decks(&self) -> &DeckManager {
        &self.decks
    }

    /// The persistable part of the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stats: self.stats,
            session_done: self.discussed.iter().map(|q| q.id().clone()).collect(),
            discussed_questions: self.discussed.clone(),
        }
    }

    /// Replace stats and discussed questions with a persisted snapshot.
    ///
    /// `discussed_questions` is authoritative; duplicates are dropped. Ids in
    /// `session_done` without a record are looked up in the catalog and
    /// appended, and unknown ids are ignored, so the done set and the
    /// discussed list always agree. The current question is cleared.
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        let SessionSnapshot {
            stats,
            session_done,
            discussed_questions,
        } = snapshot;

        self.done.clear();
        self.discussed.clear();
        for question in discussed_questions {
            if self.done.insert(question.id().clone()) {
                self.discussed.push(question);
            }
        }
        for id in session_done {
            if self.done.contains(&id) {
                continue;
            }
            match self.decks.catalog().find(id.as_str()) {
                Some(question) => {
                    self.discussed.push(question.clone());
                    self.done.insert(id);
                }
                None => debug!(%id, "dropping unknown done id"),
            }
        }

        self.stats = stats;
        self.current = None;
        info!(
            total = self.stats.total(),
            discussed = self.discussed.len(),
            "session restored"
        );
    }

    fn put_current(&mut self, tier: Difficulty, question: Question) -> &Question {
        debug_assert_eq!(question.difficulty(), tier);
        self.stats.record_draw(tier);
        self.current.insert(question)
    }
}
