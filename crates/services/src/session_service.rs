use std::sync::Arc;

use tracing::{debug, warn};

use wheel_core::model::{Catalog, Difficulty, Question, QuestionId, SessionStats};
use wheel_core::{DeckManager, SessionState};

use crate::error::SessionServiceError;
use crate::persistence::SessionPersistence;

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Whether the selector wheel is currently turning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinState {
    #[default]
    Idle,
    Spinning,
}

/// Inputs from the selector and the facilitator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SpinStarted,
    SpinCompleted(Difficulty),
    Skip,
    MarkDone,
    Reset,
}

/// What handling an event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    SpinStarted,
    Drew(Question),
    MarkedDone { newly_marked: bool },
    Reset,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Drives one facilitation session: guards actions while a spin is in
/// flight and saves the session after every change.
pub struct SessionService {
    state: SessionState,
    spin: SpinState,
    persistence: SessionPersistence,
}

impl SessionService {
    /// Start a session over the given piles, restoring any saved history.
    pub async fn start(decks: DeckManager, persistence: SessionPersistence) -> Self {
        let mut state = SessionState::new(decks);
        if let Some(snapshot) = persistence.load().await {
            state.restore(snapshot);
        }
        Self {
            state,
            spin: SpinState::Idle,
            persistence,
        }
    }

    /// Build the piles for `catalog` (seeded when `seed` is given) and start a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Catalog` if a tier of the catalog is empty.
    pub async fn with_catalog(
        catalog: Arc<Catalog>,
        seed: Option<u64>,
        persistence: SessionPersistence,
    ) -> Result<Self, SessionServiceError> {
        let decks = match seed {
            Some(seed) => DeckManager::seeded(catalog, seed)?,
            None => DeckManager::new(catalog)?,
        };
        Ok(Self::start(decks, persistence).await)
    }

    /// Dispatch a single event.
    ///
    /// # Errors
    ///
    /// Returns the error of the operation the event maps to.
    pub async fn handle(&mut self, event: SessionEvent) -> Result<EventOutcome, SessionServiceError> {
        debug!(?event, spin = ?self.spin, "handling session event");
        match event {
            SessionEvent::SpinStarted => {
                self.begin_spin()?;
                Ok(EventOutcome::SpinStarted)
            }
            SessionEvent::SpinCompleted(tier) => {
                self.complete_spin(tier).await.map(EventOutcome::Drew)
            }
            SessionEvent::Skip => self.skip().await.map(EventOutcome::Drew),
            SessionEvent::MarkDone => self
                .mark_done()
                .await
                .map(|newly_marked| EventOutcome::MarkedDone { newly_marked }),
            SessionEvent::Reset => {
                self.reset().await;
                Ok(EventOutcome::Reset)
            }
        }
    }

    /// Mark a spin as in flight.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::SpinInFlight` if a spin is already running.
    pub fn begin_spin(&mut self) -> Result<(), SessionServiceError> {
        self.ensure_idle()?;
        self.spin = SpinState::Spinning;
        Ok(())
    }

    /// Consume the outcome of the running spin and draw from `tier`.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::NoSpinInFlight` if no spin was started.
    pub async fn complete_spin(
        &mut self,
        tier: Difficulty,
    ) -> Result<Question, SessionServiceError> {
        if self.spin != SpinState::Spinning {
            warn!(%tier, "spin outcome without a spin in flight");
            return Err(SessionServiceError::NoSpinInFlight);
        }
        self.spin = SpinState::Idle;

        let question = self.state.draw(tier).clone();
        self.persist().await;
        Ok(question)
    }

    /// Swap the current question for another of the same tier.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::SpinInFlight` during a spin and
    /// `SessionServiceError::Session` when nothing has been drawn.
    pub async fn skip(&mut self) -> Result<Question, SessionServiceError> {
        self.ensure_idle()?;
        let question = self.state.skip()?.clone();
        self.persist().await;
        Ok(question)
    }

    /// Mark the current question as discussed; `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::SpinInFlight` during a spin and
    /// `SessionServiceError::Session` when nothing has been drawn.
    pub async fn mark_done(&mut self) -> Result<bool, SessionServiceError> {
        self.ensure_idle()?;
        let newly_marked = self.state.mark_done()?;
        if newly_marked {
            self.persist().await;
        }
        Ok(newly_marked)
    }

    /// Wipe the session and drop the stored copy. A running spin keeps running.
    pub async fn reset(&mut self) {
        self.state.reset();
        self.persistence.clear().await;
    }

    // Accessors
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn spin_state(&self) -> SpinState {
        self.spin
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.state.current()
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.state.stats()
    }

    #[must_use]
    pub fn is_done(&self, id: &QuestionId) -> bool {
        self.state.is_done(id)
    }

    #[must_use]
    pub fn discussed(&self) -> &[Question] {
        self.state.discussed()
    }

    #[must_use]
    pub fn completion_rate(&self) -> u32 {
        self.state.completion_rate()
    }

    fn ensure_idle(&self) -> Result<(), SessionServiceError> {
        match self.spin {
            SpinState::Idle => Ok(()),
            SpinState::Spinning => Err(SessionServiceError::SpinInFlight),
        }
    }

    async fn persist(&self) {
        self.persistence.save(&self.state.snapshot()).await;
    }
}
