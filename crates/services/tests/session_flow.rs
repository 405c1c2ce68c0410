use std::sync::Arc;

use services::{
    EventOutcome, SessionEvent, SessionPersistence, SessionService, SessionServiceError, SpinState,
};
use storage::repository::InMemoryStore;
use wheel_core::SessionError;
use wheel_core::model::{Catalog, Difficulty, QuestionDraft};

fn drafts(prefix: &str, n: usize) -> Vec<QuestionDraft> {
    (1..=n)
        .map(|i| QuestionDraft {
            id: format!("{prefix}{i}"),
            text: format!("Vraag {prefix}{i}"),
            category: "Test".into(),
            ..QuestionDraft::default()
        })
        .collect()
}

fn small_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(drafts("e", 3), drafts("m", 2), drafts("h", 2)).unwrap())
}

async fn service(seed: u64) -> SessionService {
    let persistence = SessionPersistence::new(Arc::new(InMemoryStore::new()));
    SessionService::with_catalog(small_catalog(), Some(seed), persistence)
        .await
        .unwrap()
}

async fn spin_to(service: &mut SessionService, tier: Difficulty) -> EventOutcome {
    service.handle(SessionEvent::SpinStarted).await.unwrap();
    service
        .handle(SessionEvent::SpinCompleted(tier))
        .await
        .unwrap()
}

#[tokio::test]
async fn spin_draws_from_the_selected_tier() {
    let mut svc = service(1).await;
    let outcome = spin_to(&mut svc, Difficulty::Medium).await;

    let EventOutcome::Drew(question) = outcome else {
        panic!("expected a draw, got {outcome:?}");
    };
    assert_eq!(question.difficulty(), Difficulty::Medium);
    assert_eq!(svc.current(), Some(&question));
    assert_eq!(svc.stats().medium(), 1);
    assert_eq!(svc.spin_state(), SpinState::Idle);
}

#[tokio::test]
async fn actions_are_rejected_while_spinning() {
    let mut svc = service(2).await;
    spin_to(&mut svc, Difficulty::Easy).await;
    svc.handle(SessionEvent::SpinStarted).await.unwrap();

    let before = svc.stats();
    for event in [SessionEvent::Skip, SessionEvent::MarkDone, SessionEvent::SpinStarted] {
        let err = svc.handle(event).await.unwrap_err();
        assert!(matches!(err, SessionServiceError::SpinInFlight), "{event:?}");
    }
    assert_eq!(svc.stats(), before);
    assert!(svc.discussed().is_empty());
    assert_eq!(svc.spin_state(), SpinState::Spinning);
}

#[tokio::test]
async fn spin_outcome_without_spin_is_rejected() {
    let mut svc = service(3).await;
    let err = svc
        .handle(SessionEvent::SpinCompleted(Difficulty::Hard))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionServiceError::NoSpinInFlight));
    assert_eq!(svc.stats().total(), 0);
}

#[tokio::test]
async fn skip_and_mark_done_need_a_question() {
    let mut svc = service(4).await;
    let err = svc.handle(SessionEvent::Skip).await.unwrap_err();
    assert!(matches!(
        err,
        SessionServiceError::Session(SessionError::NoActiveQuestion)
    ));
    let err = svc.handle(SessionEvent::MarkDone).await.unwrap_err();
    assert!(matches!(
        err,
        SessionServiceError::Session(SessionError::NoActiveQuestion)
    ));
    assert_eq!(svc.stats().skipped(), 0);
}

#[tokio::test]
async fn skip_replaces_question_in_one_step() {
    let mut svc = service(5).await;
    spin_to(&mut svc, Difficulty::Hard).await;
    let first = svc.current().cloned().unwrap();

    let outcome = svc.handle(SessionEvent::Skip).await.unwrap();
    let EventOutcome::Drew(next) = outcome else {
        panic!("expected a draw, got {outcome:?}");
    };

    assert_eq!(next.difficulty(), Difficulty::Hard);
    assert_ne!(next.id(), first.id());
    assert_eq!(svc.stats().skipped(), 1);
    assert_eq!(svc.stats().total(), 2);
    assert_eq!(svc.stats().hard(), 2);
}

#[tokio::test]
async fn double_mark_done_counts_once() {
    let mut svc = service(6).await;
    spin_to(&mut svc, Difficulty::Easy).await;

    let first = svc.handle(SessionEvent::MarkDone).await.unwrap();
    let second = svc.handle(SessionEvent::MarkDone).await.unwrap();

    assert_eq!(first, EventOutcome::MarkedDone { newly_marked: true });
    assert_eq!(second, EventOutcome::MarkedDone { newly_marked: false });
    assert_eq!(svc.discussed().len(), 1);
    let id = svc.current().unwrap().id().clone();
    assert!(svc.is_done(&id));
}

#[tokio::test]
async fn completion_rate_of_one_in_four_is_25() {
    let mut svc = service(7).await;
    spin_to(&mut svc, Difficulty::Easy).await;
    svc.handle(SessionEvent::MarkDone).await.unwrap();
    for tier in [Difficulty::Medium, Difficulty::Hard, Difficulty::Easy] {
        spin_to(&mut svc, tier).await;
    }
    assert_eq!(svc.stats().total(), 4);
    assert_eq!(svc.completion_rate(), 25);
}

#[tokio::test]
async fn reset_during_spin_keeps_the_spin() {
    let mut svc = service(8).await;
    spin_to(&mut svc, Difficulty::Easy).await;
    svc.handle(SessionEvent::MarkDone).await.unwrap();
    svc.handle(SessionEvent::SpinStarted).await.unwrap();

    assert_eq!(
        svc.handle(SessionEvent::Reset).await.unwrap(),
        EventOutcome::Reset
    );
    assert_eq!(svc.stats().total(), 0);
    assert!(svc.current().is_none());
    assert!(svc.discussed().is_empty());
    assert_eq!(svc.spin_state(), SpinState::Spinning);

    spin_outcome_lands(&mut svc).await;
}

async fn spin_outcome_lands(svc: &mut SessionService) {
    svc.handle(SessionEvent::SpinCompleted(Difficulty::Medium))
        .await
        .unwrap();
    assert_eq!(svc.stats().total(), 1);
    assert_eq!(svc.spin_state(), SpinState::Idle);
}

#[tokio::test]
async fn totals_stay_consistent_over_a_long_session() {
    let mut svc = service(9).await;
    for round in 0..40 {
        spin_to(&mut svc, Difficulty::ALL[round % 3]).await;
        if round % 3 == 0 {
            svc.handle(SessionEvent::Skip).await.unwrap();
        }
        if round % 5 == 0 {
            svc.handle(SessionEvent::MarkDone).await.unwrap();
        }
        let stats = svc.stats();
        assert_eq!(stats.total(), stats.easy() + stats.medium() + stats.hard());
        assert!(stats.total() >= stats.skipped());
    }
}
