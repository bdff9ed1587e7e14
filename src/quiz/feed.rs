use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    common::error::AppError,
    quiz::{
        db,
        models::{OPTION_COUNT, Question, QuestionBank, QuizState},
        tally::Tally,
    },
    store::{
        document_store::{DocumentStore, Subscription},
        models::{Document, StoreError},
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSnapshot {
    pub state: QuizState,
    /// Present while a question is active.
    pub tally: Option<Tally>,
}

impl QuizSnapshot {
    fn closed() -> Self {
        Self {
            state: QuizState::closed(),
            tally: None,
        }
    }
}

enum Push {
    State(Option<Result<Option<Document>, StoreError>>),
    Responses(Option<Result<Vec<Document>, StoreError>>),
}

/// Quiz state plus the tally of the active question, kept current from two
/// store subscriptions.
///
/// The responses subscription follows the active question: when the index
/// changes the old listener is released, the tally is discarded and a listener
/// for the new question is opened.
pub struct LiveQuiz {
    store: Arc<dyn DocumentStore>,
    bank: QuestionBank,
    state_sub: Subscription<Option<Document>>,
    responses_sub: Option<Subscription<Vec<Document>>>,
    snapshot: QuizSnapshot,
}

impl LiveQuiz {
    pub fn open(store: Arc<dyn DocumentStore>, bank: QuestionBank) -> Self {
        let state_sub = db::subscribe_quiz_state(store.as_ref());
        Self {
            store,
            bank,
            state_sub,
            responses_sub: None,
            snapshot: QuizSnapshot::closed(),
        }
    }

    pub fn snapshot(&self) -> &QuizSnapshot {
        &self.snapshot
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.snapshot
            .state
            .active_question_index
            .and_then(|i| self.bank.question(i))
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Waits for the next push from either subscription and returns the
    /// updated snapshot. `None` once the store has closed the listeners.
    pub async fn next(&mut self) -> Option<Result<QuizSnapshot, AppError>> {
        let push = match self.responses_sub.as_mut() {
            Some(responses) => tokio::select! {
                state = self.state_sub.next() => Push::State(state),
                rows = responses.next() => Push::Responses(rows),
            },
            None => Push::State(self.state_sub.next().await),
        };

        let applied = match push {
            Push::State(Some(Ok(doc))) => self.apply_state(doc.as_ref()),
            Push::Responses(Some(Ok(rows))) => {
                self.apply_responses(&rows);
                Ok(())
            }
            Push::State(Some(Err(e))) | Push::Responses(Some(Err(e))) => Err(e.into()),
            Push::State(None) | Push::Responses(None) => return None,
        };

        Some(applied.map(|_| self.snapshot.clone()))
    }

    /// Drains pushes that are already delivered without waiting.
    pub fn poll_ready(&mut self) -> Result<bool, AppError> {
        let mut changed = false;

        while let Some(push) = self.state_sub.try_next() {
            self.apply_state(push?.as_ref())?;
            changed = true;
        }

        if let Some(responses) = self.responses_sub.as_mut() {
            let mut latest = None;
            while let Some(push) = responses.try_next() {
                latest = Some(push?);
            }
            if let Some(rows) = latest {
                self.apply_responses(&rows);
                changed = true;
            }
        }

        Ok(changed)
    }

    fn apply_state(&mut self, doc: Option<&Document>) -> Result<(), AppError> {
        let state = db::decode_quiz_state(doc)?.normalized(&self.bank);
        let previous = self.snapshot.state.active_question_index;
        self.snapshot.state = state;

        if previous == state.active_question_index {
            debug!("Quiz state refreshed: {:?}", state);
            return Ok(());
        }

        self.responses_sub = None;
        self.snapshot.tally = None;

        if let Some(index) = state.active_question_index {
            info!("Live quiz switched to question {}", index);
            self.responses_sub = Some(db::subscribe_responses(self.store.as_ref(), index));
            self.snapshot.tally = Some(Tally::empty(index, OPTION_COUNT));
        } else {
            info!("Live quiz closed");
        }

        Ok(())
    }

    fn apply_responses(&mut self, rows: &[Document]) {
        let Some(index) = self.snapshot.state.active_question_index else {
            return;
        };

        let votes = db::decode_responses(rows);
        let tally = Tally::from_responses(index, OPTION_COUNT, &votes);
        debug!(
            "Tally for question {} recomputed: {:?} ({} votes)",
            index,
            tally.counts(),
            tally.total()
        );
        self.snapshot.tally = Some(tally);
    }
}
