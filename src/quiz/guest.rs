use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    auth::models::Identity,
    common::error::AppError,
    quiz::{
        db,
        models::{OPTION_COUNT, Question, QuestionBank, QuizState, VoteResponse},
    },
    store::{
        document_store::{DocumentStore, Subscription},
        models::{Document, StoreError},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteStatus {
    NotVoted,
    Voted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Recorded,
    /// The session had already voted; nothing was written.
    Ignored,
    /// The store already holds a vote from this guest for the question.
    Duplicate,
}

/// One guest's view of the live quiz.
///
/// `NotVoted -> Voted` per question. A change of the active question always
/// starts over at `NotVoted`.
pub struct GuestQuizSession {
    store: Arc<dyn DocumentStore>,
    bank: QuestionBank,
    identity: Option<Identity>,
    state: QuizState,
    status: VoteStatus,
    selection: Option<usize>,
    notice: Option<String>,
}

impl GuestQuizSession {
    pub fn new(store: Arc<dyn DocumentStore>, bank: QuestionBank, identity: Option<Identity>) -> Self {
        Self {
            store,
            bank,
            identity,
            state: QuizState::closed(),
            status: VoteStatus::NotVoted,
            selection: None,
            notice: None,
        }
    }

    pub fn subscribe(&self) -> Subscription<Option<Document>> {
        db::subscribe_quiz_state(self.store.as_ref())
    }

    /// Applies the next pushed quiz state. `None` once the listener is closed.
    pub async fn sync(
        &mut self,
        subscription: &mut Subscription<Option<Document>>,
    ) -> Option<Result<(), AppError>> {
        let push = subscription.next().await?;
        Some(self.apply_push(push))
    }

    pub fn apply_push(&mut self, push: Result<Option<Document>, StoreError>) -> Result<(), AppError> {
        match push.and_then(|doc| db::decode_quiz_state(doc.as_ref())) {
            Ok(state) => {
                self.apply_state(state);
                Ok(())
            }
            Err(e) => {
                warn!("Guest quiz listener failed: {}", e);
                self.notice = Some("Lost connection to the quiz.".into());
                Err(e.into())
            }
        }
    }

    pub fn apply_state(&mut self, state: QuizState) {
        let state = state.normalized(&self.bank);
        if state.active_question_index != self.state.active_question_index {
            debug!(
                "Active question changed {:?} -> {:?}, resetting vote",
                self.state.active_question_index, state.active_question_index
            );
            self.status = VoteStatus::NotVoted;
            self.selection = None;
            self.notice = None;
        }
        self.state = state;
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn status(&self) -> VoteStatus {
        self.status
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn active_question(&self) -> Option<&Question> {
        self.state
            .active_question_index
            .and_then(|i| self.bank.question(i))
    }

    pub fn can_vote(&self) -> bool {
        self.status == VoteStatus::NotVoted
            && self.identity.is_some()
            && self.state.active_question_index.is_some()
    }

    /// Records one vote for the active question.
    ///
    /// On a failed write the session goes back to `NotVoted` with no selection
    /// so the guest can try again.
    pub async fn cast_vote(&mut self, option: usize) -> Result<VoteOutcome, AppError> {
        if self.status == VoteStatus::Voted {
            return Ok(VoteOutcome::Ignored);
        }

        let identity = self.identity.as_ref().ok_or(AppError::Unauthenticated)?;
        let question_index = self
            .state
            .active_question_index
            .ok_or_else(|| AppError::Validation("No quiz question is live right now.".into()))?;

        if option >= OPTION_COUNT {
            return Err(AppError::Validation(format!(
                "Option {} does not exist",
                option + 1
            )));
        }

        let vote = VoteResponse::new(question_index, option, identity.voter_id());
        self.selection = Some(option);
        self.status = VoteStatus::Voted;
        self.notice = Some("Sending your vote...".into());

        match db::submit_vote(self.store.as_ref(), &vote).await {
            Ok(()) => {
                info!(
                    "Guest {} voted {} on question {}",
                    vote.voter_id, option, question_index
                );
                self.notice = Some("Vote recorded!".into());
                Ok(VoteOutcome::Recorded)
            }
            Err(StoreError::AlreadyExists(_)) => {
                info!(
                    "Guest {} already voted on question {}",
                    vote.voter_id, question_index
                );
                self.selection = None;
                self.notice = Some("You already voted on this question.".into());
                Ok(VoteOutcome::Duplicate)
            }
            Err(e) => {
                warn!("Failed to record vote: {}", e);
                self.status = VoteStatus::NotVoted;
                self.selection = None;
                let err = AppError::from(e);
                self.notice = Some(err.user_message());
                Err(err)
            }
        }
    }
}
