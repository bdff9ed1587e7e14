use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    auth::models::Identity,
    common::error::AppError,
    quiz::{
        db,
        feed::LiveQuiz,
        models::{QuestionBank, QuizState},
    },
    store::document_store::DocumentStore,
    system_log::{
        builder::SystemLogBuilder,
        models::{LogAction, LogSeverity},
    },
};

/// Answer to the "are you sure?" prompt in front of destructive actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Admin side of the live quiz: drives the shared quiz state and clears votes.
pub struct AdminQuizControl {
    store: Arc<dyn DocumentStore>,
    bank: QuestionBank,
    admin: Identity,
}

impl AdminQuizControl {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        bank: QuestionBank,
        admin: Identity,
    ) -> Result<Self, AppError> {
        if !admin.is_admin() {
            warn!("Guest {} tried to open quiz control", admin.voter_id());
            return Err(AppError::AccessDenied);
        }

        Ok(Self { store, bank, admin })
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Live state and tally, for the admin's own results panel.
    pub fn live(&self) -> LiveQuiz {
        LiveQuiz::open(self.store.clone(), self.bank.clone())
    }

    /// Stored state, normalized against the bank.
    pub async fn current_state(&self) -> Result<QuizState, AppError> {
        let state = db::get_quiz_state(self.store.as_ref()).await?;
        Ok(state.normalized(&self.bank))
    }

    /// Puts question `index` live with its answer hidden. Votes for earlier
    /// questions stay in the store.
    pub async fn select_question(&self, index: usize) -> Result<QuizState, AppError> {
        if !self.bank.contains(index) {
            return Err(AppError::Validation(format!(
                "Question {} does not exist",
                index + 1
            )));
        }

        let state = QuizState::showing(index);
        db::write_quiz_state(self.store.as_ref(), &state).await?;
        info!("Admin {} selected question {}", self.admin.voter_id(), index);
        Ok(state)
    }

    /// Reveals the answer of the active question. No-op without one.
    pub async fn reveal(&self) -> Result<QuizState, AppError> {
        let current = self.current_state().await?;
        let Some(index) = current.active_question_index else {
            info!("Reveal ignored, no active question");
            return Ok(current);
        };

        let state = QuizState::revealed(index);
        db::write_quiz_state(self.store.as_ref(), &state).await?;
        info!("Admin {} revealed question {}", self.admin.voter_id(), index);
        Ok(state)
    }

    pub async fn close(&self) -> Result<QuizState, AppError> {
        let state = QuizState::closed();
        db::write_quiz_state(self.store.as_ref(), &state).await?;
        info!("Admin {} closed the quiz", self.admin.voter_id());
        Ok(state)
    }

    /// Deletes every vote. Not atomic: on partial failure the deleted rows stay
    /// deleted and the failure is reported once with the number left behind.
    pub async fn clear_all_responses(&self, confirmation: Confirmation) -> Result<usize, AppError> {
        if confirmation != Confirmation::Confirmed {
            return Err(AppError::ConfirmationRequired);
        }

        let rows = db::list_responses(self.store.as_ref(), None).await?;
        let ids: Vec<String> = rows.into_iter().map(|row| row.id).collect();
        let total = ids.len();

        let outcome = db::delete_responses(self.store.as_ref(), &ids).await;

        let audit = SystemLogBuilder::new(self.store.clone())
            .subject(&self.admin)
            .action(LogAction::Delete)
            .function("clear_all_responses")
            .metadata(json!({ "total": total, "failed": outcome.failed.len() }));

        if !outcome.is_complete() {
            error!(
                "Cleared {} of {} quiz responses, {} failed",
                outcome.deleted,
                total,
                outcome.failed.len()
            );
            audit
                .severity(LogSeverity::Warning)
                .description("Bulk delete of quiz responses was only partially applied")
                .log_async();

            return Err(AppError::PartialDelete {
                failed: outcome.failed.len(),
                total,
            });
        }

        info!("Cleared all {} quiz responses", total);
        audit
            .description("Cleared all quiz responses")
            .log_async();

        Ok(outcome.deleted)
    }
}
