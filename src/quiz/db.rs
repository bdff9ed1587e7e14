use tracing::{debug, warn};

use crate::{
    quiz::models::{QuizState, VoteResponse},
    store::{
        document_store::{DocumentStore, Subscription},
        models::{BatchOutcome, DocPath, Document, Query, StoreError, to_fields},
    },
};

pub const QUIZ_COLLECTION: &str = "quiz";
pub const QUIZ_STATE_ID: &str = "state";
pub const RESPONSES_COLLECTION: &str = "quiz_responses";

pub fn quiz_state_path() -> DocPath {
    DocPath::new(QUIZ_COLLECTION, QUIZ_STATE_ID)
}

pub fn responses_for(question_index: usize) -> Query {
    Query::new().where_eq("questionIndex", question_index)
}

/// A missing document reads as a closed quiz.
pub fn decode_quiz_state(doc: Option<&Document>) -> Result<QuizState, StoreError> {
    match doc {
        Some(doc) => doc.decode(),
        None => Ok(QuizState::closed()),
    }
}

/// Keeps the rows that decode as votes. Foreign rows are skipped.
pub fn decode_responses(rows: &[Document]) -> Vec<VoteResponse> {
    rows.iter()
        .filter_map(|row| match row.decode::<VoteResponse>() {
            Ok(vote) => Some(vote),
            Err(e) => {
                warn!("Skipping malformed response {}: {}", row.id, e);
                None
            }
        })
        .collect()
}

pub async fn get_quiz_state(store: &dyn DocumentStore) -> Result<QuizState, StoreError> {
    let doc = store.get(&quiz_state_path()).await?;
    decode_quiz_state(doc.as_ref())
}

pub async fn write_quiz_state(store: &dyn DocumentStore, state: &QuizState) -> Result<(), StoreError> {
    debug!("Writing quiz state: {:?}", state);
    store.set(&quiz_state_path(), to_fields(state)?).await
}

pub fn subscribe_quiz_state(store: &dyn DocumentStore) -> Subscription<Option<Document>> {
    store.subscribe(&quiz_state_path())
}

pub fn subscribe_responses(
    store: &dyn DocumentStore,
    question_index: usize,
) -> Subscription<Vec<Document>> {
    store.subscribe_query(RESPONSES_COLLECTION, &responses_for(question_index))
}

/// Create-if-absent write. Fails with `AlreadyExists` when this voter already
/// answered the question.
pub async fn submit_vote(store: &dyn DocumentStore, vote: &VoteResponse) -> Result<(), StoreError> {
    let path = DocPath::new(RESPONSES_COLLECTION, vote.document_id());
    store.create(&path, to_fields(vote)?).await
}

pub async fn list_responses(
    store: &dyn DocumentStore,
    question_index: Option<usize>,
) -> Result<Vec<Document>, StoreError> {
    let query = match question_index {
        Some(index) => responses_for(index),
        None => Query::new(),
    };
    store.list(RESPONSES_COLLECTION, &query).await
}

pub async fn delete_responses(store: &dyn DocumentStore, ids: &[String]) -> BatchOutcome {
    store.delete_many(RESPONSES_COLLECTION, ids).await
}
