use std::{ops::Deref, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_option_index: usize,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        self.correct_option_index == option
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }
}

/// Read-only question list shared by every quiz view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank(Arc<[Question]>);

impl QuestionBank {
    pub(crate) fn from_validated(questions: Vec<Question>) -> Self {
        Self(questions.into())
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.0.get(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.0.len()
    }
}

impl Deref for QuestionBank {
    type Target = [Question];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The shared `quiz/state` document.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizState {
    #[serde(default)]
    pub active_question_index: Option<usize>,
    #[serde(default)]
    pub reveal_answer: bool,
}

impl QuizState {
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn showing(index: usize) -> Self {
        Self {
            active_question_index: Some(index),
            reveal_answer: false,
        }
    }

    pub fn revealed(index: usize) -> Self {
        Self {
            active_question_index: Some(index),
            reveal_answer: true,
        }
    }

    /// Drops combinations a client cannot render: a reveal without a question,
    /// or an index the local bank does not have.
    pub fn normalized(self, bank: &QuestionBank) -> Self {
        match self.active_question_index {
            Some(index) if bank.contains(index) => self,
            _ => Self::closed(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub question_index: usize,
    pub answer: usize,
    pub voter_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl VoteResponse {
    pub fn new(question_index: usize, answer: usize, voter_id: impl Into<String>) -> Self {
        Self {
            question_index,
            answer,
            voter_id: voter_id.into(),
            submitted_at: Utc::now(),
        }
    }

    /// Document id holding this vote. One id per voter and question, so the
    /// store rejects a second vote for the same pair.
    pub fn document_id(&self) -> String {
        vote_document_id(&self.voter_id, self.question_index)
    }
}

/// `q{index}_{voter}` with `%` and `/` percent-escaped in the voter id, so
/// distinct voters never share an id and the id holds no path separator.
pub fn vote_document_id(voter_id: &str, question_index: usize) -> String {
    let mut id = format!("q{}_", question_index);
    for c in voter_id.chars() {
        match c {
            '%' => id.push_str("%25"),
            '/' => id.push_str("%2F"),
            c => id.push(c),
        }
    }
    id
}
