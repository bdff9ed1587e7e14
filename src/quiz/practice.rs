use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::quiz::models::{Question, QuestionBank};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    Wrong { correct_option: usize },
}

/// Solo quiz from the guest menu. Runs entirely locally: shuffled order,
/// first answer per question counts, score shown at the end.
pub struct PracticeQuiz {
    bank: QuestionBank,
    rng: ChaCha8Rng,
    order: Vec<usize>,
    position: usize,
    score: usize,
    answered: Option<usize>,
    finished: bool,
}

impl PracticeQuiz {
    pub fn new(bank: QuestionBank) -> Self {
        Self::with_rng(bank, ChaCha8Rng::from_os_rng())
    }

    pub fn with_seed(bank: QuestionBank, seed: u64) -> Self {
        Self::with_rng(bank, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(bank: QuestionBank, rng: ChaCha8Rng) -> Self {
        let mut quiz = Self {
            order: (0..bank.len()).collect(),
            bank,
            rng,
            position: 0,
            score: 0,
            answered: None,
            finished: false,
        };
        quiz.restart();
        quiz
    }

    pub fn restart(&mut self) {
        self.order.shuffle(&mut self.rng);
        debug!("Practice quiz order: {:?}", self.order);
        self.position = 0;
        self.score = 0;
        self.answered = None;
        self.finished = self.order.is_empty();
    }

    pub fn current(&self) -> Option<&Question> {
        if self.finished {
            return None;
        }
        self.order
            .get(self.position)
            .and_then(|&i| self.bank.question(i))
    }

    /// 1-based position and the number of questions.
    pub fn progress(&self) -> (usize, usize) {
        (self.position + 1, self.order.len())
    }

    pub fn answered(&self) -> Option<usize> {
        self.answered
    }

    /// Only the first answer to a question counts.
    pub fn choose(&mut self, option: usize) -> Option<AnswerFeedback> {
        if self.answered.is_some() {
            return None;
        }
        let correct_option = self.current()?.correct_option_index;
        self.answered = Some(option);

        if option == correct_option {
            self.score += 1;
            Some(AnswerFeedback::Correct)
        } else {
            Some(AnswerFeedback::Wrong { correct_option })
        }
    }

    /// Moves to the next question once the current one is answered.
    pub fn advance(&mut self) {
        if self.answered.is_none() || self.finished {
            return;
        }

        if self.position + 1 < self.order.len() {
            self.position += 1;
            self.answered = None;
        } else {
            self.finished = true;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn summary(&self) -> String {
        format!("You scored {} / {}", self.score, self.order.len())
    }
}
