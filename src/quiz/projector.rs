use core::fmt;

use serde::Serialize;

use crate::{
    common::error::AppError,
    quiz::{
        feed::{LiveQuiz, QuizSnapshot},
        models::{OPTION_COUNT, QuestionBank},
        tally::Tally,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRow {
    pub label: String,
    pub votes: u32,
    pub percentage: u32,
    pub bar_width: u32,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ProjectorFrame {
    Waiting,
    Live {
        question_number: usize,
        question: String,
        votes_label: String,
        total_votes: u32,
        options: Vec<OptionRow>,
        revealed: bool,
    },
}

impl ProjectorFrame {
    pub fn from_snapshot(bank: &QuestionBank, snapshot: &QuizSnapshot) -> Self {
        let Some(index) = snapshot.state.active_question_index else {
            return Self::Waiting;
        };
        let Some(question) = bank.question(index) else {
            return Self::Waiting;
        };

        let empty = Tally::empty(index, OPTION_COUNT);
        let tally = snapshot.tally.as_ref().unwrap_or(&empty);
        let revealed = snapshot.state.reveal_answer;

        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| OptionRow {
                label: label.clone(),
                votes: tally.count(i),
                percentage: tally.percentage(i),
                bar_width: tally.bar_width(i),
                highlighted: revealed && question.is_correct(i),
            })
            .collect();

        Self::Live {
            question_number: index + 1,
            question: question.text.clone(),
            votes_label: tally.votes_label(),
            total_votes: tally.total(),
            options,
            revealed,
        }
    }
}

const BAR_CELLS: u32 = 20;

impl fmt::Display for ProjectorFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectorFrame::Waiting => {
                writeln!(f, "Live Quiz")?;
                writeln!(f, "Waiting for question...")
            }
            ProjectorFrame::Live {
                question_number,
                question,
                votes_label,
                options,
                revealed,
                ..
            } => {
                writeln!(f, "Q{}: {}", question_number, question)?;
                writeln!(f, "{}", votes_label)?;
                for row in options {
                    let filled = (row.bar_width * BAR_CELLS / 100) as usize;
                    let bar = format!(
                        "{}{}",
                        "#".repeat(filled),
                        ".".repeat(BAR_CELLS as usize - filled)
                    );
                    let mark = if row.highlighted { " ✓" } else { "" };
                    writeln!(
                        f,
                        "[{}] {}{} - {} ({}%)",
                        bar, row.label, mark, row.votes, row.percentage
                    )?;
                }
                if *revealed {
                    writeln!(f, "✓ Correct answer revealed!")?;
                }
                Ok(())
            }
        }
    }
}

/// Full-screen, read-only mirror of the live quiz.
pub struct QuizProjector {
    live: LiveQuiz,
}

impl QuizProjector {
    pub fn new(live: LiveQuiz) -> Self {
        Self { live }
    }

    pub fn frame(&self) -> ProjectorFrame {
        ProjectorFrame::from_snapshot(self.live.bank(), self.live.snapshot())
    }

    /// Waits for the next push and renders it.
    pub async fn next_frame(&mut self) -> Option<Result<ProjectorFrame, AppError>> {
        let snapshot = self.live.next().await?;
        Some(snapshot.map(|s| ProjectorFrame::from_snapshot(self.live.bank(), &s)))
    }
}
