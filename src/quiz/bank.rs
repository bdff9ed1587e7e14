use std::{fs, path::Path};

use tracing::info;

use crate::{
    common::error::AppError,
    quiz::models::{OPTION_COUNT, Question, QuestionBank},
};

fn question(text: &str, options: [&str; OPTION_COUNT], correct_option_index: usize) -> Question {
    Question {
        text: text.to_string(),
        options: options.map(str::to_string),
        correct_option_index,
    }
}

impl QuestionBank {
    pub fn builtin() -> Self {
        Self::from_validated(vec![
            question(
                "Where did they go on their first date?",
                ["Italian restaurant", "Roller rink", "Coffee shop", "Hiking trail"],
                2,
            ),
            question(
                "What is the groom's go-to karaoke song?",
                [
                    "Bohemian Rhapsody",
                    "Wonderwall",
                    "Uptown Funk",
                    "Total Eclipse of the Heart",
                ],
                1,
            ),
            question(
                "Who said 'I love you' first?",
                ["Bride", "Groom", "It was mutual", "Their dog"],
                0,
            ),
        ])
    }

    pub fn new(questions: Vec<Question>) -> Result<Self, AppError> {
        if questions.is_empty() {
            return Err(AppError::Validation(
                "Question bank must contain at least one question".into(),
            ));
        }

        for (i, q) in questions.iter().enumerate() {
            if q.text.trim().is_empty() {
                return Err(AppError::Validation(format!("Question {} has no text", i + 1)));
            }

            if q.correct_option_index >= OPTION_COUNT {
                return Err(AppError::Validation(format!(
                    "Question {} points at option {}, only {} exist",
                    i + 1,
                    q.correct_option_index,
                    OPTION_COUNT
                )));
            }
        }

        Ok(Self::from_validated(questions))
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let bank = Self::from_json(&json)?;
        info!("Loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }
}
