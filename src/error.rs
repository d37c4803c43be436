use thiserror::Error;

use crate::models::catalog::QuestionId;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Catalog contains no questions")]
    EmptyCatalog,

    #[error("Question {id} has non-positive value {value}")]
    InvalidQuestionValue { id: QuestionId, value: i32 },

    #[error("Question not found: {0}")]
    UnknownQuestion(QuestionId),

    #[error("No question is open")]
    NoActiveQuestion,

    #[error("At least one team must remain")]
    LastTeam,

    #[error("Invalid team index {index} (team count {count})")]
    InvalidTeamIndex { index: usize, count: usize },

    #[error("Team not found: {0}")]
    UnknownTeam(String),

    #[error("No reset is waiting for confirmation")]
    NoPendingReset,
}

pub type Result<T> = std::result::Result<T, GameError>;
