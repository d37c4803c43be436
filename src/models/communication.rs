#![allow(non_camel_case_types, non_snake_case)]

use serde::{Deserialize, Serialize};

use super::{catalog::QuestionId, game::Team};
use crate::{handlers::game_handler::ActiveQuestion, session::Snapshot};

#[derive(Serialize, Debug)]
#[serde(tag = "response", content = "data")]
pub enum Response {
    stateSnapshot {
        state: Snapshot,
    },
    questionOpened {
        question: ActiveQuestion,
    },
    answerRevealed {
        questionId: QuestionId,
        answer: String,
    },
    questionClosed {},
    timerResponse {
        elapsedSeconds: u64,
        display: String,
    },
    gameFinished {
        draw: bool,
        winner: Option<Team>,
        message: String,
        winnerGif: Option<String>,
    },
    resetConfirmation {
        message: String,
    },
    noticeResponse {
        noticeText: String,
    },
    errorResponse {
        errorText: String,
    },
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "command", content = "data")]
pub enum Command {
    getSnapshot,
    openQuestion { questionId: QuestionId },
    showAnswer,
    closeQuestion,
    resolveAnswer { correct: bool },
    addTeam,
    renameTeam { teamId: String, newName: String },
    removeTeam { index: usize },
    setActiveTeam { index: usize },
    randomizeActiveTeam,
    requestReset,
    confirmReset,
    cancelReset,
}
