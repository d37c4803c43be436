use log::{info, warn};

use crate::{
    error::GameError,
    helpers::{format_elapsed, outcome_message},
    models::{
        communication::{Command, Response},
        game::Outcome,
    },
    session::GameSession,
};

pub const RESET_PROMPT: &str = "Opravdu chcete restartovat celou hru?";

/// Where a response goes: back to the connection that sent the command, or
/// to every connected view.
#[derive(Debug)]
pub enum Delivery {
    Sender(Response),
    All(Response),
}

pub fn execute_command(command: Command, session: &mut GameSession) -> Vec<Delivery> {
    match run_command(command, session) {
        Ok(deliveries) => deliveries,
        Err(GameError::LastTeam) => {
            info!("Refused to remove the last team");
            vec![Delivery::Sender(Response::noticeResponse {
                noticeText: GameError::LastTeam.to_string(),
            })]
        }
        Err(error) => {
            warn!("Command failed: {}", error);
            vec![Delivery::Sender(Response::errorResponse {
                errorText: error.to_string(),
            })]
        }
    }
}

#[allow(non_snake_case)]
fn run_command(command: Command, session: &mut GameSession) -> Result<Vec<Delivery>, GameError> {
    let deliveries = match command {
        Command::getSnapshot => vec![Delivery::Sender(snapshot(session))],
        Command::openQuestion { questionId } => match session.open_question(&questionId)? {
            Some(question) => vec![Delivery::All(Response::questionOpened { question })],
            None => vec![],
        },
        Command::showAnswer => {
            let (questionId, answer) = session.show_answer()?;
            vec![Delivery::All(Response::answerRevealed { questionId, answer })]
        }
        Command::closeQuestion => {
            session.close_question();
            vec![Delivery::All(Response::questionClosed {})]
        }
        Command::resolveAnswer { correct } => {
            let outcome = session.resolve_answer(correct)?;
            let mut deliveries = vec![Delivery::All(snapshot(session))];
            if let Some(outcome) = outcome {
                deliveries.push(Delivery::All(finished(session, outcome)));
            }
            deliveries
        }
        Command::addTeam => {
            session.add_team();
            vec![Delivery::All(snapshot(session))]
        }
        Command::renameTeam { teamId, newName } => {
            session.rename_team(&teamId, &newName)?;
            vec![Delivery::All(snapshot(session))]
        }
        Command::removeTeam { index } => {
            session.remove_team(index)?;
            vec![Delivery::All(snapshot(session))]
        }
        Command::setActiveTeam { index } => {
            session.set_active_team(index)?;
            vec![Delivery::All(snapshot(session))]
        }
        Command::randomizeActiveTeam => {
            session.randomize_active_team();
            vec![Delivery::All(snapshot(session))]
        }
        Command::requestReset => {
            session.request_reset();
            vec![Delivery::All(Response::resetConfirmation {
                message: RESET_PROMPT.to_string(),
            })]
        }
        Command::confirmReset => {
            session.confirm_reset()?;
            let elapsed = session.state().elapsed_seconds;
            vec![
                Delivery::All(snapshot(session)),
                Delivery::All(Response::timerResponse {
                    elapsedSeconds: elapsed,
                    display: format_elapsed(elapsed),
                }),
            ]
        }
        Command::cancelReset => {
            session.cancel_reset();
            vec![Delivery::All(snapshot(session))]
        }
    };

    Ok(deliveries)
}

fn snapshot(session: &GameSession) -> Response {
    Response::stateSnapshot {
        state: session.snapshot(),
    }
}

fn finished(session: &GameSession, outcome: Outcome) -> Response {
    let message = outcome_message(&outcome);
    match outcome {
        Outcome::Draw => Response::gameFinished {
            draw: true,
            winner: None,
            message,
            winnerGif: None,
        },
        Outcome::Winner(team) => Response::gameFinished {
            draw: false,
            winner: Some(team),
            message,
            winnerGif: Some(session.state().winner_gif.clone()),
        },
    }
}
