use log::info;
use serde::Serialize;

use crate::{
    error::{GameError, Result},
    models::{
        catalog::{Catalog, QuestionId},
        game::{GameState, Outcome},
    },
};

/// The question currently awaiting a verdict. Never persisted.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ActiveQuestion {
    pub id: QuestionId,
    pub category: String,
    pub prompt: String,
    pub value: i32,
    pub bonus: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub delta: i32,
    pub complete: bool,
}

/// Selects a question for resolution. Returns `Ok(None)` when the question
/// has already been used.
pub fn open_question(
    state: &GameState,
    catalog: &Catalog,
    id: &QuestionId,
) -> Result<Option<ActiveQuestion>> {
    let (category, question) = catalog
        .find(id)
        .ok_or_else(|| GameError::UnknownQuestion(id.clone()))?;

    if state.used_questions.contains(id) {
        info!("Question {} already used, ignoring", id);
        return Ok(None);
    }

    Ok(Some(ActiveQuestion {
        id: question.id.clone(),
        category: category.title.clone(),
        prompt: question.prompt.clone(),
        value: question.value,
        bonus: question.bonus,
    }))
}

/// Scores the active question for the active team and passes the turn.
pub fn resolve_answer(
    state: &mut GameState,
    catalog: &Catalog,
    active: &ActiveQuestion,
    correct: bool,
) -> Result<Resolution> {
    let team_count = state.teams.len();
    let index = state.active_team_index;
    let team = state
        .teams
        .get_mut(index)
        .ok_or(GameError::InvalidTeamIndex {
            index,
            count: team_count,
        })?;

    let delta = if correct { active.value } else { -active.value };
    team.score = team.score.saturating_add(delta);
    info!(
        "Team {} answered {} {}: {:+}",
        team.name,
        active.id,
        if correct { "correctly" } else { "wrong" },
        delta
    );

    state.used_questions.insert(active.id.clone());
    state.active_team_index = (index + 1) % team_count;

    Ok(Resolution {
        delta,
        complete: is_complete(state, catalog),
    })
}

/// True once every question of the loaded catalog is used. Ids left over
/// from a different catalog are not counted.
pub fn is_complete(state: &GameState, catalog: &Catalog) -> bool {
    let used = state
        .used_questions
        .iter()
        .filter(|id| catalog.contains(id))
        .count();
    used >= catalog.total_questions()
}

/// Highest score wins; a shared top score is a draw.
pub fn determine_outcome(state: &GameState) -> Outcome {
    let mut ranking: Vec<_> = state.teams.iter().collect();
    ranking.sort_by(|a, b| b.score.cmp(&a.score));

    match ranking.as_slice() {
        [first, second, ..] if first.score == second.score => Outcome::Draw,
        [first, ..] => Outcome::Winner((*first).clone()),
        [] => Outcome::Draw,
    }
}
