use log::info;
use rand::Rng;

use crate::{
    error::{GameError, Result},
    models::game::{GameState, Team, NEW_TEAM_NAME},
};

pub fn add_team(state: &mut GameState) -> &Team {
    state.teams.push(Team::new(NEW_TEAM_NAME));
    let team = &state.teams[state.teams.len() - 1];
    info!("Team added: {}", &team.id);
    team
}

pub fn rename_team(state: &mut GameState, team_id: &str, new_name: &str) -> Result<()> {
    let team = state
        .teams
        .iter_mut()
        .find(|team| team.id == team_id)
        .ok_or_else(|| GameError::UnknownTeam(team_id.to_string()))?;

    info!("Team {} renamed to {}", &team.id, new_name);
    team.name = new_name.to_string();
    Ok(())
}

pub fn remove_team(state: &mut GameState, index: usize) -> Result<Team> {
    if state.teams.len() <= 1 {
        return Err(GameError::LastTeam);
    }
    check_index(state, index)?;

    let removed = state.teams.remove(index);
    if state.active_team_index >= state.teams.len() {
        state.active_team_index = 0;
    }
    info!("Team removed: {}", &removed.id);
    Ok(removed)
}

pub fn set_active_team(state: &mut GameState, index: usize) -> Result<()> {
    check_index(state, index)?;
    state.active_team_index = index;
    Ok(())
}

pub fn randomize_active_team<R: Rng>(state: &mut GameState, rng: &mut R) -> usize {
    state.active_team_index = rng.gen_range(0..state.teams.len());
    state.active_team_index
}

fn check_index(state: &GameState, index: usize) -> Result<()> {
    if index >= state.teams.len() {
        return Err(GameError::InvalidTeamIndex {
            index,
            count: state.teams.len(),
        });
    }
    Ok(())
}
