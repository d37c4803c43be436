use log::{info, warn};
use serde::Serialize;

use crate::{
    error::{GameError, Result},
    handlers::{
        game_handler::{self, ActiveQuestion},
        team_handler, timer_handler,
    },
    helpers::format_elapsed,
    models::{
        catalog::{Board, Catalog, QuestionId},
        game::{GameState, Outcome, Team},
    },
    store::GameStore,
};

/// Read-only view handed to the renderer after every mutation.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub teams: Vec<Team>,
    pub active_team_index: usize,
    pub elapsed_seconds: u64,
    pub timer_display: String,
    pub complete: bool,
    pub active_question: Option<ActiveQuestion>,
    pub reset_pending: bool,
}

/// Owns the catalog, the mutable game state and its store. Every state
/// mutation is followed by a full save.
pub struct GameSession {
    catalog: Catalog,
    store: GameStore,
    state: GameState,
    active_question: Option<ActiveQuestion>,
    reset_pending: bool,
    finished: bool,
    timer_epoch: u64,
}

impl GameSession {
    pub fn new(catalog: Catalog, store: GameStore) -> GameSession {
        let state = store.load();
        let finished = game_handler::is_complete(&state, &catalog);
        if finished {
            info!("Restored game is already finished");
        }

        GameSession {
            catalog,
            store,
            state,
            active_question: None,
            reset_pending: false,
            finished,
            timer_epoch: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn active_question(&self) -> Option<&ActiveQuestion> {
        self.active_question.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        game_handler::is_complete(&self.state, &self.catalog)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.catalog.board(&self.state.used_questions),
            teams: self.state.teams.clone(),
            active_team_index: self.state.active_team_index,
            elapsed_seconds: self.state.elapsed_seconds,
            timer_display: format_elapsed(self.state.elapsed_seconds),
            complete: self.is_complete(),
            active_question: self.active_question.clone(),
            reset_pending: self.reset_pending,
        }
    }

    /// Returns `Ok(None)` when the question is already used.
    pub fn open_question(&mut self, id: &QuestionId) -> Result<Option<ActiveQuestion>> {
        let opened = game_handler::open_question(&self.state, &self.catalog, id)?;
        if let Some(question) = &opened {
            info!("Question opened: {}", &question.id);
            self.active_question = Some(question.clone());
        }
        Ok(opened)
    }

    pub fn show_answer(&self) -> Result<(QuestionId, String)> {
        let active = self
            .active_question
            .as_ref()
            .ok_or(GameError::NoActiveQuestion)?;
        let (_, question) = self
            .catalog
            .find(&active.id)
            .ok_or_else(|| GameError::UnknownQuestion(active.id.clone()))?;
        Ok((question.id.clone(), question.answer.clone()))
    }

    pub fn close_question(&mut self) {
        self.active_question = None;
    }

    /// Records the verdict for the open question. Returns the outcome the
    /// first time the board becomes complete.
    pub fn resolve_answer(&mut self, correct: bool) -> Result<Option<Outcome>> {
        let active = self
            .active_question
            .clone()
            .ok_or(GameError::NoActiveQuestion)?;

        let resolution =
            game_handler::resolve_answer(&mut self.state, &self.catalog, &active, correct)?;
        self.active_question = None;
        self.persist();

        if resolution.complete && !self.finished {
            self.finished = true;
            info!("All questions resolved, game finished");
            return Ok(Some(game_handler::determine_outcome(&self.state)));
        }
        Ok(None)
    }

    pub fn add_team(&mut self) -> Team {
        let team = team_handler::add_team(&mut self.state).clone();
        self.persist();
        team
    }

    pub fn rename_team(&mut self, team_id: &str, new_name: &str) -> Result<()> {
        team_handler::rename_team(&mut self.state, team_id, new_name)?;
        self.persist();
        Ok(())
    }

    pub fn remove_team(&mut self, index: usize) -> Result<Team> {
        let removed = team_handler::remove_team(&mut self.state, index)?;
        self.persist();
        Ok(removed)
    }

    pub fn set_active_team(&mut self, index: usize) -> Result<()> {
        team_handler::set_active_team(&mut self.state, index)?;
        self.persist();
        Ok(())
    }

    pub fn randomize_active_team(&mut self) -> usize {
        let index = team_handler::randomize_active_team(&mut self.state, &mut rand::thread_rng());
        self.persist();
        index
    }

    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn cancel_reset(&mut self) {
        self.reset_pending = false;
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub fn confirm_reset(&mut self) -> Result<()> {
        if !self.reset_pending {
            return Err(GameError::NoPendingReset);
        }

        self.state = match self.store.reset() {
            Ok(state) => state,
            Err(error) => {
                warn!("Could not save reset game: {}", error);
                GameState::default()
            }
        };
        self.active_question = None;
        self.reset_pending = false;
        self.finished = false;
        self.timer_epoch += 1;
        Ok(())
    }

    /// Advances the elapsed time by one second while the game runs.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.timer_running() {
            return None;
        }
        let elapsed = timer_handler::tick(&mut self.state);
        self.persist();
        Some(elapsed)
    }

    pub fn timer_running(&self) -> bool {
        !self.finished
    }

    /// Changes on every reset so ticks from a replaced timer can be told apart.
    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    fn persist(&self) {
        if let Err(error) = self.store.save(&self.state) {
            warn!("Could not save game state: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::test_catalog;

    fn session(categories: usize, per_category: usize) -> GameSession {
        GameSession::new(
            test_catalog(categories, per_category, 100),
            GameStore::in_memory().unwrap(),
        )
    }

    #[test]
    fn resolve_without_open_question_is_refused() {
        let mut session = session(1, 1);
        let before = session.state().clone();

        let result = session.resolve_answer(true);

        assert!(matches!(result, Err(GameError::NoActiveQuestion)));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn reopening_used_question_keeps_selection_empty() {
        let mut session = session(1, 2);
        session.open_question(&QuestionId::new(0, 0)).unwrap();
        session.resolve_answer(false).unwrap();

        let reopened = session.open_question(&QuestionId::new(0, 0)).unwrap();

        assert!(reopened.is_none());
        assert!(session.active_question().is_none());
    }

    #[test]
    fn closing_question_leaves_it_unused() {
        let mut session = session(1, 2);
        session.open_question(&QuestionId::new(0, 1)).unwrap();
        assert_eq!(session.show_answer().unwrap().1, "Answer 1-2");

        session.close_question();

        assert!(session.active_question().is_none());
        assert!(session.state().used_questions.is_empty());
        assert!(matches!(session.show_answer(), Err(GameError::NoActiveQuestion)));
    }

    #[test]
    fn outcome_is_reported_once_and_timer_stops() {
        let mut session = session(1, 1);
        session.tick();

        session.open_question(&QuestionId::new(0, 0)).unwrap();
        let outcome = session.resolve_answer(true).unwrap();

        assert!(matches!(outcome, Some(Outcome::Winner(_))));
        assert!(session.is_complete());
        assert!(!session.timer_running());
        assert_eq!(session.tick(), None);
        assert_eq!(session.state().elapsed_seconds, 1);
    }

    #[test]
    fn every_mutation_is_saved() {
        let mut session = session(2, 2);

        session.open_question(&QuestionId::new(0, 1)).unwrap();
        session.resolve_answer(false).unwrap();
        assert_eq!(&session.store().load(), session.state());

        let id = session.add_team().id;
        session.rename_team(&id, "Hosté").unwrap();
        session.set_active_team(2).unwrap();
        session.tick();
        assert_eq!(&session.store().load(), session.state());

        session.remove_team(0).unwrap();
        session.randomize_active_team();
        assert_eq!(&session.store().load(), session.state());
    }

    #[test]
    fn finished_board_stays_complete_until_reset() {
        let mut session = session(2, 1);
        for category in 0..2 {
            session.open_question(&QuestionId::new(category, 0)).unwrap();
            session.resolve_answer(true).unwrap();
        }
        assert!(session.is_complete());

        let mut used = session.state().used_questions.clone();
        let mut check = |session: &GameSession| {
            assert!(session.state().used_questions.is_superset(&used));
            assert!(session.is_complete());
            used = session.state().used_questions.clone();
        };

        let id = session.add_team().id;
        check(&session);
        session.rename_team(&id, "Hosté").unwrap();
        check(&session);
        session.set_active_team(2).unwrap();
        check(&session);
        session.randomize_active_team();
        check(&session);
        session.remove_team(0).unwrap();
        check(&session);
        assert!(session.open_question(&QuestionId::new(1, 0)).unwrap().is_none());
        check(&session);
        session.close_question();
        check(&session);
        session.request_reset();
        session.cancel_reset();
        check(&session);

        session.request_reset();
        session.confirm_reset().unwrap();

        assert!(session.state().used_questions.is_empty());
        assert!(!session.is_complete());
    }

    #[test]
    fn five_ticks_add_five_seconds() {
        let mut session = session(1, 1);
        for _ in 0..5 {
            session.tick();
        }
        assert_eq!(session.state().elapsed_seconds, 5);
    }

    #[test]
    fn reset_needs_confirmation() {
        let mut session = session(2, 1);
        session.tick();
        session.open_question(&QuestionId::new(0, 0)).unwrap();
        session.resolve_answer(true).unwrap();

        assert!(matches!(session.confirm_reset(), Err(GameError::NoPendingReset)));

        session.request_reset();
        session.cancel_reset();
        assert!(!session.reset_pending());
        assert_eq!(session.state().used_questions.len(), 1);

        session.request_reset();
        session.confirm_reset().unwrap();

        assert!(session.state().used_questions.is_empty());
        assert_eq!(session.state().elapsed_seconds, 0);
        assert_eq!(session.state().teams.len(), 2);
        assert_eq!(session.timer_epoch(), 1);
        assert!(session.timer_running());
    }

    #[test]
    fn reset_restarts_finished_game() {
        let mut session = session(1, 1);
        session.open_question(&QuestionId::new(0, 0)).unwrap();
        session.resolve_answer(true).unwrap();
        assert!(!session.timer_running());

        session.request_reset();
        session.confirm_reset().unwrap();

        assert!(!session.is_complete());
        assert!(session.timer_running());
        assert_eq!(session.tick(), Some(1));
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut session = session(2, 2);
        session.open_question(&QuestionId::new(1, 0)).unwrap();
        session.resolve_answer(true).unwrap();
        for _ in 0..75 {
            session.tick();
        }

        let snapshot = session.snapshot();

        assert_eq!(snapshot.teams[0].score, 100);
        assert_eq!(snapshot.active_team_index, 1);
        assert_eq!(snapshot.timer_display, "01:15");
        assert!(snapshot.board.rows[0][1].as_ref().unwrap().used);
        assert!(!snapshot.complete);
        assert!(snapshot.active_question.is_none());
    }
}
