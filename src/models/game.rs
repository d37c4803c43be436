use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::catalog::QuestionId;

pub const DEFAULT_TEAM_NAMES: [&str; 2] = ["Tým A", "Tým B"];
pub const NEW_TEAM_NAME: &str = "Nový tým";
pub const WINNER_GIF: &str = "https://media.tenor.com/jyQAUkmCdVwAAAAC/win-celebration.gif";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Team {
    #[serde(default = "new_team_id")]
    pub id: String,
    #[serde(default = "new_team_name")]
    pub name: String,
    #[serde(default)]
    pub score: i32,
}

fn new_team_id() -> String {
    Uuid::new_v4().to_string()
}

fn new_team_name() -> String {
    NEW_TEAM_NAME.to_string()
}

impl Team {
    pub fn new(name: &str) -> Team {
        Team {
            id: new_team_id(),
            name: name.to_string(),
            score: 0,
        }
    }
}

/// The persisted session record. Fields missing from an older record fall
/// back to their fresh-game values.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    #[serde(deserialize_with = "deserialize_used_questions")]
    pub used_questions: BTreeSet<QuestionId>,
    pub teams: Vec<Team>,
    pub active_team_index: usize,
    pub elapsed_seconds: u64,
    pub winner_gif: String,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            used_questions: BTreeSet::new(),
            teams: DEFAULT_TEAM_NAMES.iter().map(|name| Team::new(name)).collect(),
            active_team_index: 0,
            elapsed_seconds: 0,
            winner_gif: WINNER_GIF.to_string(),
        }
    }
}

impl GameState {
    /// Repairs a restored record so the team invariants hold. Returns `None`
    /// when the record has no teams and cannot be used.
    pub fn normalized(mut self) -> Option<GameState> {
        if self.teams.is_empty() {
            return None;
        }
        if self.active_team_index >= self.teams.len() {
            self.active_team_index = 0;
        }
        Some(self)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Winner(Team),
    Draw,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UsedQuestionsRecord {
    List(BTreeSet<QuestionId>),
    Map(HashMap<QuestionId, bool>),
}

// Older records kept the used set as an object of `id: true` entries.
fn deserialize_used_questions<'de, D>(deserializer: D) -> Result<BTreeSet<QuestionId>, D::Error>
where
    D: Deserializer<'de>,
{
    let record = UsedQuestionsRecord::deserialize(deserializer)?;
    Ok(match record {
        UsedQuestionsRecord::List(ids) => ids,
        UsedQuestionsRecord::Map(entries) => entries
            .into_iter()
            .filter(|(_, used)| *used)
            .map(|(id, _)| id)
            .collect(),
    })
}
