use tungstenite::Message;

use crate::models::{communication::Command, game::Outcome};

pub fn parse_command(msg: &Message) -> Result<Command, serde_json::Error> {
    serde_json::from_str(&msg.to_string())
}

/// `MM:SS`, minutes keep counting past an hour.
pub fn format_elapsed(elapsed_seconds: u64) -> String {
    format!("{:02}:{:02}", elapsed_seconds / 60, elapsed_seconds % 60)
}

pub fn outcome_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Draw => "Hra skončila remízou!".to_string(),
        Outcome::Winner(team) => format!("Vítězem je {} ({} bodů)", team.name, team.score),
    }
}
