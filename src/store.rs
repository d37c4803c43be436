use std::path::Path;

use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use crate::{error::Result, models::game::GameState};

pub const STORAGE_KEY: &str = "riskuj-game-state";

/// Single-record key-value persistence for the game state.
pub struct GameStore {
    conn: Connection,
}

impl GameStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<GameStore> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        GameStore::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<GameStore> {
        GameStore::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<GameStore> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(GameStore { conn })
    }

    /// Restores the persisted state. A missing, unreadable or unusable record
    /// yields a fresh game.
    pub fn load(&self) -> GameState {
        let record = match self.read_record() {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!("No saved game found, starting fresh");
                return GameState::default();
            }
            Err(error) => {
                warn!("Could not read saved game: {}", error);
                return GameState::default();
            }
        };

        let state = match serde_json::from_str::<GameState>(&record) {
            Ok(state) => state,
            Err(error) => {
                warn!("Saved game is corrupt, starting fresh: {}", error);
                return GameState::default();
            }
        };

        match state.normalized() {
            Some(state) => {
                info!("Saved game restored");
                state
            }
            None => {
                warn!("Saved game has no teams, starting fresh");
                GameState::default()
            }
        }
    }

    pub fn save(&self, state: &GameState) -> Result<()> {
        let record = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![STORAGE_KEY, record],
        )?;
        Ok(())
    }

    pub fn reset(&self) -> Result<GameState> {
        let state = GameState::default();
        self.save(&state)?;
        info!("Game state reset");
        Ok(state)
    }

    fn read_record(&self) -> Result<Option<String>> {
        let record = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(record)
    }

    #[cfg(test)]
    fn write_raw(&self, record: &str) {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![STORAGE_KEY, record],
            )
            .unwrap();
    }
}
