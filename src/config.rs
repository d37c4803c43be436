use std::{env, path::PathBuf};

pub const DEFAULT_ADDR: &str = "127.0.0.1:9001";
pub const DEFAULT_CATALOG: &str = "public/questions.json";
pub const DEFAULT_DATABASE: &str = "data/quiz-board.db";
pub const DEFAULT_LOG_DIR: &str = "log";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: String,
    pub catalog_path: PathBuf,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Listen address from the first argument, paths from `QUIZ_CATALOG`,
    /// `QUIZ_DATABASE` and `QUIZ_LOG_DIR`.
    pub fn from_env() -> Config {
        Config::resolve(env::args().nth(1), |key| env::var(key).ok())
    }

    pub fn resolve<F>(addr: Option<String>, var: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            addr: addr.unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            catalog_path: var("QUIZ_CATALOG")
                .unwrap_or_else(|| DEFAULT_CATALOG.to_string())
                .into(),
            database_path: var("QUIZ_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
                .into(),
            log_dir: var("QUIZ_LOG_DIR")
                .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
                .into(),
        }
    }
}
