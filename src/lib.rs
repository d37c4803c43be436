pub mod config;
pub mod error;
pub mod helpers;
pub mod server_messages;
pub mod session;
pub mod store;

pub mod handlers {
    pub mod command_handler;
    pub mod connection_handler;
    pub mod game_handler;
    pub mod session_handler;
    pub mod team_handler;
    pub mod timer_handler;
}

pub mod loggers {
    pub mod file_logger;
}

pub mod models {
    pub mod catalog;
    pub mod communication;
    pub mod game;
}
