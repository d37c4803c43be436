use futures_channel::mpsc::unbounded;
use log::{error, info};
use quiz_board::{
    config::Config,
    error::GameError,
    handlers::{connection_handler::handle_connection, session_handler::handle_session},
    loggers::file_logger::init_file_logger,
    models::catalog::Catalog,
    server_messages::PeerMap,
    session::GameSession,
    store::GameStore,
};
use std::{collections::HashMap, sync::Mutex};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), GameError> {
    let config = Config::from_env();

    if let Err(err) = init_file_logger(&config.log_dir) {
        eprintln!("Could not initialize file logger: {}", err);
    }
    info!("App started!");

    let catalog = match Catalog::load(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!(
                "Could not load catalog {}: {}",
                config.catalog_path.display(),
                err
            );
            return Err(err);
        }
    };
    info!(
        "Catalog loaded: {} categories, {} questions",
        catalog.categories().len(),
        catalog.total_questions()
    );

    let store = GameStore::open(&config.database_path)?;
    let session = GameSession::new(catalog, store);

    let peer_map = PeerMap::new(Mutex::new(HashMap::new()));
    let (events_tx, events_rx) = unbounded();
    tokio::spawn(handle_session(
        session,
        peer_map.clone(),
        events_tx.clone(),
        events_rx,
    ));

    let listener = TcpListener::bind(&config.addr).await?;
    info!("Listening on: {}", config.addr);

    while let Ok((stream, addr)) = listener.accept().await {
        tokio::spawn(handle_connection(
            peer_map.clone(),
            events_tx.clone(),
            stream,
            addr,
        ));
    }

    Ok(())
}
