use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use log::info;

use crate::{
    handlers::{
        command_handler::{execute_command, Delivery},
        timer_handler::{start_timer, TimerHandle},
    },
    helpers::format_elapsed,
    models::communication::{Command, Response},
    server_messages::{broadcast_message_all, send_message, PeerMap},
    session::GameSession,
};

#[derive(Debug)]
pub enum SessionEvent {
    Connected {
        connection_id: String,
    },
    Command {
        connection_id: String,
        command: Command,
    },
    Tick {
        epoch: u64,
    },
}

/// Owns the session and applies events one at a time.
pub async fn handle_session(
    mut session: GameSession,
    peer_map: PeerMap,
    events_tx: UnboundedSender<SessionEvent>,
    mut events_rx: UnboundedReceiver<SessionEvent>,
) {
    let mut timer: Option<TimerHandle> = None;
    sync_timer(&session, &mut timer, &events_tx);

    while let Some(event) = events_rx.next().await {
        match event {
            SessionEvent::Connected { connection_id } => {
                let response = Response::stateSnapshot {
                    state: session.snapshot(),
                };
                send_message(response, &peer_map, &connection_id);
            }
            SessionEvent::Command {
                connection_id,
                command,
            } => {
                info!("Command from {}: {:?}", &connection_id, &command);
                for delivery in execute_command(command, &mut session) {
                    match delivery {
                        Delivery::Sender(response) => {
                            send_message(response, &peer_map, &connection_id)
                        }
                        Delivery::All(response) => broadcast_message_all(response, &peer_map),
                    }
                }
            }
            SessionEvent::Tick { epoch } => {
                if timer.as_ref().map(|t| t.epoch()) != Some(epoch) {
                    continue;
                }
                if let Some(elapsed) = session.tick() {
                    let response = Response::timerResponse {
                        elapsedSeconds: elapsed,
                        display: format_elapsed(elapsed),
                    };
                    broadcast_message_all(response, &peer_map);
                }
            }
        }

        sync_timer(&session, &mut timer, &events_tx);
    }

    info!("Session event stream closed");
}

// Replacing the handle drops the previous one, which stops its task.
fn sync_timer(
    session: &GameSession,
    timer: &mut Option<TimerHandle>,
    events_tx: &UnboundedSender<SessionEvent>,
) {
    let wanted = session.timer_running().then(|| session.timer_epoch());
    let current = timer.as_ref().map(|t| t.epoch());

    if wanted != current {
        *timer = wanted.map(|epoch| start_timer(epoch, events_tx.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::catalog::test_catalog, store::GameStore};
    use futures_channel::mpsc::unbounded;
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Duration,
    };
    use tokio::time::timeout;
    use tungstenite::Message;

    async fn next_json(rx: &mut UnboundedReceiver<Message>) -> serde_json::Value {
        let msg = timeout(Duration::from_secs(3), rx.next())
            .await
            .unwrap()
            .unwrap();
        serde_json::from_str(&msg.to_string()).unwrap()
    }

    #[tokio::test]
    async fn commands_are_applied_and_broadcast() {
        let session = GameSession::new(test_catalog(2, 2, 100), GameStore::in_memory().unwrap());
        let peer_map: PeerMap = Arc::new(Mutex::new(HashMap::new()));
        let (viewer_tx, mut viewer_rx) = unbounded();
        peer_map
            .lock()
            .unwrap()
            .insert("viewer".to_string(), viewer_tx);

        let (events_tx, events_rx) = unbounded();
        tokio::spawn(handle_session(
            session,
            peer_map.clone(),
            events_tx.clone(),
            events_rx,
        ));

        events_tx
            .unbounded_send(SessionEvent::Connected {
                connection_id: "viewer".to_string(),
            })
            .unwrap();
        let first = next_json(&mut viewer_rx).await;
        assert_eq!(first["response"], "stateSnapshot");
        assert_eq!(first["data"]["state"]["teams"].as_array().unwrap().len(), 2);

        events_tx
            .unbounded_send(SessionEvent::Command {
                connection_id: "viewer".to_string(),
                command: Command::addTeam,
            })
            .unwrap();

        // A timer tick may arrive in between.
        loop {
            let msg = next_json(&mut viewer_rx).await;
            if msg["response"] == "stateSnapshot" {
                assert_eq!(msg["data"]["state"]["teams"].as_array().unwrap().len(), 3);
                break;
            }
            assert_eq!(msg["response"], "timerResponse");
        }
    }

    #[tokio::test]
    async fn ticks_from_old_epoch_are_ignored() {
        let session = GameSession::new(test_catalog(1, 1, 100), GameStore::in_memory().unwrap());
        let peer_map: PeerMap = Arc::new(Mutex::new(HashMap::new()));
        let (viewer_tx, mut viewer_rx) = unbounded();
        peer_map
            .lock()
            .unwrap()
            .insert("viewer".to_string(), viewer_tx);

        let (events_tx, events_rx) = unbounded();
        tokio::spawn(handle_session(
            session,
            peer_map.clone(),
            events_tx.clone(),
            events_rx,
        ));

        events_tx
            .unbounded_send(SessionEvent::Tick { epoch: 42 })
            .unwrap();
        events_tx
            .unbounded_send(SessionEvent::Connected {
                connection_id: "viewer".to_string(),
            })
            .unwrap();

        let msg = next_json(&mut viewer_rx).await;
        assert_eq!(msg["response"], "stateSnapshot");
        assert_eq!(msg["data"]["state"]["elapsedSeconds"], 0);
    }
}
