use log::{info, warn};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use futures_channel::mpsc::UnboundedSender;
use tungstenite::protocol::Message;

use crate::models::communication::Response;

pub type Tx = UnboundedSender<Message>;
pub type PeerMap = Arc<Mutex<HashMap<String, Tx>>>;

pub fn send_message(response: Response, peer_map: &PeerMap, id: &String) {
    let text = match serde_json::to_string(&response) {
        Ok(text) => text,
        Err(error) => {
            warn!("Could not serialize response: {}", error);
            return;
        }
    };

    let peers = lock_peers(peer_map);
    match peers.get(id) {
        Some(recp) => {
            if let Err(error) = recp.unbounded_send(Message::Text(text)) {
                warn!("Could not send to {}: {}", &id, error);
            }
        }
        None => info!("No connection {} to send to", &id),
    }
}

pub fn broadcast_message_all(response: Response, peer_map: &PeerMap) {
    let text = match serde_json::to_string(&response) {
        Ok(text) => text,
        Err(error) => {
            warn!("Could not serialize response: {}", error);
            return;
        }
    };

    let peers = lock_peers(peer_map);
    for (id, recp) in peers.iter() {
        if let Err(error) = recp.unbounded_send(Message::Text(text.clone())) {
            warn!("Could not send to {}: {}", id, error);
        }
    }
}

pub fn lock_peers(peer_map: &PeerMap) -> MutexGuard<'_, HashMap<String, Tx>> {
    match peer_map.lock() {
        Ok(peers) => peers,
        Err(poisoned) => poisoned.into_inner(),
    }
}
