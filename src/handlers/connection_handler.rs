use crate::{
    handlers::session_handler::SessionEvent,
    helpers::parse_command,
    models::communication::Response,
    server_messages::{lock_peers, send_message, PeerMap},
};
use futures_channel::mpsc::{unbounded, UnboundedSender};
use futures_util::{future, pin_mut, StreamExt, TryStreamExt};
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use uuid::Uuid;

pub async fn handle_connection(
    peer_map: PeerMap,
    events: UnboundedSender<SessionEvent>,
    raw_stream: TcpStream,
    addr: SocketAddr,
) {
    info!("Incoming TCP connection from: {}", &addr);

    let ws_stream = match tokio_tungstenite::accept_async(raw_stream).await {
        Ok(stream) => stream,
        Err(error) => {
            warn!("Handshake with {} error: {}", addr, error);
            return;
        }
    };
    info!("WebSocket connection established: {}", &addr);

    let connection_id = Uuid::new_v4().to_string();
    let (tx, rx) = unbounded();
    lock_peers(&peer_map).insert(connection_id.clone(), tx);

    if events
        .unbounded_send(SessionEvent::Connected {
            connection_id: connection_id.clone(),
        })
        .is_err()
    {
        warn!("Session is gone, closing {}", &addr);
        lock_peers(&peer_map).remove(&connection_id);
        return;
    }

    let (outgoing, incoming) = ws_stream.split();

    let forward_incoming = incoming.try_for_each(|msg| {
        if !msg.is_text() {
            return future::ok(());
        }

        match parse_command(&msg) {
            Ok(command) => {
                let event = SessionEvent::Command {
                    connection_id: connection_id.clone(),
                    command,
                };
                if let Err(error) = events.unbounded_send(event) {
                    warn!("Could not queue command from {}: {}", &addr, error);
                }
            }
            Err(error) => {
                warn!("Error parsing command!: {}", error);
                let response = Response::errorResponse {
                    errorText: error.to_string(),
                };
                send_message(response, &peer_map, &connection_id);
            }
        }

        future::ok(())
    });

    let receive_from_session = rx.map(Ok).forward(outgoing);

    pin_mut!(forward_incoming, receive_from_session);
    future::select(forward_incoming, receive_from_session).await;

    info!("{} disconnected", &addr);
    lock_peers(&peer_map).remove(&connection_id);
}
