use futures_channel::{mpsc::UnboundedSender, oneshot};
use futures_timer::Delay;
use futures_util::{future, pin_mut};
use log::info;
use std::time::Duration;

use crate::{handlers::session_handler::SessionEvent, models::game::GameState};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub fn tick(state: &mut GameState) -> u64 {
    state.elapsed_seconds += 1;
    state.elapsed_seconds
}

/// Running tick task. Dropping the handle stops the task.
pub struct TimerHandle {
    epoch: u64,
    _stop: oneshot::Sender<()>,
}

impl TimerHandle {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

pub fn start_timer(epoch: u64, events: UnboundedSender<SessionEvent>) -> TimerHandle {
    let (stop_tx, stop_rx) = oneshot::channel();
    tokio::spawn(handle_timer(epoch, events, stop_rx));
    info!("Timer started (epoch {})", epoch);

    TimerHandle {
        epoch,
        _stop: stop_tx,
    }
}

async fn handle_timer(
    epoch: u64,
    events: UnboundedSender<SessionEvent>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    loop {
        let delay = Delay::new(TICK_PERIOD);
        pin_mut!(delay);

        match future::select(delay, &mut stop_rx).await {
            future::Either::Left(_) => {
                if events.unbounded_send(SessionEvent::Tick { epoch }).is_err() {
                    break;
                }
            }
            future::Either::Right(_) => break,
        }
    }
    info!("Timer stopped (epoch {})", epoch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_channel::mpsc::unbounded;
    use futures_util::StreamExt;
    use tokio::time::timeout;

    #[test]
    fn tick_adds_one_second() {
        let mut state = GameState::default();
        for _ in 0..5 {
            tick(&mut state);
        }
        assert_eq!(state.elapsed_seconds, 5);
    }

    #[tokio::test]
    async fn timer_sends_ticks_until_dropped() {
        let (tx, mut rx) = unbounded();
        let handle = start_timer(3, tx);

        let event = timeout(Duration::from_secs(3), rx.next()).await.unwrap();
        assert!(matches!(event, Some(SessionEvent::Tick { epoch: 3 })));

        drop(handle);
        let drained = timeout(Duration::from_secs(3), async {
            while rx.next().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }
}
