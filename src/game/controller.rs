//! In-process relay standing in for the game controller
//!
//! Receives commands from every live session on one channel, keeps a small
//! amount of per-session bookkeeping and answers on the session's outbound
//! channel. Board transitions are not computed here.

use dashmap::DashMap;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::effects::{generate_burst, CONFETTI_BURST_SIZE};
use crate::util::time::unix_millis;
use crate::ws::protocol::ServerMsg;

use super::{ChannelSink, GameCommand, SessionCommand};

const COMMAND_CHANNEL_CAPACITY: usize = 256;
const OUTBOUND_CHANNEL_CAPACITY: usize = 64;

/// Bookkeeping for one connected session
#[derive(Debug, Clone)]
struct SessionHandle {
    outbound: mpsc::Sender<ServerMsg>,
    moves: u64,
}

/// Channels handed to a newly registered session
pub struct SessionChannels {
    /// Sink for commands produced by this session
    pub sink: ChannelSink,
    /// Sender for direct replies (pong, errors) on the same socket
    pub outbound_tx: mpsc::Sender<ServerMsg>,
    /// Everything to be written to the socket
    pub outbound_rx: mpsc::Receiver<ServerMsg>,
}

pub struct RelayController {
    sessions: DashMap<Uuid, SessionHandle>,
    command_tx: mpsc::Sender<SessionCommand>,
    command_rx: Mutex<Option<mpsc::Receiver<SessionCommand>>>,
    rng: Mutex<ChaCha8Rng>,
    commands_relayed: AtomicU64,
}

impl RelayController {
    pub fn new(confetti_seed: Option<u64>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let rng = match confetti_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            sessions: DashMap::new(),
            command_tx,
            command_rx: Mutex::new(Some(command_rx)),
            rng: Mutex::new(rng),
            commands_relayed: AtomicU64::new(0),
        }
    }

    /// Register a session (called when the live socket connects)
    pub fn register_session(&self, session_id: Uuid) -> SessionChannels {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CHANNEL_CAPACITY);

        self.sessions.insert(
            session_id,
            SessionHandle {
                outbound: outbound_tx.clone(),
                moves: 0,
            },
        );

        info!(session_id = %session_id, "Session registered");

        SessionChannels {
            sink: ChannelSink::new(session_id, self.command_tx.clone()),
            outbound_tx,
            outbound_rx,
        }
    }

    /// Unregister a session (called when the live socket closes)
    pub fn unregister_session(&self, session_id: Uuid) {
        if let Some((_, handle)) = self.sessions.remove(&session_id) {
            info!(session_id = %session_id, moves = handle.moves, "Session unregistered");
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn commands_relayed(&self) -> u64 {
        self.commands_relayed.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub fn moves_for(&self, session_id: Uuid) -> Option<u64> {
        self.sessions.get(&session_id).map(|h| h.moves)
    }

    /// Apply one command and produce the reply for its session, if any
    pub fn handle(&self, cmd: &SessionCommand) -> Option<ServerMsg> {
        let mut session = match self.sessions.get_mut(&cmd.session_id) {
            Some(session) => session,
            None => {
                warn!(
                    session_id = %cmd.session_id,
                    event = cmd.command.event_name(),
                    "Command for unknown session"
                );
                return None;
            }
        };

        self.commands_relayed.fetch_add(1, Ordering::Relaxed);

        let envelope = serde_json::to_string(&cmd.command.envelope()).unwrap_or_default();
        debug!(
            session_id = %cmd.session_id,
            %envelope,
            latency_ms = unix_millis().saturating_sub(cmd.issued_at),
            "Command received"
        );

        match cmd.command {
            GameCommand::Move { direction } => {
                session.moves += 1;
                debug!(
                    session_id = %cmd.session_id,
                    %direction,
                    moves = session.moves,
                    "Move relayed"
                );
                Some(ServerMsg::MoveAccepted { direction })
            }
            GameCommand::AnimationComplete => None,
            GameCommand::ForceWin => {
                info!(session_id = %cmd.session_id, "Forced win");
                let confetti = generate_burst(&mut *self.rng.lock(), CONFETTI_BURST_SIZE);
                Some(ServerMsg::GameWon { confetti })
            }
            GameCommand::ForceLose => {
                info!(session_id = %cmd.session_id, "Forced loss");
                Some(ServerMsg::GameLost)
            }
        }
    }

    /// Queue a reply on the session's outbound channel without waiting.
    ///
    /// A session that stops reading loses replies instead of stalling the relay.
    pub fn deliver(&self, session_id: Uuid, reply: ServerMsg) -> bool {
        let Some(handle) = self.sessions.get(&session_id) else {
            return false;
        };

        match handle.outbound.try_send(reply) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(session_id = %session_id, "Outbound queue full, dropping reply");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(session_id = %session_id, "Outbound channel closed");
                false
            }
        }
    }

    /// Run the relay loop.
    ///
    /// The controller holds a command sender of its own, so the loop lives as
    /// long as the controller.
    pub async fn run(&self) {
        let Some(mut command_rx) = self.command_rx.lock().take() else {
            warn!("Relay loop already running");
            return;
        };

        info!("Relay controller started");

        while let Some(cmd) = command_rx.recv().await {
            if let Some(reply) = self.handle(&cmd) {
                self.deliver(cmd.session_id, reply);
            }
        }
    }
}
