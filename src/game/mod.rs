//! Commands forwarded to the game controller
//!
//! Board state lives with the controller. This side only names intents and
//! hands them over through a [`CommandSink`].

pub mod controller;

pub use controller::RelayController;

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::gesture::Direction;
use crate::util::time::unix_millis;

/// Intent sent to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Move { direction: Direction },
    AnimationComplete,
    /// Debug hook: declare the current game won
    ForceWin,
    /// Debug hook: declare the current game lost
    ForceLose,
}

impl GameCommand {
    pub fn event_name(&self) -> &'static str {
        match self {
            GameCommand::Move { .. } => "move",
            GameCommand::AnimationComplete => "animation_complete",
            GameCommand::ForceWin => "force_win",
            GameCommand::ForceLose => "force_lose",
        }
    }

    pub fn payload(&self) -> serde_json::Value {
        match self {
            GameCommand::Move { direction } => serde_json::json!({ "direction": direction }),
            _ => serde_json::json!({}),
        }
    }

    /// Named event envelope as it travels on the update channel
    pub fn envelope(&self) -> CommandEnvelope {
        CommandEnvelope {
            event: self.event_name(),
            payload: self.payload(),
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, GameCommand::ForceWin | GameCommand::ForceLose)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEnvelope {
    pub event: &'static str,
    pub payload: serde_json::Value,
}

/// Command tagged with its originating session
#[derive(Debug, Clone)]
pub struct SessionCommand {
    pub session_id: Uuid,
    pub command: GameCommand,
    pub issued_at: u64,
}

/// Capability for delivering commands to the controller
pub trait CommandSink {
    fn send_command(&self, command: GameCommand) -> Result<(), SinkError>;
}

/// Sink errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("Command channel closed")]
    Closed,

    #[error("Command channel full")]
    Full,
}

/// Sink backed by the controller's command channel.
///
/// Uses `try_send` so it can be called from synchronous event handling.
#[derive(Clone)]
pub struct ChannelSink {
    session_id: Uuid,
    tx: mpsc::Sender<SessionCommand>,
}

impl ChannelSink {
    pub fn new(session_id: Uuid, tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { session_id, tx }
    }
}

impl CommandSink for ChannelSink {
    fn send_command(&self, command: GameCommand) -> Result<(), SinkError> {
        let cmd = SessionCommand {
            session_id: self.session_id,
            command,
            issued_at: unix_millis(),
        };
        self.tx.try_send(cmd).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SinkError::Full,
            mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_envelope() {
        let cmd = GameCommand::Move {
            direction: Direction::Left,
        };
        let json = serde_json::to_value(cmd.envelope()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "move", "payload": { "direction": "left" } })
        );
    }

    #[test]
    fn test_unit_envelopes_carry_empty_payload() {
        for (cmd, name) in [
            (GameCommand::AnimationComplete, "animation_complete"),
            (GameCommand::ForceWin, "force_win"),
            (GameCommand::ForceLose, "force_lose"),
        ] {
            let envelope = cmd.envelope();
            assert_eq!(envelope.event, name);
            assert_eq!(envelope.payload, serde_json::json!({}));
        }
        assert!(GameCommand::ForceWin.is_debug());
        assert!(!GameCommand::AnimationComplete.is_debug());
    }

    #[test]
    fn test_channel_sink_delivers_tagged_command() {
        let (tx, mut rx) = mpsc::channel(4);
        let session_id = Uuid::new_v4();
        let sink = ChannelSink::new(session_id, tx);

        sink.send_command(GameCommand::Move {
            direction: Direction::Up,
        })
        .unwrap();

        let received = tokio_test::block_on(rx.recv()).unwrap();
        assert_eq!(received.session_id, session_id);
        assert_eq!(
            received.command,
            GameCommand::Move {
                direction: Direction::Up
            }
        );
    }

    #[test]
    fn test_channel_sink_errors() {
        let (tx, rx) = mpsc::channel(1);
        let sink = ChannelSink::new(Uuid::new_v4(), tx);
        sink.send_command(GameCommand::AnimationComplete).unwrap();
        assert_eq!(
            sink.send_command(GameCommand::AnimationComplete),
            Err(SinkError::Full)
        );

        drop(rx);
        assert_eq!(
            sink.send_command(GameCommand::AnimationComplete),
            Err(SinkError::Closed)
        );
    }
}
