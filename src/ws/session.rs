//! Per-connection event dispatch

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::game::{CommandSink, GameCommand, SinkError};
use crate::gesture::{Point, SwipeTracker};
use crate::util::time::localize;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// Owns the gesture state of one live socket and turns client events into
/// controller commands.
pub struct GestureSession<S> {
    session_id: Uuid,
    tracker: SwipeTracker,
    sink: S,
    allow_debug_commands: bool,
}

impl<S: CommandSink> GestureSession<S> {
    pub fn new(
        session_id: Uuid,
        sink: S,
        min_swipe_distance: f64,
        allow_debug_commands: bool,
    ) -> Self {
        Self {
            session_id,
            tracker: SwipeTracker::new(min_swipe_distance),
            sink,
            allow_debug_commands,
        }
    }

    #[cfg(test)]
    pub fn tracker(&self) -> &SwipeTracker {
        &self.tracker
    }

    /// Forget the in-flight gesture, if any
    pub fn cancel_gesture(&mut self) {
        self.tracker.cancel();
    }

    /// Handle one client event. Returns a direct reply for the client, if any.
    pub fn dispatch(&mut self, msg: ClientMsg) -> Option<ServerMsg> {
        match msg {
            ClientMsg::TouchStart { x, y, in_board } => {
                let suppress = self.tracker.touch_start(Point::new(x, y), in_board);
                trace!(session_id = %self.session_id, x, y, suppress, "Touch start");
                None
            }
            ClientMsg::TouchMove { in_board } => {
                let suppress = self.tracker.touch_move(in_board);
                trace!(session_id = %self.session_id, suppress, "Touch move");
                None
            }
            ClientMsg::TouchEnd { x, y } => {
                let direction = self.tracker.touch_end(Point::new(x, y))?;
                debug!(session_id = %self.session_id, %direction, "Swipe recognized");
                self.forward(GameCommand::Move { direction })
            }
            ClientMsg::TouchCancel => {
                self.cancel_gesture();
                None
            }
            ClientMsg::Move { direction } => self.forward(GameCommand::Move { direction }),
            ClientMsg::AnimationComplete => self.forward(GameCommand::AnimationComplete),
            ClientMsg::ForceWin => self.forward(GameCommand::ForceWin),
            ClientMsg::ForceLose => self.forward(GameCommand::ForceLose),
            ClientMsg::LocalizeTimes {
                timestamps,
                utc_offset_minutes,
                style,
            } => {
                let formatted = timestamps
                    .iter()
                    .map(|raw| localize(raw, utc_offset_minutes, style))
                    .collect();
                Some(ServerMsg::LocalTimes { formatted })
            }
            ClientMsg::Ping { t } => Some(ServerMsg::Pong { t }),
        }
    }

    fn forward(&mut self, command: GameCommand) -> Option<ServerMsg> {
        if command.is_debug() && !self.allow_debug_commands {
            warn!(
                session_id = %self.session_id,
                event = command.event_name(),
                "Debug command rejected"
            );
            return Some(ServerMsg::error("debug_disabled", "Debug commands are disabled"));
        }

        match self.sink.send_command(command) {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    error = %e,
                    event = command.event_name(),
                    "Failed to forward command"
                );
                let code = match e {
                    SinkError::Full => "busy",
                    SinkError::Closed => "unavailable",
                };
                Some(ServerMsg::error(code, e.to_string()))
            }
        }
    }
}
