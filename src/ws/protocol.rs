//! Live socket message definitions
//! These are the wire types between the board page and the server

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::effects::ConfettiPiece;
use crate::gesture::Direction;
use crate::util::time::TimeStyle;

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// First touch point of a gesture
    TouchStart {
        x: f64,
        y: f64,
        /// Touch target is inside the board container
        #[serde(default)]
        in_board: bool,
    },

    TouchMove {
        #[serde(default)]
        in_board: bool,
    },

    /// Last touch point of a gesture
    TouchEnd { x: f64, y: f64 },

    /// Platform aborted the touch sequence
    TouchCancel,

    /// Already-classified move (keyboard or client-side recognizer)
    Move { direction: Direction },

    /// Tile animation finished on the client
    AnimationComplete,

    /// Debug hook from the browser console
    ForceWin,

    /// Debug hook from the browser console
    ForceLose,

    /// Render UTC timestamps in the viewer's offset
    LocalizeTimes {
        timestamps: Vec<String>,
        /// Minutes east of UTC
        #[serde(default)]
        utc_offset_minutes: i32,
        #[serde(default)]
        style: TimeStyle,
    },

    /// Ping for latency measurement
    Ping {
        /// Client timestamp
        t: u64,
    },
}

impl ClientMsg {
    /// Touch moves and gesture endings are exempt from the per-session limit
    pub fn counts_toward_rate_limit(&self) -> bool {
        !matches!(
            self,
            ClientMsg::TouchMove { .. } | ClientMsg::TouchEnd { .. } | ClientMsg::TouchCancel
        )
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Welcome message after connection
    Welcome {
        session_id: Uuid,
        server_time: u64,
        min_swipe_distance: f64,
    },

    /// Controller took the move
    MoveAccepted { direction: Direction },

    /// Game won, with confetti to add to the celebration overlay
    GameWon { confetti: Vec<ConfettiPiece> },

    GameLost,

    /// One entry per requested timestamp; `None` leaves the element as is
    LocalTimes { formatted: Vec<Option<String>> },

    /// Error message
    Error { code: String, message: String },

    /// Pong response
    Pong {
        /// Echo back client timestamp
        t: u64,
    },
}

impl ServerMsg {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_touch_messages() {
        let start: ClientMsg =
            serde_json::from_str(r#"{"type":"touch_start","x":12.5,"y":40,"in_board":true}"#)
                .unwrap();
        match start {
            ClientMsg::TouchStart { x, y, in_board } => {
                assert_eq!((x, y), (12.5, 40.0));
                assert!(in_board);
            }
            other => panic!("unexpected message: {:?}", other),
        }

        let end: ClientMsg = serde_json::from_str(r#"{"type":"touch_end","x":0,"y":0}"#).unwrap();
        assert!(matches!(end, ClientMsg::TouchEnd { x, y } if x == 0.0 && y == 0.0));

        let cancel: ClientMsg = serde_json::from_str(r#"{"type":"touch_cancel"}"#).unwrap();
        assert!(matches!(cancel, ClientMsg::TouchCancel));

        let mv: ClientMsg = serde_json::from_str(r#"{"type":"touch_move"}"#).unwrap();
        assert!(matches!(mv, ClientMsg::TouchMove { in_board: false }));
    }

    #[test]
    fn test_parse_commands() {
        let mv: ClientMsg =
            serde_json::from_str(r#"{"type":"move","direction":"left"}"#).unwrap();
        assert!(matches!(
            mv,
            ClientMsg::Move {
                direction: Direction::Left
            }
        ));

        let win: ClientMsg = serde_json::from_str(r#"{"type":"force_win"}"#).unwrap();
        assert!(matches!(win, ClientMsg::ForceWin));

        let bad = serde_json::from_str::<ClientMsg>(r#"{"type":"move","direction":"diagonal"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_gesture_continuations_are_not_throttled() {
        assert!(!ClientMsg::TouchMove { in_board: true }.counts_toward_rate_limit());
        assert!(!ClientMsg::TouchEnd { x: 1.0, y: 2.0 }.counts_toward_rate_limit());
        assert!(!ClientMsg::TouchCancel.counts_toward_rate_limit());

        assert!(ClientMsg::TouchStart {
            x: 0.0,
            y: 0.0,
            in_board: true
        }
        .counts_toward_rate_limit());
        assert!(ClientMsg::Ping { t: 1 }.counts_toward_rate_limit());
        assert!(ClientMsg::ForceWin.counts_toward_rate_limit());
    }

    #[test]
    fn test_localize_defaults() {
        let msg: ClientMsg = serde_json::from_str(
            r#"{"type":"localize_times","timestamps":["2024-03-20T16:36:00"]}"#,
        )
        .unwrap();
        match msg {
            ClientMsg::LocalizeTimes {
                timestamps,
                utc_offset_minutes,
                style,
            } => {
                assert_eq!(timestamps.len(), 1);
                assert_eq!(utc_offset_minutes, 0);
                assert_eq!(style, TimeStyle::Short);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_server_msg_shape() {
        let json = serde_json::to_value(ServerMsg::MoveAccepted {
            direction: Direction::Up,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "move_accepted", "direction": "up" })
        );

        let json = serde_json::to_value(ServerMsg::GameLost).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "game_lost" }));

        let json = serde_json::to_value(ServerMsg::error("rate_limited", "slow down")).unwrap();
        assert_eq!(json["code"], "rate_limited");
    }
}
