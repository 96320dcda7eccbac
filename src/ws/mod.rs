//! Live socket: wire protocol, upgrade handler and per-connection session

pub mod handler;
pub mod protocol;
pub mod session;
