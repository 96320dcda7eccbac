//! Visual effects attached to server events

pub mod confetti;

pub use confetti::{generate_burst, ConfettiPiece, CONFETTI_BURST_SIZE};
