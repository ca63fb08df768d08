//! Error type for contract violations at the core boundary.
//!
//! Normal play never produces one of these: moves, rotations and placement
//! checks answer with `bool`. An `Error` means the caller handed the engine
//! something it must never receive (a coordinate outside the board, a
//! malformed lock frame, an impossible configuration).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
