//! Rejections shown to the user and failures at the network boundary.

use thiserror::Error;

/// Why a user action stopped before touching local state or the network.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("Please enter a name.")]
    BlankName,
    #[error("{name} is already registered!")]
    DuplicateBettor { name: String },
    #[error("Please fill out all bet details correctly.")]
    NoBettor,
    #[error("Please fill out all bet details correctly.")]
    NoGolfer,
    #[error("Please fill out all bet details correctly.")]
    InvalidAmount,
    #[error("Could not find {golfer} in the table!")]
    GolferNotFound { golfer: String },
    #[error("Still waiting on the last change for {0}. Try again in a moment.")]
    Busy(String),
    #[error("Bet cancelled.")]
    Cancelled,
}

/// A snapshot payload that decoded but does not describe a consistent matrix.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("golferTotals has {got} entries for {expected} golfers")]
    GolferTotals { expected: usize, got: usize },
    #[error("betterTotals has {got} entries for {expected} named rows")]
    BetterTotals { expected: usize, got: usize },
    #[error("golfer {0:?} appears more than once in the header")]
    DuplicateGolfer(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] gloo::net::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("could not decode snapshot: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("bad snapshot: {0}")]
    BadSnapshot(#[from] ShapeError),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(#[from] gloo::net::Error),
    #[error("could not encode transaction: {0}")]
    Encode(#[from] serde_json::Error),
}
