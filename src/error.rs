//! Failure types surfaced through the per-operation error record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A collaborator call failed. The value is stored verbatim in the error
/// record; it is never returned to the caller of `search`/`add_review`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PlatformError {
    #[error("network error: {0}")]
    Network(String),
    #[error("platform returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("failed to decode platform response: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Which operation an error slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Search,
    AddReview,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Search => f.write_str("search"),
            Operation::AddReview => f.write_str("addReview"),
        }
    }
}

/// Last failure of each operation. The two slots are independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewErrors {
    pub search: Option<PlatformError>,
    pub add_review: Option<PlatformError>,
}

impl ReviewErrors {
    pub fn get(&self, op: Operation) -> Option<&PlatformError> {
        match op {
            Operation::Search => self.search.as_ref(),
            Operation::AddReview => self.add_review.as_ref(),
        }
    }

    /// Overwrite one slot, leaving the other untouched.
    pub fn set(&mut self, op: Operation, err: Option<PlatformError>) {
        match op {
            Operation::Search => self.search = err,
            Operation::AddReview => self.add_review = err,
        }
    }
}
