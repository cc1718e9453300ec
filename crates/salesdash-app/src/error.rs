// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Failure of a single query against a sales rep source.
///
/// These never escape the table controller; `complete_fetch` turns them into
/// the visible error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl FetchError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Rejected { .. } => "rejected",
        }
    }
}
