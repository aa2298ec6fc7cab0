// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failure of a call against the expense backend.
///
/// Transport failures and application rejections are kept apart so the user
/// only ever sees server-provided text for the latter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Network error, timeout, undecodable body or a non-2xx status.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The server answered `{"success": false, "error": ...}`.
    #[error("{0}")]
    Rejected(String),
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Invalid(String),
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Text to show the user. `action` completes "Failed to ...".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApiError::Transport(_) => format!("Failed to {}. Please try again.", action),
            ApiError::Rejected(msg) | ApiError::Invalid(msg) => {
                if msg.trim().is_empty() {
                    format!("Failed to {}", action)
                } else {
                    msg.clone()
                }
            }
        }
    }
}

/// An error that has already been shown to the user; `main` only sets the
/// exit status for it.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Surfaced(pub String);

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
