// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analysis;
pub mod categories;
pub mod currency;
pub mod exporter;
pub mod reports;
pub mod settings;
pub mod transactions;

use crate::error::ApiError;

/// Turns a backend error into the message the user should see.
pub(crate) fn user_error(e: ApiError, action: &str) -> anyhow::Error {
    anyhow::anyhow!(e.user_message(action))
}
