// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Quiet time required before a burst of triggers fires a refresh.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Waits for a trigger, then keeps replacing it with newer ones until
/// `delay` passes without another. Returns `None` once the channel is
/// closed and drained.
pub fn next_settled<T>(rx: &Receiver<T>, delay: Duration) -> Option<T> {
    let mut latest = rx.recv().ok()?;
    loop {
        match rx.recv_timeout(delay) {
            Ok(v) => latest = v,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                return Some(latest);
            }
        }
    }
}
