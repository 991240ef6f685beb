// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Self-destruct timer.
//!
//! An encoded game set may carry an absolute expiry time (Unix seconds) in its
//! `ExpiryTime` header. The value is computed once per encode and stamped on
//! every game; decode reads it from the first game only and refuses to
//! proceed once it has passed.

use core::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::stego::error::StegoError;

/// Current time in whole seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Absolute expiry for a timer started at `now`. A zero or absent timer means
/// the payload never expires.
pub fn expiry_from_timer(now: u64, timer: Option<Duration>) -> Option<u64> {
    match timer {
        Some(t) if t.as_secs() > 0 => Some(now.saturating_add(t.as_secs())),
        _ => None,
    }
}

/// Time elapsed since expiry, rendered at a coarse unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub u64);

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0;
        if secs < 60 {
            write!(f, "{secs} seconds")
        } else if secs < 3600 {
            write!(f, "{} minutes", secs / 60)
        } else {
            write!(f, "{} hours", secs / 3600)
        }
    }
}

/// Fail with [`StegoError::Expired`] if `expiry` is strictly before `now`.
pub fn check_expiry(expiry: Option<u64>, now: u64) -> Result<(), StegoError> {
    match expiry {
        Some(expiry) if now > expiry => {
            let elapsed = Elapsed(now - expiry);
            tracing::warn!(expiry, now, %elapsed, "payload expired");
            Err(StegoError::Expired(elapsed))
        }
        Some(expiry) => {
            tracing::debug!(remaining = expiry - now, "payload still valid");
            Ok(())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_to_expiry() {
        assert_eq!(expiry_from_timer(1_000, Some(Duration::from_secs(60))), Some(1_060));
        assert_eq!(expiry_from_timer(1_000, Some(Duration::ZERO)), None);
        assert_eq!(expiry_from_timer(1_000, None), None);
    }

    #[test]
    fn elapsed_rendering() {
        assert_eq!(Elapsed(0).to_string(), "0 seconds");
        assert_eq!(Elapsed(59).to_string(), "59 seconds");
        assert_eq!(Elapsed(60).to_string(), "1 minutes");
        assert_eq!(Elapsed(3599).to_string(), "59 minutes");
        assert_eq!(Elapsed(3600).to_string(), "1 hours");
        assert_eq!(Elapsed(7 * 3600 + 3599).to_string(), "7 hours");
    }

    #[test]
    fn boundary_is_still_valid() {
        assert!(check_expiry(Some(500), 500).is_ok());
        assert!(check_expiry(Some(500), 499).is_ok());
        assert!(check_expiry(None, u64::MAX).is_ok());
    }

    #[test]
    fn past_expiry_fails() {
        match check_expiry(Some(500), 620) {
            Err(StegoError::Expired(elapsed)) => {
                assert_eq!(elapsed, Elapsed(120));
                assert_eq!(elapsed.to_string(), "2 minutes");
            }
            other => panic!("expected Expired, got {other:?}"),
        }
    }
}
