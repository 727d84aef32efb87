//! Core shared types for the Triaxis sensor telemetry system.
//!
//! This crate defines all fundamental types used across the workspace.
//! No other crate should define shared types — everything lives here.

pub mod config;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Wall-clock stamp attached to a stored reading.
///
/// Both fields are plain strings because they travel on the wire in the
/// historical record format: `date` as `YYYY-MM-DD`, `time` as `HH:MM:SS`.
/// A historical reading must carry both or the record is malformed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    /// Capture date, `YYYY-MM-DD`.
    pub date: String,
    /// Capture time, `HH:MM:SS`.
    pub time: String,
}

impl Capture {
    /// Creates a `Capture` from pre-formatted date and time strings.
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }

    /// Stamps the current local wall-clock time.
    ///
    /// The server stamps readings with local time, matching the clock the
    /// operator reads on the collecting machine.
    pub fn now() -> Self {
        let now = chrono::Local::now();
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
        }
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One `(x, y, z)` sensor reading.
///
/// Live readings carry no capture stamp; historical readings (fetched from
/// the persistence backend) always carry one. The invariant that a
/// historical reading has both date and time set is enforced at the wire
/// codec boundary — a record missing either field is rejected there.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// X-axis value.
    pub x: i32,
    /// Y-axis value.
    pub y: i32,
    /// Z-axis value.
    pub z: i32,
    /// Capture stamp; `None` for live readings.
    pub captured_at: Option<Capture>,
}

impl Reading {
    /// Creates a live (unstamped) reading.
    pub fn live(x: i32, y: i32, z: i32) -> Self {
        Self {
            x,
            y,
            z,
            captured_at: None,
        }
    }

    /// Creates a historical reading with its capture stamp.
    pub fn historical(
        x: i32,
        y: i32,
        z: i32,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            x,
            y,
            z,
            captured_at: Some(Capture::new(date, time)),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.captured_at {
            Some(capture) => write!(f, "({}, {}, {}) @ {capture}", self.x, self.y, self.z),
            None => write!(f, "({}, {}, {})", self.x, self.y, self.z),
        }
    }
}

// ---------------------------------------------------------------------------
// TriaxisError
// ---------------------------------------------------------------------------

/// Central error type for the Triaxis system.
///
/// All crates in the workspace convert their internal errors into variants
/// of this enum, ensuring a unified error handling surface. Variants map
/// one-to-one onto the failure classes of the protocol: none of them is
/// fatal to a session except where the caller decides so.
#[derive(Debug, Error)]
pub enum TriaxisError {
    /// The transport to the server could not be established.
    #[error("connect error: {reason}")]
    Connect {
        /// Human-readable description of the connection failure.
        reason: String,
    },

    /// A wire token could not be encrypted or decrypted.
    #[error("cipher error: {reason}")]
    Cipher {
        /// Human-readable description of the cipher failure.
        reason: String,
    },

    /// A single record or field failed to parse. The record is dropped;
    /// the batch and the session continue.
    #[error("malformed field: {reason}")]
    MalformedField {
        /// Human-readable description of the parse failure.
        reason: String,
    },

    /// The persistence backend failed to store or fetch readings.
    #[error("backend error: {reason}")]
    Backend {
        /// Human-readable description of the storage failure.
        reason: String,
    },

    /// A mid-session I/O failure. Ends that session only.
    #[error("transport error: {reason}")]
    Transport {
        /// Human-readable description of the I/O failure.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    Config {
        /// Human-readable description of the configuration problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`TriaxisError`].
pub type Result<T> = std::result::Result<T, TriaxisError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
