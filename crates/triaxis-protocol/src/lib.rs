//! Wire codec for the Triaxis telemetry protocol.
//!
//! The protocol is line-oriented: one encrypted base64 token per
//! `\n`-terminated line. Before encryption, every message is one of
//! three plaintext shapes:
//!
//! - `DATA:x:<x>, y:<y>, z:<z>` — a live reading, fire-and-forget.
//! - `HISTORICAL_REQUEST:ALL` — ask for the full stored history.
//! - the history reply: records joined with `|`, or `NO_DATA`, or
//!   `ERROR:<reason>`.
//!
//! This crate is pure string encode/parse; [`frame`] is the only
//! module that touches the cipher codec, and nothing here performs
//! I/O. Field lists are parsed by literal prefix (`x:`, `y:`, `z:`,
//! `fecha:`, `hora:`), order-independent, with unknown prefixes
//! ignored; a malformed record invalidates only itself, never the
//! batch or the connection.

pub mod command;
pub mod frame;
pub mod history;
pub mod record;

pub use command::Command;
