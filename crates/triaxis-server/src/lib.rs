//! Collecting server for the Triaxis telemetry protocol.
//!
//! [`server::TelemetryServer`] owns the listening socket and the
//! accept loop; [`session`] runs one independent worker per accepted
//! connection. Workers share nothing except the persistence backend,
//! and no failure in one session can reach another.

pub mod server;
pub mod session;

pub use server::{ServerHandle, TelemetryServer};
