//! Client-side pieces of the Triaxis telemetry system: the connection
//! endpoint that speaks the wire protocol, and the reading simulator
//! that stands in for a real sensor feed.

pub mod connection;
pub mod simulator;

pub use connection::Connection;
