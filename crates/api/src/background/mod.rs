//! Background jobs spawned alongside the HTTP server.

pub mod voting_sweep;
