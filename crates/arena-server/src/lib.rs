//! arena-server
//!
//! Multi-client async TCP server for staked chess match sessions.

pub mod config;
pub mod types;
pub mod server;

// these are internal modules, not re-exported
mod broadcast;
mod client;
mod dispatcher;
