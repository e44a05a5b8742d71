//! Upload endpoint server
//!
//! Accept loop and per-connection sessions in front of the file store.

pub mod listener;
pub mod session;

pub use listener::Server;
