//! Process lifecycle.
//!
//! Ctrl+C or an explicit trigger fans out over a broadcast channel; the HTTP
//! server stops accepting, finishes in-flight requests, then returns.

pub mod shutdown;

pub use shutdown::Shutdown;
