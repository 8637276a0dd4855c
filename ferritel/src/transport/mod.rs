//! Telnet transport layer over TCP.
//!
//! This module provides the low-level connection management: opening the
//! socket, stripping Telnet command sequences and writing raw bytes.

pub mod config;
pub mod negotiation;
mod telnet;

pub use config::TelnetConfig;
pub use telnet::TelnetTransport;
