//! # Ferritel
//!
//! Async Telnet CLI automation for IOS-style network devices.
//!
//! Ferritel logs into a device over a raw Telnet console, optionally enters
//! privileged mode, and runs commands framed by the device's own prompts.
//! Typed getters turn the fixed-column output of common show commands into
//! records.
//!
//! ## Features
//!
//! - Async Telnet transport via tokio, refusing all option negotiation
//! - Tail-anchored prompt matching over a bounded search window
//! - Login and enable handshakes with positional credential retry
//! - Batch mode for nested input contexts such as banner text
//! - Device facts and interface status parsers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferritel::{Credentials, SessionBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ferritel::Error> {
//!     let credentials = Credentials::from_delimited(Some("admin"), Some("secret"), None);
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .credentials(credentials)
//!         .connect()
//!         .await?;
//!
//!     session.disable_paging().await?;
//!
//!     let response = session.command("show clock").await?;
//!     println!("{}", response.result);
//!
//!     for (name, interface) in session.get_interface_status(false, false).await? {
//!         println!("{name}: {}", interface.status);
//!     }
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod parse;
pub mod transport;

// Re-export main types for convenience
pub use driver::{
    CredentialPrompter, Credentials, NoPrompt, PrivilegeLevel, Response, Session, SessionBuilder,
};
pub use error::{CredentialKind, Error};
pub use parse::{Facts, InterfaceStatus, InterfaceTable};
pub use transport::TelnetConfig;
