//! Device sessions.
//!
//! The driver layer logs in, optionally enters privileged mode, and runs
//! commands and structured queries over a prompt channel.

mod builder;
mod credentials;
mod login;
mod privilege;
mod response;
mod session;

pub use builder::SessionBuilder;
pub use credentials::{CredentialPrompter, Credentials, DELIMITER, NoPrompt};
pub use login::{LoginMachine, LoginState};
pub use privilege::{ENABLE_COMMAND, EnableCue, EnableMachine, EnableStep, PrivilegeLevel};
pub use response::Response;
pub use session::{DISABLE_PAGING_COMMAND, Session, TIMESTAMP_FORMAT};
