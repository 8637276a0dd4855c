//! Error types for ferritel.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for ferritel operations.
#[derive(Error, Debug)]
pub enum Error {
    /// TCP/Telnet transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors (login, privilege escalation)
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Structured output parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Whether this error means the current device should be abandoned.
    ///
    /// Privilege escalation failures leave the session usable in user mode,
    /// and parse failures only affect the query that produced them. Every
    /// other error leaves the session in an unknown state.
    pub fn is_fatal_for_device(&self) -> bool {
        !matches!(
            self,
            Error::Driver(DriverError::PrivilegeEscalationFailed { .. }) | Error::Parse(_)
        )
    }

    /// Whether this error is a read timeout waiting for a prompt.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Channel(ChannelError::PatternTimeout(_))
                | Error::Transport(TransportError::Timeout(_))
        )
    }
}

/// Transport layer errors (TCP connection, socket I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connection establishment timed out
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors (prompt matching).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No expected prompt arrived within the read timeout
    #[error("Prompt not found within {0:?}")]
    PatternTimeout(Duration),

    /// Remote end closed the stream before a prompt was seen
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Which credential list a driver error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Username,
    Password,
    EnablePassword,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Username => write!(f, "username"),
            CredentialKind::Password => write!(f, "password"),
            CredentialKind::EnablePassword => write!(f, "enable password"),
        }
    }
}

/// Driver layer errors (login and privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Username and password lists have different lengths
    #[error(
        "Username and password lists must be the same length \
         ({usernames} usernames, {passwords} passwords)"
    )]
    CredentialMismatch { usernames: usize, passwords: usize },

    /// The device asked for a credential that was neither supplied nor prompted for
    #[error("No {kind} available for {host}")]
    MissingCredential { kind: CredentialKind, host: String },

    /// Every credential pair was rejected
    #[error("Authentication failed on {host} after {attempts} attempt(s)")]
    AuthenticationFailed { host: String, attempts: usize },

    /// Every enable password was rejected; the session stays in user mode
    #[error("Failed to enter privileged mode after {attempts} attempt(s)")]
    PrivilegeEscalationFailed { attempts: usize },
}

/// Structured output did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not enough lines in the reply
    #[error("'{query}' output has {found} line(s), expected at least {expected}")]
    TooFewLines {
        query: &'static str,
        expected: usize,
        found: usize,
    },

    /// Not enough whitespace-separated tokens on a line
    #[error("'{query}' output line {line} has {found} token(s), expected at least {expected}")]
    TooFewTokens {
        query: &'static str,
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type alias using ferritel's Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let escalation: Error = DriverError::PrivilegeEscalationFailed { attempts: 2 }.into();
        assert!(!escalation.is_fatal_for_device());

        let parse: Error = ParseError::TooFewLines {
            query: "show version",
            expected: 2,
            found: 0,
        }
        .into();
        assert!(!parse.is_fatal_for_device());

        let auth: Error = DriverError::AuthenticationFailed {
            host: "10.0.0.1".to_string(),
            attempts: 2,
        }
        .into();
        assert!(auth.is_fatal_for_device());

        let timeout: Error = ChannelError::PatternTimeout(Duration::from_secs(7)).into();
        assert!(timeout.is_fatal_for_device());
        assert!(timeout.is_timeout());
    }

    #[test]
    fn test_mismatch_message() {
        let err = DriverError::CredentialMismatch {
            usernames: 2,
            passwords: 1,
        };
        assert_eq!(
            err.to_string(),
            "Username and password lists must be the same length (2 usernames, 1 passwords)"
        );
    }
}
