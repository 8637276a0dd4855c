//! Candidate credential lists and interactive prompting.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{CredentialKind, DriverError, Result};

/// Separator for credential lists given as a single string.
pub const DELIMITER: char = ',';

/// Ordered credential candidates for one or more devices.
///
/// Usernames and passwords are tried pairwise by position; the two lists
/// must have the same length whenever both are present. Enable passwords
/// are tried in order, independently of the login position.
///
/// After a successful login the session hands back its (possibly
/// prompted-for) credentials so the caller can pass them to the next
/// device without asking again.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    usernames: Vec<String>,
    passwords: Vec<SecretString>,
    enable_passwords: Vec<SecretString>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from comma-delimited strings. `None` means "not supplied".
    ///
    /// ```rust
    /// use ferritel::Credentials;
    ///
    /// let creds = Credentials::from_delimited(Some("admin,backup"), Some("s3cret,old"), None);
    /// assert_eq!(creds.usernames(), ["admin", "backup"]);
    /// assert_eq!(creds.login_attempts(), 2);
    /// ```
    pub fn from_delimited(
        usernames: Option<&str>,
        passwords: Option<&str>,
        enable_passwords: Option<&str>,
    ) -> Self {
        Self {
            usernames: usernames.map(split_list).unwrap_or_default(),
            passwords: passwords.map(split_secrets).unwrap_or_default(),
            enable_passwords: enable_passwords.map(split_secrets).unwrap_or_default(),
        }
    }

    /// Set the username candidates.
    pub fn with_usernames<I, T>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.usernames = usernames.into_iter().map(Into::into).collect();
        self
    }

    /// Set the login password candidates.
    pub fn with_passwords<I, T>(mut self, passwords: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.passwords = passwords
            .into_iter()
            .map(|p| SecretString::from(Into::<String>::into(p)))
            .collect();
        self
    }

    /// Set the enable password candidates.
    pub fn with_enable_passwords<I, T>(mut self, passwords: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.enable_passwords = passwords
            .into_iter()
            .map(|p| SecretString::from(Into::<String>::into(p)))
            .collect();
        self
    }

    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    pub fn passwords(&self) -> &[SecretString] {
        &self.passwords
    }

    pub fn enable_passwords(&self) -> &[SecretString] {
        &self.enable_passwords
    }

    /// Check the pairing invariant between usernames and passwords.
    pub fn validate(&self) -> Result<()> {
        if !self.usernames.is_empty()
            && !self.passwords.is_empty()
            && self.usernames.len() != self.passwords.len()
        {
            return Err(DriverError::CredentialMismatch {
                usernames: self.usernames.len(),
                passwords: self.passwords.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Number of login positions that can be tried.
    pub fn login_attempts(&self) -> usize {
        self.usernames.len().max(self.passwords.len()).max(1)
    }

    pub(crate) fn set_usernames(&mut self, line: &str) {
        self.usernames = split_list(line);
    }

    pub(crate) fn set_passwords(&mut self, secret: &SecretString) {
        self.passwords = split_secret(secret);
    }

    pub(crate) fn set_enable_passwords(&mut self, secret: &SecretString) {
        self.enable_passwords = split_secret(secret);
    }
}

fn split_list(line: &str) -> Vec<String> {
    line.split(DELIMITER).map(str::to_string).collect()
}

fn split_secrets(line: &str) -> Vec<SecretString> {
    line.split(DELIMITER)
        .map(|s| SecretString::from(s.to_string()))
        .collect()
}

fn split_secret(secret: &SecretString) -> Vec<SecretString> {
    split_secrets(secret.expose_secret())
}

/// Source of credentials the device asks for but the caller did not supply.
///
/// Console front-ends implement this with a terminal prompt (masked for
/// passwords); the answer may itself be a comma-delimited list.
pub trait CredentialPrompter: Send {
    /// Ask for a username.
    fn username(&mut self, host: &str) -> Option<String>;

    /// Ask for a login or enable password.
    fn password(&mut self, host: &str, kind: CredentialKind) -> Option<SecretString>;
}

/// Prompter that never answers; missing credentials become errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl CredentialPrompter for NoPrompt {
    fn username(&mut self, _host: &str) -> Option<String> {
        None
    }

    fn password(&mut self, _host: &str, _kind: CredentialKind) -> Option<SecretString> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_delimited() {
        let creds = Credentials::from_delimited(Some("admin,ops"), Some("a,b"), Some("en1"));
        assert_eq!(creds.usernames(), ["admin", "ops"]);
        assert_eq!(creds.passwords()[1].expose_secret(), "b");
        assert_eq!(creds.enable_passwords().len(), 1);
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_mismatch_is_rejected() {
        let creds = Credentials::from_delimited(Some("admin,ops"), Some("only-one"), None);
        let err = creds.validate().unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Driver(DriverError::CredentialMismatch {
                usernames: 2,
                passwords: 1
            })
        ));
    }

    #[test]
    fn test_password_only_lists() {
        let creds = Credentials::new().with_passwords(["one", "two"]);
        assert!(creds.validate().is_ok());
        assert_eq!(creds.login_attempts(), 2);
        assert_eq!(Credentials::new().login_attempts(), 1);
    }

    #[test]
    fn test_prompted_values_are_split() {
        let mut creds = Credentials::new();
        creds.set_usernames("admin,ops");
        creds.set_passwords(&SecretString::from("x,y".to_string()));
        assert_eq!(creds.usernames().len(), 2);
        assert_eq!(creds.passwords()[0].expose_secret(), "x");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let creds = Credentials::new().with_passwords(["hunter2"]);
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
