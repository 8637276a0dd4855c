//! Prompt patterns for IOS-style consoles.

use regex::bytes::Regex;

/// Trailing character of an unprivileged (user EXEC) prompt.
pub const USER_PROMPT: &str = ">";

/// Trailing character of a privileged EXEC prompt.
pub const PRIVILEGED_PROMPT: &str = "#";

/// Login username cue. The leading letter is left off so `Username:`,
/// `username:` and wrapped variants all match.
pub const USERNAME_CUE: &str = "sername:";

/// Login password cue, truncated the same way.
pub const PASSWORD_CUE: &str = "assword:";

/// Password cue shown by `enable`.
pub const ENABLE_PASSWORD_CUE: &str = "Password:";

/// Which expected pattern ended a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Line ending in `>`.
    UserExec,
    /// Line ending in `#`.
    PrivilegedExec,
    /// Username cue.
    Username,
    /// Password cue.
    Password,
}

/// The compiled set of patterns a read can wait on.
///
/// Command prompts are always candidates; authentication cues are added
/// only while logging in or escalating.
#[derive(Debug, Clone)]
pub struct PromptSet {
    command: Vec<(PromptKind, Regex)>,
    auth: Vec<(PromptKind, Regex)>,
}

impl PromptSet {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            command: vec![
                (PromptKind::UserExec, compile_prompt_pattern(&regex::escape(USER_PROMPT))?),
                (
                    PromptKind::PrivilegedExec,
                    compile_prompt_pattern(&regex::escape(PRIVILEGED_PROMPT))?,
                ),
            ],
            auth: vec![
                (PromptKind::Username, compile_prompt_pattern(&regex::escape(USERNAME_CUE))?),
                (PromptKind::Password, compile_prompt_pattern(&regex::escape(PASSWORD_CUE))?),
            ],
        })
    }

    /// Return the first pattern, in candidate order, matching the end of `tail`.
    pub fn find(&self, tail: &[u8], expect_auth: bool) -> Option<PromptKind> {
        let auth: &[(PromptKind, Regex)] = if expect_auth { &self.auth } else { &[] };

        self.command
            .iter()
            .chain(auth)
            .find(|(_, pattern)| pattern.is_match(tail))
            .map(|(kind, _)| *kind)
    }
}

/// Compile a prompt pattern string into a regex.
///
/// Anchors to the end of the data (allowing trailing whitespace) unless the
/// pattern already carries an anchor.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with('$') || pattern.ends_with("\\s*$") {
        pattern.to_string()
    } else {
        format!("{}\\s*$", pattern)
    };

    Regex::new(&pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_prompts() {
        let prompts = PromptSet::new().unwrap();
        assert_eq!(prompts.find(b"Switch1>", false), Some(PromptKind::UserExec));
        assert_eq!(
            prompts.find(b"show clock\r\n*10:00:00.000 UTC Mon\r\nSwitch1#", false),
            Some(PromptKind::PrivilegedExec)
        );
        assert_eq!(prompts.find(b"Switch1# ", false), Some(PromptKind::PrivilegedExec));
        assert_eq!(prompts.find(b"<banner> still printing", false), None);
    }

    #[test]
    fn test_auth_cues_only_when_expected() {
        let prompts = PromptSet::new().unwrap();
        let username = b"User Access Verification\r\n\r\nUsername: ";

        assert_eq!(prompts.find(username, false), None);
        assert_eq!(prompts.find(username, true), Some(PromptKind::Username));
        assert_eq!(prompts.find(b"Password: ", true), Some(PromptKind::Password));
        assert_eq!(prompts.find(b"password:", true), Some(PromptKind::Password));
    }

    #[test]
    fn test_compile_prompt_pattern() {
        let pattern = compile_prompt_pattern(r"router#").unwrap();
        assert!(pattern.is_match(b"router# "));

        let pattern = compile_prompt_pattern(r"router#$").unwrap();
        assert!(pattern.is_match(b"router#"));
        assert!(!pattern.is_match(b"router# "));
    }
}
