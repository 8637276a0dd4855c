//! Login handshake.

use super::privilege::PrivilegeLevel;
use crate::channel::PromptKind;

/// Where the login handshake stands after a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// Nothing read yet.
    AwaitPrompt,
    /// Send the username at this position.
    SendUsername(usize),
    /// Send the password at this position.
    SendPassword(usize),
    /// A command prompt came back.
    Authenticated(PrivilegeLevel),
    /// Every credential position was rejected.
    Failed,
}

/// Login state machine with positional credential retry.
///
/// Username and password candidates are tried pairwise. A position is
/// considered rejected when the device asks again for a credential already
/// answered at that position, e.g. a fresh `Username:` after a password or a
/// second `Password:` in a row. The machine may visit the same state many
/// times; only the position advances.
#[derive(Debug, Clone)]
pub struct LoginMachine {
    state: LoginState,
    position: usize,
    sent_username: bool,
    sent_password: bool,
}

impl Default for LoginMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginMachine {
    pub fn new() -> Self {
        Self {
            state: LoginState::AwaitPrompt,
            position: 0,
            sent_username: false,
            sent_password: false,
        }
    }

    /// Credential position currently being tried.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance on a reply.
    ///
    /// `attempts` is the number of credential positions available, re-read
    /// on every call since lists can be filled in interactively mid-login.
    pub fn on_prompt(&mut self, kind: PromptKind, attempts: usize) -> LoginState {
        if self.state == LoginState::Failed {
            return self.state;
        }

        self.state = match kind {
            PromptKind::UserExec => LoginState::Authenticated(PrivilegeLevel::User),
            PromptKind::PrivilegedExec => LoginState::Authenticated(PrivilegeLevel::Privileged),
            PromptKind::Username => {
                if (self.sent_username || self.sent_password) && !self.advance(attempts) {
                    LoginState::Failed
                } else {
                    self.sent_username = true;
                    LoginState::SendUsername(self.position)
                }
            }
            PromptKind::Password => {
                if self.sent_password && !self.advance(attempts) {
                    LoginState::Failed
                } else {
                    self.sent_password = true;
                    LoginState::SendPassword(self.position)
                }
            }
        };

        self.state
    }

    /// Move to the next position; false if there is none.
    fn advance(&mut self, attempts: usize) -> bool {
        if self.position + 1 >= attempts {
            return false;
        }
        self.position += 1;
        self.sent_username = false;
        self.sent_password = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pair_accepted() {
        let mut machine = LoginMachine::new();
        assert_eq!(
            machine.on_prompt(PromptKind::Username, 2),
            LoginState::SendUsername(0)
        );
        assert_eq!(
            machine.on_prompt(PromptKind::Password, 2),
            LoginState::SendPassword(0)
        );
        assert_eq!(
            machine.on_prompt(PromptKind::UserExec, 2),
            LoginState::Authenticated(PrivilegeLevel::User)
        );
    }

    #[test]
    fn test_pairs_tried_in_order() {
        let mut machine = LoginMachine::new();
        let mut tried = Vec::new();

        for _ in 0..3 {
            if let LoginState::SendUsername(i) = machine.on_prompt(PromptKind::Username, 3) {
                tried.push(('u', i));
            }
            if let LoginState::SendPassword(i) = machine.on_prompt(PromptKind::Password, 3) {
                tried.push(('p', i));
            }
        }

        assert_eq!(
            tried,
            vec![('u', 0), ('p', 0), ('u', 1), ('p', 1), ('u', 2), ('p', 2)]
        );
        assert_eq!(
            machine.on_prompt(PromptKind::PrivilegedExec, 3),
            LoginState::Authenticated(PrivilegeLevel::Privileged)
        );
    }

    #[test]
    fn test_username_list_exhausted() {
        let mut machine = LoginMachine::new();
        machine.on_prompt(PromptKind::Username, 1);
        machine.on_prompt(PromptKind::Password, 1);
        assert_eq!(machine.on_prompt(PromptKind::Username, 1), LoginState::Failed);
        assert_eq!(machine.on_prompt(PromptKind::UserExec, 1), LoginState::Failed);
    }

    #[test]
    fn test_renewed_password_cue_exhausts_list() {
        let mut machine = LoginMachine::new();
        let mut sent = 0;

        loop {
            match machine.on_prompt(PromptKind::Password, 2) {
                LoginState::SendPassword(_) => sent += 1,
                LoginState::Failed => break,
                state => panic!("unexpected state {:?}", state),
            }
        }

        assert_eq!(sent, 2);
        assert_eq!(machine.position(), 1);
    }

    #[test]
    fn test_no_credentials_allows_one_attempt() {
        let mut machine = LoginMachine::new();
        assert_eq!(
            machine.on_prompt(PromptKind::Password, 1),
            LoginState::SendPassword(0)
        );
        assert_eq!(machine.on_prompt(PromptKind::Password, 1), LoginState::Failed);
    }

    #[test]
    fn test_already_logged_in() {
        let mut machine = LoginMachine::new();
        assert_eq!(
            machine.on_prompt(PromptKind::UserExec, 1),
            LoginState::Authenticated(PrivilegeLevel::User)
        );
    }
}
