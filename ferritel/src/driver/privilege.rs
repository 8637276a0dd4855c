//! Privilege levels and the enable handshake.

use serde::Serialize;

use crate::channel::patterns::{ENABLE_PASSWORD_CUE, PromptKind};

/// Command that asks the device for privileged EXEC mode.
pub const ENABLE_COMMAND: &str = "enable";

/// Privilege level of a session, read from its prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrivilegeLevel {
    /// User EXEC, prompt ends with `>`.
    User,
    /// Privileged EXEC, prompt ends with `#`.
    Privileged,
}

impl PrivilegeLevel {
    /// Level implied by a matched prompt, if it is a command prompt.
    pub fn from_prompt(kind: PromptKind) -> Option<Self> {
        match kind {
            PromptKind::UserExec => Some(PrivilegeLevel::User),
            PromptKind::PrivilegedExec => Some(PrivilegeLevel::Privileged),
            PromptKind::Username | PromptKind::Password => None,
        }
    }
}

/// What a reply to `enable` (or to an enable password) looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableCue {
    /// The device wants the enable password.
    PasswordPrompt,
    /// A privileged prompt came back.
    Privileged,
    /// Anything else, typically a rejection followed by the user prompt.
    Other,
}

impl EnableCue {
    /// Classify a reply read with authentication cues enabled, given the
    /// pattern that ended it and its last line.
    pub fn classify(kind: PromptKind, last_line: &str) -> Self {
        if last_line.contains(ENABLE_PASSWORD_CUE) {
            EnableCue::PasswordPrompt
        } else if kind == PromptKind::PrivilegedExec {
            EnableCue::Privileged
        } else {
            EnableCue::Other
        }
    }
}

/// Action the session takes after an enable reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableStep {
    /// Answer with the enable password at this index.
    SendPassword(usize),
    /// Answer with an empty line so the device gives up on the prompt.
    SendBlank,
    /// Send `enable` again and keep going.
    ResendEnable,
    /// Privileged mode reached.
    Succeeded,
    /// Candidates exhausted; the session stays in user mode.
    Failed,
}

/// Enable handshake with its own retry counter.
///
/// Each enable password is tried at most once, whether the device asks for
/// it again directly or drops back to the user prompt first. Once the list
/// runs out, the next password cue is answered with a blank line and the
/// following non-privileged reply ends the handshake.
///
/// `enable` is only resent after a rejected answer. A device that refuses
/// `enable` outright (`% No password set`) ends the handshake at once.
#[derive(Debug, Clone, Default)]
pub struct EnableMachine {
    retries: usize,
    exhausted: bool,

    /// A password or blank line was sent since the last `enable`.
    answered: bool,
}

impl EnableMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of password cues answered so far.
    pub fn retries(&self) -> usize {
        self.retries
    }

    /// Whether the candidate list has run out.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Advance on a reply, given how many enable passwords are available.
    pub fn on_reply(&mut self, cue: EnableCue, candidates: usize) -> EnableStep {
        match cue {
            EnableCue::PasswordPrompt => {
                let step = if self.has_candidate(candidates) {
                    EnableStep::SendPassword(self.retries)
                } else {
                    self.exhausted = true;
                    EnableStep::SendBlank
                };
                self.retries += 1;
                self.answered = true;
                step
            }
            EnableCue::Privileged => EnableStep::Succeeded,
            EnableCue::Other if self.answered && self.has_candidate(candidates) => {
                self.answered = false;
                EnableStep::ResendEnable
            }
            EnableCue::Other => {
                self.exhausted = true;
                EnableStep::Failed
            }
        }
    }

    fn has_candidate(&self, candidates: usize) -> bool {
        !self.exhausted && self.retries < candidates
    }
}
