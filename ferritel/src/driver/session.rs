//! Logged-in device session.

use std::time::Instant;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::credentials::{CredentialPrompter, Credentials};
use super::login::{LoginMachine, LoginState};
use super::privilege::{ENABLE_COMMAND, EnableCue, EnableMachine, EnableStep, PrivilegeLevel};
use super::response::Response;
use crate::channel::{PromptChannel, PromptMatch};
use crate::error::{CredentialKind, DriverError, Result};
use crate::parse::{
    FACTS_COMMAND, Facts, INTERFACE_DESCRIPTION_COMMAND, INTERFACE_STATUS_COMMAND,
    InterfaceTable, POWER_INLINE_COMMAND, merge_descriptions, merge_power, parse_facts,
    parse_interface_list, parse_interface_status,
};
use crate::transport::TelnetConfig;

/// Format of connection and query timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Command that turns off `--More--` paging.
pub const DISABLE_PAGING_COMMAND: &str = "terminal length 0";

/// Ctrl-Z, leaves any nested input mode.
const END_OF_INPUT: &str = "\x1a";

/// Command that ends the console session.
const EXIT_COMMAND: &str = "exit";

/// One authenticated connection to one device.
///
/// Created by [`SessionBuilder`](super::SessionBuilder), which performs the
/// login handshake. All methods run to completion on the caller's task;
/// there is exactly one outstanding read or write at a time.
pub struct Session<S = TcpStream> {
    channel: PromptChannel<S>,
    config: TelnetConfig,
    credentials: Credentials,
    prompter: Box<dyn CredentialPrompter>,
    privilege: PrivilegeLevel,

    /// Device name taken from its prompt.
    hostname: String,

    connected_at: DateTime<Local>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub(crate) async fn open(
        channel: PromptChannel<S>,
        config: TelnetConfig,
        credentials: Credentials,
        prompter: Box<dyn CredentialPrompter>,
    ) -> Result<Self> {
        let mut session = Self {
            channel,
            config,
            credentials,
            prompter,
            privilege: PrivilegeLevel::User,
            hostname: String::new(),
            connected_at: Local::now(),
        };

        session.login().await?;

        if !session.config.quiet {
            info!("Login successful");
        }
        debug!(
            "{}: logged in to {} at {:?} level",
            session.config.host, session.hostname, session.privilege
        );

        Ok(session)
    }

    async fn login(&mut self) -> Result<()> {
        let mut machine = LoginMachine::new();
        let mut reply = self.channel.read_until_prompt(true).await?;

        loop {
            let position = machine.position();
            let state = machine.on_prompt(reply.kind, self.credentials.login_attempts());
            if machine.position() != position {
                warn!(
                    "{}: wrong login/password, trying next one in list",
                    self.config.host
                );
            }

            match state {
                LoginState::SendUsername(index) => {
                    let username = self.username(index)?;
                    self.channel.send_line(&username).await?;
                }
                LoginState::SendPassword(index) => {
                    let password = self.password(index)?;
                    self.channel.send_secret_line(password.expose_secret()).await?;
                }
                LoginState::Authenticated(level) => {
                    self.privilege = level;
                    self.hostname = hostname_from_prompt(reply.last_line()).to_string();
                    return Ok(());
                }
                LoginState::Failed => {
                    warn!("{}: wrong login/password", self.config.host);
                    return Err(DriverError::AuthenticationFailed {
                        host: self.config.host.clone(),
                        attempts: machine.position() + 1,
                    }
                    .into());
                }
                LoginState::AwaitPrompt => {}
            }

            reply = self.channel.read_until_prompt(true).await?;
        }
    }

    fn username(&mut self, index: usize) -> Result<String> {
        if self.credentials.usernames().is_empty() {
            if let Some(line) = self.prompter.username(&self.config.host) {
                self.credentials.set_usernames(&line);
                self.credentials.validate()?;
            }
        }

        self.credentials
            .usernames()
            .get(index)
            .cloned()
            .ok_or_else(|| self.missing(CredentialKind::Username))
    }

    fn password(&mut self, index: usize) -> Result<SecretString> {
        if self.credentials.passwords().is_empty() {
            if let Some(secret) = self
                .prompter
                .password(&self.config.host, CredentialKind::Password)
            {
                self.credentials.set_passwords(&secret);
                self.credentials.validate()?;
            }
        }

        self.credentials
            .passwords()
            .get(index)
            .cloned()
            .ok_or_else(|| self.missing(CredentialKind::Password))
    }

    fn missing(&self, kind: CredentialKind) -> crate::Error {
        DriverError::MissingCredential {
            kind,
            host: self.config.host.clone(),
        }
        .into()
    }

    /// Enter privileged EXEC mode.
    ///
    /// Does nothing if the session is already privileged. Each enable
    /// password is tried once. When all are rejected the session stays in
    /// user mode and the returned
    /// [`PrivilegeEscalationFailed`](DriverError::PrivilegeEscalationFailed)
    /// is not fatal: unprivileged commands keep working.
    pub async fn escalate(&mut self) -> Result<()> {
        if self.is_privileged() {
            return Ok(());
        }

        let mut machine = EnableMachine::new();
        self.channel.send_line(ENABLE_COMMAND).await?;

        loop {
            let reply = self.channel.read_until_prompt(true).await?;
            let cue = EnableCue::classify(reply.kind, reply.last_line());

            if cue == EnableCue::PasswordPrompt
                && !machine.is_exhausted()
                && self.credentials.enable_passwords().is_empty()
            {
                if let Some(secret) = self
                    .prompter
                    .password(&self.config.host, CredentialKind::EnablePassword)
                {
                    self.credentials.set_enable_passwords(&secret);
                }
            }

            let candidates = self.credentials.enable_passwords().len();
            match machine.on_reply(cue, candidates) {
                EnableStep::SendPassword(index) => {
                    let secret = self
                        .credentials
                        .enable_passwords()
                        .get(index)
                        .cloned()
                        .ok_or_else(|| self.missing(CredentialKind::EnablePassword))?;
                    self.channel.send_secret_line(secret.expose_secret()).await?;
                }
                EnableStep::SendBlank => self.channel.send_line("").await?,
                EnableStep::ResendEnable => {
                    debug!("{}: enable password rejected", self.config.host);
                    self.channel.send_line(ENABLE_COMMAND).await?;
                }
                EnableStep::Succeeded => {
                    self.privilege = PrivilegeLevel::Privileged;
                    debug!("{}: privileged mode", self.config.host);
                    return Ok(());
                }
                EnableStep::Failed => {
                    self.track_prompt(&reply);
                    warn!("{}: wrong password, can't go into enable mode", self.config.host);
                    return Err(DriverError::PrivilegeEscalationFailed {
                        attempts: machine.retries().min(candidates),
                    }
                    .into());
                }
            }
        }
    }

    /// Send one line of input.
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        self.channel.send_line(command).await
    }

    /// Read everything up to the next command prompt.
    pub async fn read_response(&mut self) -> Result<String> {
        let reply = self.channel.read_until_prompt(false).await?;
        self.track_prompt(&reply);
        Ok(reply.text)
    }

    /// Send a command and collect its cleaned-up output.
    pub async fn command(&mut self, command: &str) -> Result<Response> {
        let start = Instant::now();
        self.send_command(command).await?;

        let reply = self.channel.read_until_prompt(false).await?;
        self.track_prompt(&reply);
        let prompt = reply.last_line().to_string();

        Ok(Response::new(command, reply.text, prompt, start.elapsed()))
    }

    /// Turn off output paging for the rest of the session.
    pub async fn disable_paging(&mut self) -> Result<()> {
        self.command(DISABLE_PAGING_COMMAND).await.map(|_| ())
    }

    /// Query hostname, model and uptime.
    pub async fn get_facts(&mut self) -> Result<Facts> {
        let when = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let reply = self.query(FACTS_COMMAND).await?;
        Ok(parse_facts(&reply, self.config.host.as_str(), when)?)
    }

    /// Query the names of all switchports.
    pub async fn get_interface_list(&mut self) -> Result<Vec<String>> {
        let reply = self.query(INTERFACE_STATUS_COMMAND).await?;
        Ok(parse_interface_list(&reply))
    }

    /// Query the interface status table, optionally with untruncated
    /// descriptions and PoE draw (one extra command each).
    pub async fn get_interface_status(
        &mut self,
        full_description: bool,
        power: bool,
    ) -> Result<InterfaceTable> {
        let reply = self.query(INTERFACE_STATUS_COMMAND).await?;
        let mut table = parse_interface_status(&reply);

        if full_description {
            let reply = self.query(INTERFACE_DESCRIPTION_COMMAND).await?;
            merge_descriptions(&mut table, &reply);
        }

        if power {
            let reply = self.query(POWER_INLINE_COMMAND).await?;
            merge_power(&mut table, &reply);
        }

        Ok(table)
    }

    async fn query(&mut self, command: &str) -> Result<String> {
        self.send_command(command).await?;
        self.read_response().await
    }

    /// Send commands without reading between them, then log out and
    /// collect everything the device printed.
    ///
    /// For input the prompt reader cannot frame, such as banner text. The
    /// batch ends with Ctrl-Z and `exit`; the connection is closed when the
    /// device hangs up (or after the configured drain limit).
    pub async fn send_batch(mut self, commands: &[&str]) -> Result<String> {
        self.channel.send_line("").await?;
        for command in commands {
            self.channel.send_line(command).await?;
            tokio::time::sleep(self.config.batch_delay).await;
        }
        self.channel.send_line(END_OF_INPUT).await?;
        self.channel.send_line(EXIT_COMMAND).await?;

        let output = self
            .channel
            .read_to_close(self.config.batch_drain_timeout)
            .await?;
        self.channel.close().await?;

        Ok(output)
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        debug!("{}: closing session", self.config.host);
        self.channel.close().await
    }

    fn track_prompt(&mut self, reply: &PromptMatch) {
        if let Some(level) = PrivilegeLevel::from_prompt(reply.kind) {
            self.privilege = level;
        }
    }

    /// Address the session connected to.
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Device name from its prompt.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Local time the session was opened.
    pub fn connected_at(&self) -> String {
        self.connected_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn privilege(&self) -> PrivilegeLevel {
        self.privilege
    }

    pub fn is_privileged(&self) -> bool {
        self.privilege == PrivilegeLevel::Privileged
    }

    /// Credentials as used for this device, including any that were
    /// prompted for. Pass these to the next session to avoid asking again.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &TelnetConfig {
        &self.config
    }
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.host)
            .field("hostname", &self.hostname)
            .field("privilege", &self.privilege)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

/// Device name from a prompt line such as `Switch1>` or `Switch1#`.
fn hostname_from_prompt(line: &str) -> &str {
    line.trim_end().trim_end_matches(['>', '#'])
}
