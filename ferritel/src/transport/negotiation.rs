//! Telnet command stripping.
//!
//! Devices open a Telnet session with a burst of `IAC WILL/DO` option
//! requests. ferritel never enables any option: every request is refused
//! and every command sequence is removed from the data stream so that only
//! console text reaches the prompt matcher.

use std::borrow::Cow;

use bytes::{BufMut, BytesMut};
use memchr::{memchr, memchr2};

/// Interpret As Command.
pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
/// Subnegotiation begin.
pub const SB: u8 = 250;
/// Subnegotiation end.
pub const SE: u8 = 240;

const NUL: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Iac,
    Negotiate(u8),
    Subnegotiation,
    SubnegotiationIac,
}

/// Incremental filter separating console data from Telnet commands.
///
/// Sequences may be split across reads; the filter keeps its position
/// between calls to [`feed`](Self::feed).
#[derive(Debug)]
pub struct NegotiationFilter {
    state: State,
}

impl NegotiationFilter {
    pub fn new() -> Self {
        Self { state: State::Data }
    }

    /// Consume raw bytes from the wire.
    ///
    /// Console data is appended to `data`. Refusals for any option requests
    /// are appended to `replies` and must be written back to the device.
    pub fn feed(&mut self, mut input: &[u8], data: &mut BytesMut, replies: &mut BytesMut) {
        while !input.is_empty() {
            match self.state {
                State::Data => match memchr2(IAC, NUL, input) {
                    None => {
                        data.extend_from_slice(input);
                        return;
                    }
                    Some(pos) => {
                        data.extend_from_slice(&input[..pos]);
                        if input[pos] == IAC {
                            self.state = State::Iac;
                        }
                        input = &input[pos + 1..];
                    }
                },
                State::Iac => {
                    let byte = input[0];
                    input = &input[1..];
                    self.state = match byte {
                        IAC => {
                            data.put_u8(IAC);
                            State::Data
                        }
                        DO | DONT | WILL | WONT => State::Negotiate(byte),
                        SB => State::Subnegotiation,
                        // NOP, GA, AYT and friends carry no payload
                        _ => State::Data,
                    };
                }
                State::Negotiate(command) => {
                    let option = input[0];
                    input = &input[1..];
                    match command {
                        DO => replies.extend_from_slice(&[IAC, WONT, option]),
                        WILL => replies.extend_from_slice(&[IAC, DONT, option]),
                        _ => {}
                    }
                    self.state = State::Data;
                }
                State::Subnegotiation => match memchr(IAC, input) {
                    None => return,
                    Some(pos) => {
                        input = &input[pos + 1..];
                        self.state = State::SubnegotiationIac;
                    }
                },
                State::SubnegotiationIac => {
                    let byte = input[0];
                    input = &input[1..];
                    self.state = if byte == SE {
                        State::Data
                    } else {
                        State::Subnegotiation
                    };
                }
            }
        }
    }
}

impl Default for NegotiationFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Double every IAC byte in outgoing data.
pub fn escape_iac(data: &[u8]) -> Cow<'_, [u8]> {
    if memchr(IAC, data).is_none() {
        return Cow::Borrowed(data);
    }

    let mut escaped = Vec::with_capacity(data.len() + 8);
    for &byte in data {
        if byte == IAC {
            escaped.push(IAC);
        }
        escaped.push(byte);
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: u8 = 1;
    const SUPPRESS_GO_AHEAD: u8 = 3;
    const TERMINAL_TYPE: u8 = 24;
    const NAWS: u8 = 31;

    fn run(filter: &mut NegotiationFilter, input: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut data = BytesMut::new();
        let mut replies = BytesMut::new();
        filter.feed(input, &mut data, &mut replies);
        (data.to_vec(), replies.to_vec())
    }

    #[test]
    fn test_plain_data_passes_through() {
        let mut filter = NegotiationFilter::new();
        let (data, replies) = run(&mut filter, b"User Access Verification\r\n\r\nUsername: ");
        assert_eq!(data, b"User Access Verification\r\n\r\nUsername: ");
        assert!(replies.is_empty());
    }

    #[test]
    fn test_cisco_opening_is_refused() {
        let mut filter = NegotiationFilter::new();
        let mut input = vec![
            IAC, WILL, ECHO, IAC, WILL, SUPPRESS_GO_AHEAD, IAC, DO, NAWS,
        ];
        input.extend_from_slice(b"\r\nUsername: ");

        let (data, replies) = run(&mut filter, &input);
        assert_eq!(data, b"\r\nUsername: ");
        assert_eq!(
            replies,
            vec![IAC, DONT, ECHO, IAC, DONT, SUPPRESS_GO_AHEAD, IAC, WONT, NAWS]
        );
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut filter = NegotiationFilter::new();

        let (data, replies) = run(&mut filter, &[b'a', IAC]);
        assert_eq!(data, b"a");
        assert!(replies.is_empty());

        let (data, replies) = run(&mut filter, &[DO]);
        assert!(data.is_empty());
        assert!(replies.is_empty());

        let (data, replies) = run(&mut filter, &[TERMINAL_TYPE, b'b']);
        assert_eq!(data, b"b");
        assert_eq!(replies, vec![IAC, WONT, TERMINAL_TYPE]);
    }

    #[test]
    fn test_subnegotiation_is_dropped() {
        let mut filter = NegotiationFilter::new();
        let input = [
            b'x', IAC, SB, TERMINAL_TYPE, 1, IAC, SE, b'y',
        ];
        let (data, replies) = run(&mut filter, &input);
        assert_eq!(data, b"xy");
        assert!(replies.is_empty());
    }

    #[test]
    fn test_escaped_iac_and_nul() {
        let mut filter = NegotiationFilter::new();
        let (data, _) = run(&mut filter, &[b'a', IAC, IAC, b'\r', NUL, b'b']);
        assert_eq!(data, vec![b'a', 0xFF, b'\r', b'b']);
    }

    #[test]
    fn test_escape_outgoing() {
        assert!(matches!(escape_iac(b"enable\n"), Cow::Borrowed(_)));
        assert_eq!(escape_iac(&[b'p', 0xFF, b'\n']).as_ref(), &[b'p', 0xFF, 0xFF, b'\n']);
    }
}
