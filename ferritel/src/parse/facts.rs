//! Device facts from `show version`.

use serde::Serialize;

use super::split_lines;
use crate::error::ParseError;

/// Filtered `show version` returning only the uptime and model lines.
pub const FACTS_COMMAND: &str = "show version | include Model .umber|uptime";

/// Basic identity of a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facts {
    /// Address the session connected to.
    pub ip_address: String,
    pub hostname: String,
    pub model: String,
    pub uptime: String,
    /// When the facts were queried (`%Y-%m-%d %H:%M:%S`, local time).
    pub when: String,
}

/// Parse the reply to [`FACTS_COMMAND`].
///
/// The first line is the command echo. The next line reads
/// `<hostname> uptime is <uptime>` and the one after ends with the model
/// number.
pub fn parse_facts(
    text: &str,
    ip_address: impl Into<String>,
    when: impl Into<String>,
) -> Result<Facts, ParseError> {
    let all = split_lines(text);
    if all.len() < 3 {
        return Err(ParseError::TooFewLines {
            query: FACTS_COMMAND,
            expected: 3,
            found: all.len(),
        });
    }

    let lines: Vec<Vec<&str>> = all
        .into_iter()
        .skip(1)
        .map(|line| line.split_whitespace().collect())
        .collect();

    let uptime_line = &lines[0];
    if uptime_line.len() < 4 {
        return Err(ParseError::TooFewTokens {
            query: FACTS_COMMAND,
            line: 2,
            expected: 4,
            found: uptime_line.len(),
        });
    }

    let model = lines[1].last().ok_or(ParseError::TooFewTokens {
        query: FACTS_COMMAND,
        line: 3,
        expected: 1,
        found: 0,
    })?;

    Ok(Facts {
        ip_address: ip_address.into(),
        hostname: uptime_line[0].to_string(),
        model: model.to_string(),
        uptime: uptime_line[3..].join(" "),
        when: when.into(),
    })
}
