//! Parsers for IOS show-command output.
//!
//! Replies are fixed-width text tables padded with spaces. Fields are
//! extracted by character column, so the offsets here mirror the device's
//! own output format.

mod facts;
mod interfaces;

pub use facts::{FACTS_COMMAND, Facts, parse_facts};
pub use interfaces::{
    INTERFACE_DESCRIPTION_COMMAND, INTERFACE_STATUS_COMMAND, InterfaceStatus, InterfaceTable,
    NO_POWER, POWER_INLINE_COMMAND, merge_descriptions, merge_power, parse_interface_list,
    parse_interface_status,
};

/// Split text into lines on `\r\n`, `\n` or a lone `\r`.
///
/// A trailing line break does not produce an empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }

    lines
}

/// Characters `start..end` of `line`, trimmed. `None` reads to the end.
///
/// Ranges past the end of a short line yield an empty string.
pub(crate) fn column(line: &str, start: usize, end: Option<usize>) -> String {
    let chars = line.chars().skip(start);
    let field: String = match end {
        Some(end) => chars.take(end.saturating_sub(start)).collect(),
        None => chars.collect(),
    };
    field.trim().to_string()
}

/// Data rows of a table reply: the command echo, blank line and header
/// (first three lines) and the trailing prompt are dropped, as are
/// separator and blank lines.
pub(crate) fn table_rows(text: &str) -> Vec<&str> {
    let lines = split_lines(text);
    if lines.len() <= 4 {
        return Vec::new();
    }

    lines[3..lines.len() - 1]
        .iter()
        .copied()
        .filter(|line| !line.starts_with('-') && !line.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\r\n\r\nb\r\n"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_column() {
        let line = "Gi1/0/1   uplink";
        assert_eq!(column(line, 0, Some(8)), "Gi1/0/1");
        assert_eq!(column(line, 10, Some(29)), "uplink");
        assert_eq!(column(line, 40, Some(47)), "");
        assert_eq!(column(line, 3, None), "/0/1   uplink");
    }

    #[test]
    fn test_column_counts_chars() {
        // Latin-1 decoded text: one char per device byte
        assert_eq!(column("caf\u{e9}-sw  up", 0, Some(7)), "caf\u{e9}-sw");
    }

    #[test]
    fn test_table_rows() {
        let text = "show int status\r\n\r\nPort Name\r\n---- ----\r\n\
                    Gi1/0/1 x\r\n\r\nGi1/0/2 y\r\nSwitch1#";
        assert_eq!(table_rows(text), vec!["Gi1/0/1 x", "Gi1/0/2 y"]);
        assert!(table_rows("show int status\r\n\r\nPort Name\r\nSwitch1#").is_empty());
    }
}

/// Device replies laid out at the column offsets IOS uses.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::interfaces::{
        INTERFACE_DESCRIPTION_COMMAND, INTERFACE_STATUS_COMMAND, POWER_INLINE_COMMAND,
    };

    pub(crate) fn status_row(
        name: &str,
        description: &str,
        status: &str,
        vlan: &str,
        duplex: &str,
        speed: &str,
        kind: &str,
    ) -> String {
        format!(
            "{:<10}{:<19}{:<13}{:<11}{:<7}{:<6} {}",
            name, description, status, vlan, duplex, speed, kind
        )
    }

    pub(crate) fn status_reply(rows: &[String]) -> String {
        let mut lines = vec![
            INTERFACE_STATUS_COMMAND.to_string(),
            String::new(),
            "Port      Name               Status       Vlan       Duplex  Speed Type".to_string(),
        ];
        lines.extend(rows.iter().cloned());
        lines.push("Switch1#".to_string());
        lines.join("\r\n")
    }

    const COPPER: &str = "10/100/1000BaseTX";

    pub(crate) fn sample_status_reply() -> String {
        status_reply(&[
            status_row(
                "Gi1/0/1",
                "Uplink to core sw",
                "connected",
                "trunk",
                "a-full",
                "a-1000",
                COPPER,
            ),
            status_row("Gi1/0/2", "", "notconnect", "10", "auto", "auto", COPPER),
            status_row("Gi1/0/3", "Printer", "connected", "20", "a-full", "a-100", COPPER),
            "--------- separator".to_string(),
            status_row("Gi1/0/48", "", "disabled", "1", "auto", "auto", COPPER),
        ])
    }

    pub(crate) fn description_row(
        name: &str,
        status: &str,
        protocol: &str,
        description: &str,
    ) -> String {
        format!("{:<31}{:<15}{:<9}{}", name, status, protocol, description)
    }

    pub(crate) fn sample_description_reply() -> String {
        [
            INTERFACE_DESCRIPTION_COMMAND.to_string(),
            "Interface                      Status         Protocol Description".to_string(),
            description_row("Gi1/0/1", "up", "up", "Uplink to core switch 01 (port 48)"),
            description_row("Gi1/0/2", "down", "down", ""),
            description_row("Gi1/0/3", "up", "up", "Printer 2nd floor"),
            description_row("Vl1", "up", "up", "Management"),
            "Switch1#".to_string(),
        ]
        .join("\r\n")
    }

    pub(crate) fn power_row(
        name: &str,
        admin: &str,
        oper: &str,
        power: &str,
        device: &str,
        class: &str,
        max: &str,
    ) -> String {
        format!(
            "{:<10}{:<7}{:<9}{:<6}  {:<20}{:<6}{}",
            name, admin, oper, power, device, class, max
        )
    }

    pub(crate) fn sample_power_reply() -> String {
        [
            POWER_INLINE_COMMAND.to_string(),
            power_row("Gi1/0/1", "auto", "off", "0.0", "n/a", "n/a", "30.0"),
            power_row("Gi1/0/2", "auto", "on", "15.4", "IP Phone 8845", "4", "30.0"),
            power_row("Gi1/0/3", "auto", "on", "6.0", "Ieee PD", "2", "30.0"),
            power_row("Gi1/0/5", "auto", "off", "0.0", "n/a", "n/a", "30.0"),
            "Switch1#".to_string(),
        ]
        .join("\r\n")
    }
}
