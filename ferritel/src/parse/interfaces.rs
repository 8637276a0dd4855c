//! Interface list and status table parsing.

use indexmap::IndexMap;
use serde::Serialize;

use super::{column, split_lines, table_rows};

/// Command listing every switchport with its status.
pub const INTERFACE_STATUS_COMMAND: &str = "show interfaces status";

/// Command listing untruncated interface descriptions.
pub const INTERFACE_DESCRIPTION_COMMAND: &str = "show interfaces description";

/// Command listing PoE allocation, filtered to interface rows.
pub const POWER_INLINE_COMMAND: &str = "show power inline | include /";

/// Power value of an interface whose PoE draw was not queried.
pub const NO_POWER: &str = "-";

/// Replies with this many lines or fewer carry no usable power rows.
const MIN_POWER_LINES: usize = 5;

/// One row of `show interfaces status`, optionally enriched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceStatus {
    pub name: String,
    pub description: String,
    /// Link state (`connected`, `notconnect`, `disabled`, ...).
    pub status: String,
    pub vlan: String,
    /// Negotiated speed with auto-negotiation markers removed, `-` for `auto`.
    pub speed: String,
    /// Power delivered in watts (`15.4W`), or `-`.
    pub power: String,
}

/// Interfaces keyed by name, in device order.
pub type InterfaceTable = IndexMap<String, InterfaceStatus>;

/// Interface names from a `show interfaces status` reply.
pub fn parse_interface_list(text: &str) -> Vec<String> {
    table_rows(text)
        .into_iter()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Build the status table from a `show interfaces status` reply.
///
/// Field columns: name `[0, 8)`, description `[10, 29)`, status `[29, 39)`,
/// VLAN `[42, 47)`, speed `[60, 66)`.
pub fn parse_interface_status(text: &str) -> InterfaceTable {
    let mut table = InterfaceTable::new();

    for line in table_rows(text) {
        let name = column(line, 0, Some(8));
        let entry = InterfaceStatus {
            name: name.clone(),
            description: column(line, 10, Some(29)),
            status: column(line, 29, Some(39)),
            vlan: column(line, 42, Some(47)),
            speed: normalize_speed(&column(line, 60, Some(66))),
            power: NO_POWER.to_string(),
        };
        table.insert(name, entry);
    }

    table
}

fn normalize_speed(speed: &str) -> String {
    speed.replace("a-", "").replace("auto", NO_POWER)
}

/// Replace truncated descriptions with the full text from a
/// `show interfaces description` reply.
///
/// Only interfaces already in `table` are touched; header rows and
/// interfaces missing from the status table are ignored.
pub fn merge_descriptions(table: &mut InterfaceTable, text: &str) {
    let lines = split_lines(text);
    if lines.len() < 2 {
        return;
    }

    for line in &lines[1..lines.len() - 1] {
        if line.trim().is_empty() {
            continue;
        }
        let name = column(line, 0, Some(8));
        if let Some(entry) = table.get_mut(&name) {
            entry.description = column(line, 55, None);
        }
    }
}

/// Fill in PoE draw from a `show power inline | include /` reply.
///
/// Power is read from columns `[26, 32)`; a trailing `.0` is dropped and
/// `W` appended. Short replies are treated as "no power data".
pub fn merge_power(table: &mut InterfaceTable, text: &str) {
    let lines = split_lines(text);
    if lines.len() <= MIN_POWER_LINES {
        return;
    }

    for line in &lines[1..lines.len() - 1] {
        let name = column(line, 0, Some(10));
        let power = column(line, 26, Some(32));
        if power.is_empty() {
            continue;
        }
        if let Some(entry) = table.get_mut(&name) {
            entry.power = format!("{}W", power.strip_suffix(".0").unwrap_or(&power));
        }
    }
}
