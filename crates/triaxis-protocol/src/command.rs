//! Server-side command dispatch.
//!
//! After decryption, every inbound line starts with a command prefix.
//! Two commands exist; anything else is ignored without a reply.

/// Prefix of a live-reading frame.
pub const DATA_PREFIX: &str = "DATA:";

/// Prefix of a history request.
pub const HISTORICAL_REQUEST_PREFIX: &str = "HISTORICAL_REQUEST:";

/// The full history request line the client sends today.
pub const HISTORICAL_REQUEST_ALL: &str = "HISTORICAL_REQUEST:ALL";

/// A dispatched inbound command, borrowing from the decrypted line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    /// A live reading; the payload is the field list after `DATA:`,
    /// trimmed.
    Data(&'a str),

    /// A history request. The suffix (`ALL` today) is carried for a
    /// future date/time filter but is not interpreted anywhere yet.
    HistoricalRequest(&'a str),
}

impl<'a> Command<'a> {
    /// Parses a decrypted line into a command.
    ///
    /// Returns `None` for any unrecognized prefix; the session ignores
    /// such lines silently.
    pub fn parse(line: &'a str) -> Option<Self> {
        if let Some(body) = line.strip_prefix(DATA_PREFIX) {
            Some(Command::Data(body.trim()))
        } else {
            line.strip_prefix(HISTORICAL_REQUEST_PREFIX)
                .map(Command::HistoricalRequest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_command_strips_and_trims() {
        assert_eq!(
            Command::parse("DATA: x:1, y:2, z:3 "),
            Some(Command::Data("x:1, y:2, z:3"))
        );
    }

    #[test]
    fn history_command_carries_suffix() {
        assert_eq!(
            Command::parse(HISTORICAL_REQUEST_ALL),
            Some(Command::HistoricalRequest("ALL"))
        );
        // Unknown suffixes still dispatch; the filter is unimplemented
        // and ignored downstream.
        assert_eq!(
            Command::parse("HISTORICAL_REQUEST:2024-01-01"),
            Some(Command::HistoricalRequest("2024-01-01"))
        );
    }

    #[test]
    fn unknown_prefixes_are_not_commands() {
        assert_eq!(Command::parse("PING:hello"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("data:x:1"), None, "prefixes are case-sensitive");
    }
}
