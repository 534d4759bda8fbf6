use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod admin;
pub mod auth;
pub mod contact;
pub mod game;
pub mod health;
pub mod join_request;
pub mod message;
pub mod notification;
pub mod team;
pub mod tournament;
pub mod user;
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Parse an RFC 3339 timestamp supplied by a client.
pub fn parse_timestamp(value: &str) -> Option<SystemTime> {
    OffsetDateTime::parse(value, &Rfc3339)
        .ok()
        .map(SystemTime::from)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn timestamps_round_trip_through_rfc3339() {
        let time = UNIX_EPOCH + Duration::from_secs(1_767_225_600);
        let text = format_system_time(time);
        assert_eq!(text, "2026-01-01T00:00:00Z");
        assert_eq!(parse_timestamp(&text), Some(time));
    }

    #[test]
    fn offsets_are_honoured_and_garbage_rejected() {
        let with_offset = parse_timestamp("2026-01-01T02:00:00+02:00").unwrap();
        assert_eq!(with_offset, parse_timestamp("2026-01-01T00:00:00Z").unwrap());
        assert_eq!(parse_timestamp("next tuesday"), None);
    }
}
