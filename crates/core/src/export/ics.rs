//! iCalendar (RFC 5545) encoding of event records

use chrono::{DateTime, Utc};
use invitekit_domain::constants::ICS_PRODID;
use invitekit_domain::{EventRecord, Result};
use uuid::Uuid;

const MAX_LINE_OCTETS: usize = 75;
const CRLF: &str = "\r\n";

/// Encodes one record as a `VCALENDAR` holding a single `VEVENT`
#[derive(Debug, Clone)]
pub struct IcsEncoder {
    prodid: String,
}

impl Default for IcsEncoder {
    fn default() -> Self {
        Self { prodid: ICS_PRODID.to_string() }
    }
}

impl IcsEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode with a fresh UID and the current time as `DTSTAMP`
    ///
    /// # Errors
    /// `InvalidSpan` if the record's span does not hold.
    pub fn encode(&self, record: &EventRecord) -> Result<String> {
        let uid = format!("{}@invitekit", Uuid::new_v4());
        self.encode_with(record, &uid, Utc::now())
    }

    /// Encode with a caller-chosen UID and stamp
    pub fn encode_with(
        &self,
        record: &EventRecord,
        uid: &str,
        stamp: DateTime<Utc>,
    ) -> Result<String> {
        record.span().validate()?;

        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{}", self.prodid),
            "CALSCALE:GREGORIAN".to_string(),
            "METHOD:PUBLISH".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", escape_text(uid)),
            format!("DTSTAMP:{}", format_utc(stamp)),
            format!("DTSTART:{}", format_utc(record.start())),
            format!("DTEND:{}", format_utc(record.end())),
            format!("SUMMARY:{}", escape_text(record.title())),
            format!("LOCATION:{}", escape_text(record.location())),
            format!("DESCRIPTION:{}", escape_text(record.description())),
            format!("STATUS:{}", record.status().to_string().to_uppercase()),
            format!("TRANSP:{}", if record.busy() { "OPAQUE" } else { "TRANSPARENT" }),
        ];

        for contact in record.attendees() {
            if let Some(email) = &contact.email {
                lines.push(format!("ATTENDEE;CN={}:mailto:{}", param_value(&contact.name), email));
            }
        }

        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in &lines {
            out.push_str(&fold_line(line));
            out.push_str(CRLF);
        }
        Ok(out)
    }
}

/// `YYYYMMDDTHHMMSSZ`
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Quote a parameter value when it contains `:`, `;` or `,`.
/// Double quotes cannot appear inside parameter values at all.
fn param_value(value: &str) -> String {
    let cleaned: String =
        value.chars().filter(|c| !c.is_control()).map(|c| if c == '"' { '\'' } else { c }).collect();
    if cleaned.contains([':', ';', ',']) {
        format!("\"{cleaned}\"")
    } else {
        cleaned
    }
}

/// Fold a content line at 75 octets without splitting a UTF-8 sequence
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    // Continuation lines start with a space, which counts toward the limit
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if used + width > budget {
            folded.push_str(CRLF);
            folded.push(' ');
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        folded.push(ch);
        used += width;
    }
    folded
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use invitekit_domain::{Contact, TimeSpan};

    use super::*;

    fn record(title: &str, attendees: Vec<Contact>) -> EventRecord {
        let span = TimeSpan::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap(),
        )
        .unwrap();
        EventRecord::new(title.into(), "Notes".into(), "Room 4".into(), span, attendees, true)
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn encodes_core_properties() {
        let ics = IcsEncoder::new()
            .encode_with(&record("Sync", vec![Contact::new("Sam", "sam@x.io")]), "uid-1", stamp())
            .unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//InviteKit//EN\r\n"));
        assert!(ics.contains("\r\nDTSTART:20240102T093000Z\r\n"));
        assert!(ics.contains("\r\nDTEND:20240102T103000Z\r\n"));
        assert!(ics.contains("\r\nSUMMARY:Sync\r\n"));
        assert!(ics.contains("\r\nSTATUS:CONFIRMED\r\n"));
        assert!(ics.contains("\r\nTRANSP:OPAQUE\r\n"));
        assert!(ics.contains("\r\nATTENDEE;CN=Sam:mailto:sam@x.io\r\n"));
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
    }

    #[test]
    fn escapes_text_and_quotes_params() {
        assert_eq!(escape_text("a,b;c\\d\ne"), "a\\,b\\;c\\\\d\\ne");
        assert_eq!(param_value("Doe, Jane"), "\"Doe, Jane\"");
        assert_eq!(param_value("Jane"), "Jane");
    }

    #[test]
    fn folds_long_lines_on_char_boundaries() {
        let line = format!("SUMMARY:{}", "会".repeat(40));
        let folded = fold_line(&line);

        for (i, part) in folded.split("\r\n").enumerate() {
            assert!(part.len() <= 75, "line {i} has {} octets", part.len());
            if i > 0 {
                assert!(part.starts_with(' '));
            }
        }
        let unfolded = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn rejects_invalid_span() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let bad: EventRecord = serde_json::from_value(serde_json::json!({
            "title": "Bad",
            "description": "",
            "location": "",
            "span": {"start": start, "end": start},
            "attendees": [],
            "busy": true,
            "status": "confirmed"
        }))
        .unwrap();

        assert!(IcsEncoder::new().encode(&bad).is_err());
    }
}
