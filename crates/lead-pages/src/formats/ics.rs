use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::{escape_text, push_line, strip_controls, FormatError};

pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

const PRODUCT_ID: &str = "-//Lead Pages//Landing Page Events//EN";

/// A single event as it appears in a downloadable `.ics` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub organizer: Option<(String, String)>,
}

impl CalendarEvent {
    /// Builds start/end from raw `YYYY-MM-DD` and `HH:MM` strings.
    ///
    /// A missing or non-increasing end time falls back to one hour after the start.
    pub fn schedule(
        date: &str,
        start: &str,
        end: Option<&str>,
    ) -> Result<(NaiveDateTime, NaiveDateTime), FormatError> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
            FormatError::InvalidValue {
                field: "event date",
                value: date.to_string(),
            }
        })?;
        let starts_at = day.and_time(parse_time("start time", start)?);
        let ends_at = match end.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => day.and_time(parse_time("end time", raw)?),
            None => starts_at,
        };

        let ends_at = if ends_at > starts_at {
            ends_at
        } else {
            starts_at + Duration::hours(1)
        };
        Ok((starts_at, ends_at))
    }
}

fn parse_time(field: &'static str, raw: &str) -> Result<NaiveTime, FormatError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .or_else(|_| NaiveTime::parse_from_str(&trimmed.to_ascii_uppercase(), "%I:%M %p"))
        .map_err(|_| FormatError::InvalidValue {
            field,
            value: raw.to_string(),
        })
}

/// Renders a VCALENDAR with one VEVENT. Times are floating local times.
pub fn render_event(event: &CalendarEvent, stamp: DateTime<Utc>) -> String {
    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{PRODUCT_ID}"));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, "BEGIN:VEVENT");
    push_line(&mut out, &format!("UID:{}", escape_text(&event.uid)));
    push_line(
        &mut out,
        &format!("DTSTAMP:{}", stamp.format("%Y%m%dT%H%M%SZ")),
    );
    push_line(
        &mut out,
        &format!("DTSTART:{}", event.starts_at.format("%Y%m%dT%H%M%S")),
    );
    push_line(
        &mut out,
        &format!("DTEND:{}", event.ends_at.format("%Y%m%dT%H%M%S")),
    );
    push_line(&mut out, &format!("SUMMARY:{}", escape_text(&event.summary)));
    if let Some(description) = &event.description {
        push_line(
            &mut out,
            &format!("DESCRIPTION:{}", escape_text(description)),
        );
    }
    if let Some(location) = &event.location {
        push_line(&mut out, &format!("LOCATION:{}", escape_text(location)));
    }
    if let Some(url) = &event.url {
        push_line(&mut out, &format!("URL:{}", strip_controls(url)));
    }
    if let Some((name, email)) = &event.organizer {
        push_line(
            &mut out,
            &format!(
                "ORGANIZER;CN=\"{}\":mailto:{}",
                strip_controls(name).replace('"', "'"),
                strip_controls(email)
            ),
        );
    }
    push_line(&mut out, "END:VEVENT");
    push_line(&mut out, "END:VCALENDAR");
    out
}
