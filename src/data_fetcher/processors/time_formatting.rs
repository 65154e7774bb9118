use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Parses an upstream timestamp.
///
/// The feed mostly sends minute precision with a `Z` suffix
/// (`2024-09-06T00:20Z`), which is not valid RFC 3339, so that form is tried
/// after the strict parser.
pub fn parse_upstream_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// Kickoff in local time, e.g. `Sunday, Sep 8 @ 1:00PM`
pub fn format_kickoff(kickoff: DateTime<Utc>) -> String {
    kickoff
        .with_timezone(&Local)
        .format("%A, %b %-d @ %-I:%M%p")
        .to_string()
}

/// Quarter and clock for a live game, e.g. `Q3 7:41`.
///
/// Periods past the fourth are overtime.
pub fn format_game_clock(period: Option<u32>, clock: Option<&str>) -> String {
    let period_label = match period {
        Some(p @ 1..=4) => format!("Q{p}"),
        Some(5) => "OT".to_string(),
        Some(p) if p > 5 => format!("{}OT", p - 4),
        _ => String::new(),
    };
    match (period_label.is_empty(), clock) {
        (false, Some(clock)) => format!("{period_label} {clock}"),
        (false, None) => period_label,
        (true, Some(clock)) => clock.to_string(),
        (true, None) => String::new(),
    }
}
