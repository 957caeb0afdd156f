//! Duration normalization into the canonical `"<H>h <M>m"` / `"<M>m"` / `"<M>m <S>s"` grammar

use super::patterns::{CANONICAL_DURATION, ISO_DURATION, TEXT_DURATION_PARTS};
use tracing::debug;

/// Raw duration as delivered by a source block
#[derive(Debug, Clone, PartialEq)]
pub enum DurationInput<'a> {
    /// ISO-8601 expression such as `PT1H27M`
    Iso(&'a str),
    /// Whole seconds
    Seconds(u64),
    /// Anything else: canonical text, clock text, or free text
    Text(&'a str),
}

/// Normalize a duration into canonical form.
///
/// ISO and seconds inputs are converted through total minutes. Text already in the
/// canonical grammar passes through unchanged, and text that cannot be parsed is
/// returned as-is so callers keep the raw value.
pub fn normalize_duration(input: DurationInput<'_>) -> Option<String> {
    match input {
        DurationInput::Seconds(seconds) => Some(format_minutes(seconds / 60)),
        DurationInput::Iso(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            match parse_iso_seconds(raw) {
                Some(seconds) => Some(format_minutes((seconds / 60.0).floor() as u64)),
                None => {
                    debug!("Unparseable ISO duration kept verbatim: {}", raw);
                    Some(raw.to_string())
                }
            }
        }
        DurationInput::Text(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            if CANONICAL_DURATION.is_match(raw) {
                return Some(raw.to_string());
            }
            if let Some(seconds) = parse_iso_seconds(raw) {
                return Some(format_minutes((seconds / 60.0).floor() as u64));
            }
            if let Ok(seconds) = raw.parse::<u64>() {
                return Some(format_minutes(seconds / 60));
            }
            Some(parse_text_duration(raw).unwrap_or_else(|| raw.to_string()))
        }
    }
}

/// Normalize a duration string of unknown shape (ISO, seconds, clock or free text)
pub fn normalize_duration_text(raw: &str) -> Option<String> {
    normalize_duration(DurationInput::Text(raw))
}

/// Whether a string already satisfies the canonical grammar
pub fn is_canonical(duration: &str) -> bool {
    CANONICAL_DURATION.is_match(duration)
}

/// Parse an ISO-8601 duration into total seconds
pub fn parse_iso_seconds(raw: &str) -> Option<f64> {
    let captures = ISO_DURATION.captures(raw)?;
    // A bare "P" or "PT" carries no components.
    if captures.iter().skip(1).all(|group| group.is_none()) {
        return None;
    }

    let number = |index: usize| -> f64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    Some(number(1) * 86_400.0 + number(2) * 3_600.0 + number(3) * 60.0 + number(4))
}

/// Parse clock (`H:MM:SS`, `MM:SS`) or unit text (`1h 27m`, `87 minutes`) into canonical form.
///
/// Seconds survive only when the source carried them and the value is under an hour.
pub fn parse_text_duration(raw: &str) -> Option<String> {
    let raw = raw.trim();

    if raw.contains(':') {
        let parts: Vec<u64> = raw
            .split(':')
            .map(|part| part.trim().parse::<u64>())
            .collect::<Result<_, _>>()
            .ok()?;
        let total = match parts.as_slice() {
            [hours, minutes, seconds] => total_seconds(*hours, *minutes, *seconds),
            [minutes, seconds] => total_seconds(0, *minutes, *seconds),
            _ => None,
        };
        return total.map(|total| format_clock(total, true));
    }

    let lowered = raw.to_lowercase();
    let compact = lowered
        .trim_end_matches("minutes")
        .trim_end_matches("minute")
        .trim_end_matches("mins")
        .trim_end_matches("min")
        .trim();
    if compact.len() != lowered.len() {
        if let Ok(minutes) = compact.parse::<u64>() {
            return Some(format_minutes(minutes));
        }
    }

    let captures = TEXT_DURATION_PARTS.captures(&lowered)?;
    let hours = captures.get(1).and_then(|m| m.as_str().parse::<u64>().ok());
    let minutes = captures.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
    let seconds = captures.get(3).and_then(|m| m.as_str().parse::<u64>().ok());
    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        return None;
    }

    let total = total_seconds(hours.unwrap_or(0), minutes.unwrap_or(0), seconds.unwrap_or(0))?;
    Some(format_clock(total, seconds.is_some()))
}

/// `None` when the components overflow
fn total_seconds(hours: u64, minutes: u64, seconds: u64) -> Option<u64> {
    hours
        .checked_mul(3_600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// `"<H>h <M>m"` when there is at least one hour, else `"<M>m"`
pub fn format_minutes(total_minutes: u64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn format_clock(total_seconds: u64, keep_seconds: bool) -> String {
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    if keep_seconds && total_minutes < 60 && seconds > 0 {
        format!("{}m {}s", total_minutes, seconds)
    } else {
        format_minutes(total_minutes)
    }
}
