//! Display helpers shared by the table views.

use chrono::{DateTime, Local, Utc};

/// Placeholder for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Local date and time, or `N/A` when absent.
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Borrow the value or fall back to `N/A`. Empty strings count as absent.
pub fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// Shorten a dotted logger name to its last three segments.
///
/// `dk.dma.baleen.secom.service.SecomCoreService` → `...secom.service.SecomCoreService`
pub fn truncate_logger(logger: &str) -> String {
    let parts: Vec<&str> = logger.split('.').collect();
    if parts.len() > 3 {
        format!("...{}", parts[parts.len() - 3..].join("."))
    } else {
        logger.to_string()
    }
}

/// Truncate to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Upper-case the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
