use crate::constants::{MAX_GRACE_PERIOD_MS, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};
use crate::enforcer::TriggerKind;
use crate::error::AppError;
use std::time::Duration;

fn parse_millis(field: &'static str, value: &str) -> Result<u64, AppError> {
    value.trim().parse().map_err(|_| AppError::InvalidInput {
        field,
        reason: format!("'{}' is not a whole number of milliseconds", value.trim()),
    })
}

/// Validate the enforcement cadence.
pub fn parse_poll_interval(value: &str) -> Result<Duration, AppError> {
    let ms = parse_millis("poll_interval", value)?;
    if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&ms) {
        return Err(AppError::InvalidInput {
            field: "poll_interval",
            reason: format!("must be {MIN_POLL_INTERVAL_MS}-{MAX_POLL_INTERVAL_MS} ms"),
        });
    }
    Ok(Duration::from_millis(ms))
}

/// Validate the wait before re-checking a minimized window. Zero disables it.
pub fn parse_grace_period(value: &str) -> Result<Duration, AppError> {
    let ms = parse_millis("grace_period", value)?;
    if ms > MAX_GRACE_PERIOD_MS {
        return Err(AppError::InvalidInput {
            field: "grace_period",
            reason: format!("cannot exceed {MAX_GRACE_PERIOD_MS} ms"),
        });
    }
    Ok(Duration::from_millis(ms))
}

/// Parse an on/off switch.
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::InvalidInput {
            field,
            reason: format!("expected true or false, got '{other}'"),
        }),
    }
}

/// Parse the trigger name: `poll` or `hook`.
pub fn parse_trigger(value: &str) -> Result<TriggerKind, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "poll" | "interval" => Ok(TriggerKind::Poll),
        "hook" | "event" => Ok(TriggerKind::WinEvent),
        other => Err(AppError::InvalidInput {
            field: "trigger",
            reason: format!("expected poll or hook, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poll_interval_valid() {
        assert_eq!(parse_poll_interval("20").unwrap(), Duration::from_millis(20));
        assert_eq!(parse_poll_interval(" 200 ").unwrap(), Duration::from_millis(200));
    }

    #[test]
    fn test_parse_poll_interval_out_of_range() {
        assert!(parse_poll_interval("5").is_err());
        assert!(parse_poll_interval("5000").is_err());
    }

    #[test]
    fn test_parse_poll_interval_not_a_number() {
        let err = parse_poll_interval("fast").unwrap_err();
        assert!(err.to_string().contains("poll_interval"));
    }

    #[test]
    fn test_parse_grace_period() {
        assert_eq!(parse_grace_period("0").unwrap(), Duration::ZERO);
        assert!(parse_grace_period("501").is_err());
        assert!(parse_grace_period("-1").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("disable_windows", "TRUE").unwrap());
        assert!(parse_flag("disable_windows", "1").unwrap());
        assert!(!parse_flag("disable_windows", "off").unwrap());
        assert!(parse_flag("disable_windows", "maybe").is_err());
    }

    #[test]
    fn test_parse_trigger() {
        assert_eq!(parse_trigger("poll").unwrap(), TriggerKind::Poll);
        assert_eq!(parse_trigger("Hook").unwrap(), TriggerKind::WinEvent);
        assert!(parse_trigger("timer").is_err());
    }
}
