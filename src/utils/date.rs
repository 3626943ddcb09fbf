// Stage target-date parsing (absolute dates plus a few shorthands)

use anyhow::Result;
use chrono::{Local, NaiveDate};

/// Parse a stage target-date expression into a calendar date.
///
/// Supports absolute dates (2026-09-15), "today"/"tomorrow", and relative
/// day offsets like "+7d".
pub fn parse_stage_date(expr: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return Ok(date);
    }

    let today = Local::now().date_naive();
    match expr {
        "today" => Ok(today),
        "tomorrow" => Ok(today + chrono::Duration::days(1)),
        _ => {
            if let Some(days) = expr
                .strip_prefix('+')
                .and_then(|s| s.strip_suffix('d'))
                .and_then(|s| s.parse::<i64>().ok())
            {
                return Ok(today + chrono::Duration::days(days));
            }
            anyhow::bail!("Unsupported date expression: {}", expr)
        }
    }
}

/// Format a stage date the way the todo table stores due dates
pub fn format_stage_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute() {
        let date = parse_stage_date("2026-09-15").unwrap();
        assert_eq!(format_stage_date(date), "2026-09-15");
    }

    #[test]
    fn test_parse_relative() {
        let today = Local::now().date_naive();
        assert_eq!(parse_stage_date("today").unwrap(), today);
        assert_eq!(
            parse_stage_date("tomorrow").unwrap(),
            today + chrono::Duration::days(1)
        );
        assert_eq!(
            parse_stage_date("+7d").unwrap(),
            today + chrono::Duration::days(7)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_stage_date("next tuesday").is_err());
        assert!(parse_stage_date("2026/09/15").is_err());
    }
}
