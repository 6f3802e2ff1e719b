use chrono::{NaiveTime, Timelike};

pub const HALF_HOUR_BREAK_MINUTES: u32 = 30;
const LAST_MINUTE_OF_DAY: i64 = 23 * 60 + 59;

pub fn to_minutes(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Minutes since midnight back to a time of day, clamped to 00:00..=23:59.
/// Events never wrap past midnight.
pub fn from_minutes(minutes: i64) -> NaiveTime {
    let clamped = minutes.clamp(0, LAST_MINUTE_OF_DAY) as u32;
    NaiveTime::from_hms_opt(clamped / 60, clamped % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Event length plus the optional farewell buffer.
pub fn required_minutes(duration_hours: f64, half_hour_break: bool) -> u32 {
    let event = if duration_hours.is_finite() && duration_hours > 0.0 {
        (duration_hours * 60.0).round() as u32
    } else {
        0
    };
    event + if half_hour_break { HALF_HOUR_BREAK_MINUTES } else { 0 }
}

/// `H:MM`, e.g. 210 -> "3:30".
pub fn format_duration(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.abs();
    format!("{}{}:{:02}", sign, abs / 60, abs % 60)
}

pub fn calculate_end_time(start: NaiveTime, duration_hours: f64, half_hour_break: bool) -> NaiveTime {
    from_minutes(to_minutes(start) as i64 + required_minutes(duration_hours, half_hour_break) as i64)
}

pub fn calculate_start_time(end: NaiveTime, duration_hours: f64, half_hour_break: bool) -> NaiveTime {
    from_minutes(to_minutes(end) as i64 - required_minutes(duration_hours, half_hour_break) as i64)
}
