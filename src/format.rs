use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub fn to_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key. Returns `None` for anything that is not a real
/// calendar date.
pub fn parse_date_key(date_key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_key.trim(), DATE_KEY_FORMAT).ok()
}

/// Calendar day of `now` in the viewer's offset.
pub fn local_date(now: &DateTime<FixedOffset>) -> NaiveDate {
    now.date_naive()
}

/// Trailing window of `days` calendar days ending on `today`, oldest first.
/// Always at least one day long.
pub fn build_range(days: u32, today: NaiveDate) -> Vec<NaiveDate> {
    let safe_days = days.max(1) as i64;
    let start = today - Duration::days(safe_days - 1);
    (0..safe_days).map(|offset| start + Duration::days(offset)).collect()
}

pub fn relative_day_label(date: NaiveDate, today: NaiveDate) -> Option<&'static str> {
    match (today - date).num_days() {
        0 => Some("Today"),
        1 => Some("Yesterday"),
        _ => None,
    }
}

/// "Mar 10"
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// "Monday, Mar 10"
pub fn format_long_date_label(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}

/// "March"
pub fn format_month_label(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// "9:05 AM" in the viewer's offset.
pub fn format_time_label(timestamp: DateTime<Utc>, offset: &FixedOffset) -> String {
    timestamp
        .with_timezone(offset)
        .format("%-I:%M %p")
        .to_string()
}

/// Integer with `,` thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// "1,250 ml"
pub fn format_ml(value_ml: u64) -> String {
    format!("{} ml", group_thousands(value_ml))
}

/// "1.2L"
pub fn format_ml_to_liters(value_ml: u32) -> String {
    format!("{:.1}L", value_ml as f64 / 1000.0)
}

/// "1.2L / 2.0L"
pub fn format_hydration_compact(water_ml: u32, water_goal_ml: u32) -> String {
    format!(
        "{} / {}",
        format_ml_to_liters(water_ml),
        format_ml_to_liters(water_goal_ml)
    )
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

/// `round(water / goal * 100)` clamped to `0..=100`; zero when there is no goal.
pub fn hydration_percent(water_ml: u32, water_goal_ml: u32) -> u32 {
    if water_goal_ml == 0 {
        return 0;
    }
    let percent = (water_ml as f64 / water_goal_ml as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u32
}
