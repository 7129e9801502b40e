use chrono::Datelike;

use crate::dto::{HistoryDaySummary, KpiCardItem, KpiCategory};
use crate::format::{format_ml, format_percent};

const MIN_ACTIVE_DAYS_FOR_INSIGHTS: usize = 4;
const MAX_INSIGHTS: usize = 2;
const LOW_HYDRATION_RATIO: f64 = 0.5;
const HIGH_HYDRATION_RATIO: f64 = 0.8;
const MIN_CORRELATION_SAMPLES: usize = 2;
const MIN_SYMPTOM_GAP: f64 = 0.4;
const MIN_WEEKDAY_HABITS: f64 = 1.0;

const NO_PREVIOUS_PERIOD: &str = "No previous period to compare";

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Aggregates over one window of day summaries. Averages only count days
/// that have any activity; counts and rates use the whole window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct WindowStats {
    active_days: usize,
    avg_water_ml: f64,
    goal_days: usize,
    completion_ratio: f64,
    habits_per_day: f64,
    symptom_total: usize,
    symptom_days: usize,
    journal_days: usize,
}

impl WindowStats {
    fn from_days(days: &[HistoryDaySummary]) -> Self {
        let active = || days.iter().filter(|day| day.has_any_activity);
        Self {
            active_days: active().count(),
            avg_water_ml: mean(active().map(|day| f64::from(day.water_ml))),
            goal_days: days.iter().filter(|day| day.water_goal_reached()).count(),
            completion_ratio: mean(active().map(HistoryDaySummary::completion_ratio)),
            habits_per_day: mean(active().map(|day| day.completed_habits_count as f64)),
            symptom_total: days.iter().map(|day| day.symptom_count).sum(),
            symptom_days: days.iter().filter(|day| day.symptom_count > 0).count(),
            journal_days: days.iter().filter(|day| day.has_journal).count(),
        }
    }
}

/// `"+12% vs previous period"`, or a fixed notice when there is nothing to
/// compare against.
pub fn format_delta(current: f64, previous: f64) -> String {
    if previous <= 0.0 {
        return NO_PREVIOUS_PERIOD.to_string();
    }
    let change = ((current - previous) / previous * 100.0).round() as i64;
    format!("{:+}% vs previous period", change)
}

fn rate(count: usize, period_days: u32) -> f64 {
    count as f64 / f64::from(period_days.max(1)) * 100.0
}

fn avg_water_card(current: &WindowStats, previous: &WindowStats) -> KpiCardItem {
    KpiCardItem::new(
        "Avg. water",
        format_ml(current.avg_water_ml.round() as u64),
        format_delta(current.avg_water_ml, previous.avg_water_ml),
    )
}

fn goal_days_card(current: &WindowStats, period_days: u32) -> KpiCardItem {
    KpiCardItem::new(
        "Goal days",
        format!("{}/{}", current.goal_days, period_days),
        "Water goal reached",
    )
}

fn completion_card(current: &WindowStats, previous: &WindowStats) -> KpiCardItem {
    KpiCardItem::new(
        "Completion rate",
        format_percent(current.completion_ratio * 100.0),
        format_delta(current.completion_ratio, previous.completion_ratio),
    )
}

/// Two cards for a single category, four for `All`.
pub fn build_kpis(
    current: &[HistoryDaySummary],
    previous: &[HistoryDaySummary],
    period_days: u32,
    category: KpiCategory,
) -> Vec<KpiCardItem> {
    let now = WindowStats::from_days(current);
    let before = WindowStats::from_days(previous);

    match category {
        KpiCategory::Hydration => vec![
            avg_water_card(&now, &before),
            goal_days_card(&now, period_days),
        ],
        KpiCategory::Habits => vec![
            completion_card(&now, &before),
            KpiCardItem::new(
                "Habits per day",
                format!("{:.1}", now.habits_per_day),
                "Completed habits on active days",
            ),
        ],
        KpiCategory::Symptoms => vec![
            KpiCardItem::new(
                "Symptoms logged",
                now.symptom_total.to_string(),
                format_delta(now.symptom_total as f64, before.symptom_total as f64),
            ),
            KpiCardItem::new(
                "Symptom days",
                format!("{}/{}", now.symptom_days, period_days),
                "Days with at least one symptom",
            ),
        ],
        KpiCategory::Journal => vec![
            KpiCardItem::new(
                "Journal entries",
                format!("{}/{}", now.journal_days, period_days),
                format_delta(now.journal_days as f64, before.journal_days as f64),
            ),
            KpiCardItem::new(
                "Journal rate",
                format_percent(rate(now.journal_days, period_days)),
                "Days with a saved note",
            ),
        ],
        KpiCategory::All => vec![
            avg_water_card(&now, &before),
            goal_days_card(&now, period_days),
            completion_card(&now, &before),
            KpiCardItem::new(
                "Logging rate",
                format_percent(rate(now.active_days, period_days)),
                "Days with any activity",
            ),
        ],
    }
}

// ── Insights ────────────────────────────────────────────────────────────────

struct InsightContext<'a> {
    active: Vec<&'a HistoryDaySummary>,
    period_days: u32,
}

fn hydration_ratio(day: &HistoryDaySummary) -> Option<f64> {
    (day.water_goal_ml > 0).then(|| f64::from(day.water_ml) / f64::from(day.water_goal_ml))
}

fn summary_insight(ctx: &InsightContext<'_>) -> Option<String> {
    Some(format!(
        "You logged activity on {} of the last {} days.",
        ctx.active.len(),
        ctx.period_days.max(1)
    ))
}

fn hydration_symptom_insight(ctx: &InsightContext<'_>) -> Option<String> {
    let symptoms_where = |keep: fn(f64) -> bool| -> Vec<f64> {
        ctx.active
            .iter()
            .filter(|day| hydration_ratio(day).is_some_and(keep))
            .map(|day| day.symptom_count as f64)
            .collect()
    };
    let low = symptoms_where(|ratio| ratio < LOW_HYDRATION_RATIO);
    let high = symptoms_where(|ratio| ratio >= HIGH_HYDRATION_RATIO);
    if low.len() < MIN_CORRELATION_SAMPLES || high.len() < MIN_CORRELATION_SAMPLES {
        return None;
    }

    let low_avg = mean(low.into_iter());
    let high_avg = mean(high.into_iter());
    (low_avg - high_avg > MIN_SYMPTOM_GAP).then(|| {
        format!(
            "Symptoms were more frequent on low-water days ({:.1} vs {:.1} per day).",
            low_avg, high_avg
        )
    })
}

/// Earliest weekday (Monday first) wins a tie.
fn strongest_weekday_insight(ctx: &InsightContext<'_>) -> Option<String> {
    let mut totals = [(0usize, 0usize); 7];
    for day in &ctx.active {
        let slot = &mut totals[day.date_key.weekday().num_days_from_monday() as usize];
        slot.0 += day.completed_habits_count;
        slot.1 += 1;
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, (completed, days)) in totals.iter().enumerate() {
        if *days == 0 {
            continue;
        }
        let avg = *completed as f64 / *days as f64;
        if best.map_or(true, |(_, top)| avg > top) {
            best = Some((idx, avg));
        }
    }

    best.filter(|(_, avg)| *avg >= MIN_WEEKDAY_HABITS)
        .map(|(idx, _)| format!("Your habits are strongest on {}s.", WEEKDAY_NAMES[idx]))
}

/// Checked in priority order; the first two that produce a sentence are kept.
const INSIGHT_RULES: &[fn(&InsightContext<'_>) -> Option<String>] = &[
    summary_insight,
    hydration_symptom_insight,
    strongest_weekday_insight,
];

/// Up to two short sentences about the window. Days without activity are
/// ignored.
pub fn select_insights(days: &[HistoryDaySummary], period_days: u32) -> Vec<String> {
    let ctx = InsightContext {
        active: days.iter().filter(|day| day.has_any_activity).collect(),
        period_days,
    };

    if ctx.active.len() < MIN_ACTIVE_DAYS_FOR_INSIGHTS {
        return vec!["Not enough data yet. Log a few more days to unlock insights.".to_string()];
    }

    INSIGHT_RULES
        .iter()
        .filter_map(|rule| rule(&ctx))
        .take(MAX_INSIGHTS)
        .collect()
}
