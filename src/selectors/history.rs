use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use uuid::Uuid;

use crate::config::TrackerConfig;
use crate::dto::{HistoryDayStatus, HistoryDaySummary, HistoryDetailViewModel, HistoryMonthSection};
use crate::format::{
    build_range, format_day_label, format_long_date_label, format_ml, format_month_label,
    hydration_percent, local_date, relative_day_label,
};
use crate::models::entry::DailyEntry;
use crate::models::rows::{DailyEntryRow, HistoryRows, SymptomLogRow};

const REVIEWED_COMPLETION_RATIO: f64 = 0.5;
const STRONG_DAY_COMPLETION_RATIO: f64 = 0.7;
const SUMMARY_LABEL_LIMIT: usize = 2;

/// The activity signals a day status is derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayActivity {
    pub water_ml: u32,
    pub water_goal_ml: u32,
    pub completed_habits: usize,
    pub total_habits: usize,
    pub symptom_count: usize,
    pub has_note: bool,
    pub has_last_entry: bool,
}

impl DayActivity {
    pub fn has_any_activity(&self) -> bool {
        self.water_ml > 0
            || self.completed_habits > 0
            || self.symptom_count > 0
            || self.has_note
            || self.has_last_entry
    }

    fn completion_ratio(&self) -> f64 {
        if self.total_habits == 0 {
            return 0.0;
        }
        self.completed_habits as f64 / self.total_habits as f64
    }
}

/// Status is always derived from the day's fields, never stored.
pub fn classify_day(activity: &DayActivity) -> HistoryDayStatus {
    if !activity.has_any_activity() {
        return HistoryDayStatus::NoData;
    }
    let goal_reached = activity.water_goal_ml > 0 && activity.water_ml >= activity.water_goal_ml;
    if goal_reached && activity.completion_ratio() >= REVIEWED_COMPLETION_RATIO {
        HistoryDayStatus::Reviewed
    } else {
        HistoryDayStatus::PendingReview
    }
}

fn empty_day(
    config: &TrackerConfig,
    date_key: NaiveDate,
    total_habits: usize,
    now: &DateTime<FixedOffset>,
) -> HistoryDaySummary {
    HistoryDaySummary {
        date_key,
        date_label: format_day_label(date_key),
        relative_label: relative_day_label(date_key, local_date(now)).map(str::to_string),
        status: HistoryDayStatus::NoData,
        water_ml: 0,
        water_goal_ml: config.default_water_goal_ml,
        completed_habits_count: 0,
        total_habits_count: total_habits,
        completed_habit_labels: Vec::new(),
        symptom_count: 0,
        top_symptoms: Vec::new(),
        quick_note_preview: String::new(),
        last_entry_at: None,
        has_journal: false,
        has_any_activity: false,
    }
}

/// One summary per day of the trailing `days` window ending today, newest
/// first. Days without a stored row become `no_data` placeholders.
pub fn build_history_days(
    config: &TrackerConfig,
    rows: &HistoryRows,
    days: u32,
    now: &DateTime<FixedOffset>,
) -> Vec<HistoryDaySummary> {
    let today = local_date(now);
    let total_habits = config.system_habits.len() + rows.custom_habits.len();

    let entry_by_date: HashMap<_, &DailyEntryRow> = rows
        .entries
        .iter()
        .map(|entry| (entry.entry_date, entry))
        .collect();

    let mut symptoms_by_entry: HashMap<Uuid, Vec<&SymptomLogRow>> = HashMap::new();
    for log in &rows.symptom_logs {
        symptoms_by_entry.entry(log.entry_id).or_default().push(log);
    }
    for logs in symptoms_by_entry.values_mut() {
        logs.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
    }

    let custom_labels: HashMap<&str, &str> = rows
        .custom_habits
        .iter()
        .map(|habit| (habit.id.as_str(), habit.label.as_str()))
        .collect();

    let mut completed_by_entry: HashMap<Uuid, Vec<String>> = HashMap::new();
    for status in rows.system_statuses.iter().filter(|s| s.is_completed) {
        let label = config.system_habit_label(&status.habit_id).unwrap_or("Habit");
        completed_by_entry
            .entry(status.entry_id)
            .or_default()
            .push(label.to_string());
    }
    for status in rows.custom_statuses.iter().filter(|s| s.is_completed) {
        let label = custom_labels
            .get(status.custom_habit_id.as_str())
            .copied()
            .unwrap_or("Custom habit");
        completed_by_entry
            .entry(status.entry_id)
            .or_default()
            .push(label.to_string());
    }

    let mut summaries: Vec<HistoryDaySummary> = build_range(days, today)
        .into_iter()
        .map(|date_key| {
            let Some(entry) = entry_by_date.get(&date_key) else {
                return empty_day(config, date_key, total_habits, now);
            };

            let symptoms = symptoms_by_entry
                .get(&entry.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let completed = completed_by_entry
                .get(&entry.id)
                .map(Vec::as_slice)
                .unwrap_or_default();

            let mut seen = HashSet::new();
            let top_symptoms: Vec<String> = symptoms
                .iter()
                .filter(|log| seen.insert(log.symptom_name.as_str()))
                .take(SUMMARY_LABEL_LIMIT)
                .map(|log| log.symptom_name.clone())
                .collect();

            let note = entry.quick_note.trim();
            let activity = DayActivity {
                water_ml: entry.water_ml.max(0) as u32,
                water_goal_ml: entry.water_goal_ml.max(0) as u32,
                completed_habits: completed.len(),
                total_habits,
                symptom_count: symptoms.len(),
                has_note: !note.is_empty(),
                has_last_entry: entry.last_entry_at.is_some(),
            };

            HistoryDaySummary {
                date_key,
                date_label: format_day_label(date_key),
                relative_label: relative_day_label(date_key, today).map(str::to_string),
                status: classify_day(&activity),
                water_ml: activity.water_ml,
                water_goal_ml: activity.water_goal_ml,
                completed_habits_count: completed.len(),
                total_habits_count: total_habits,
                completed_habit_labels: completed
                    .iter()
                    .take(SUMMARY_LABEL_LIMIT)
                    .cloned()
                    .collect(),
                symptom_count: symptoms.len(),
                top_symptoms,
                quick_note_preview: note.to_string(),
                last_entry_at: entry.last_entry_at,
                has_journal: activity.has_note,
                has_any_activity: activity.has_any_activity(),
            }
        })
        .collect();

    summaries.reverse();
    tracing::debug!(
        days = summaries.len(),
        stored = rows.entries.len(),
        "History window built"
    );
    summaries
}

/// Labels of completed habits, system habits first, then custom ones, then
/// any completion key no longer backed by a known habit.
fn completed_habit_labels(config: &TrackerConfig, entry: &DailyEntry) -> Vec<String> {
    let mut labels: Vec<String> = entry
        .all_habits(&config.system_habits)
        .filter(|(id, _)| entry.is_completed(id))
        .map(|(_, label)| label.to_string())
        .collect();

    let known: HashSet<&str> = entry
        .all_habits(&config.system_habits)
        .map(|(id, _)| id)
        .collect();
    let orphaned = entry
        .habits_completion
        .iter()
        .filter(|(id, done)| **done && !known.contains(id.as_str()))
        .count();
    labels.extend(std::iter::repeat("Custom habit".to_string()).take(orphaned));
    labels
}

fn daily_insight_body(entry: &DailyEntry) -> &'static str {
    let total = entry.habits_completion.len();
    let ratio = if total > 0 {
        entry.completed_habits_count() as f64 / total as f64
    } else {
        0.0
    };
    let goal_reached = entry.water_goal_ml > 0 && entry.water_ml >= entry.water_goal_ml;

    if goal_reached && ratio >= STRONG_DAY_COMPLETION_RATIO {
        "You protected your baseline today with strong hydration and consistent habits. Repeating your first completed habit tomorrow can help keep that momentum."
    } else if !entry.symptom_logs.is_empty() {
        "Symptoms appeared today, but your logs make patterns visible. Keep tracking timing and intensity so tomorrow starts with better context."
    } else {
        "Your routine data is building useful signal over time. A small win tomorrow morning is enough to keep progress moving."
    }
}

pub fn build_day_detail(config: &TrackerConfig, entry: &DailyEntry) -> HistoryDetailViewModel {
    let mut symptoms = entry.symptom_logs.clone();
    symptoms.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));

    let note = entry.quick_note.trim();
    HistoryDetailViewModel {
        date_label: format_long_date_label(entry.date_key),
        hydration_value_label: format_ml(u64::from(entry.water_ml)),
        hydration_goal_label: format!("Target: {}", format_ml(u64::from(entry.water_goal_ml))),
        hydration_progress_percent: hydration_percent(entry.water_ml, entry.water_goal_ml),
        completed_habits_count: entry.completed_habits_count(),
        total_habits_count: entry.habits_completion.len(),
        completed_habit_labels: completed_habit_labels(config, entry),
        symptoms,
        insight_title: "Daily insight".into(),
        insight_body: daily_insight_body(entry).into(),
        journal_text: if note.is_empty() {
            "No evening journal saved for this day.".into()
        } else {
            note.to_string()
        },
        entry: entry.clone(),
    }
}

/// One section per calendar month, in order of first appearance. Day order
/// within a section is kept.
pub fn group_by_month(days: &[HistoryDaySummary]) -> Vec<HistoryMonthSection> {
    let mut sections: Vec<((i32, u32), HistoryMonthSection)> = Vec::new();

    for day in days {
        let key = (day.date_key.year(), day.date_key.month());
        match sections.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, section)) => section.data.push(day.clone()),
            None => sections.push((
                key,
                HistoryMonthSection {
                    title: format_month_label(day.date_key),
                    data: vec![day.clone()],
                },
            )),
        }
    }

    sections.into_iter().map(|(_, section)| section).collect()
}
