use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::config::TrackerConfig;
use crate::dto::{
    HabitsSummary, NextAction, NextBestActionVm, QuickSummaryVm, ReviewCtaVariant, ReviewInsight,
    SymptomsSummary, TimelineEventType, TimelineEventVm, TodayStatus, TodayViewModel,
    WaterSummary,
};
use crate::format::{
    format_long_date_label, format_time_label, hydration_percent, local_date, to_date_key,
};
use crate::models::entry::DailyEntry;

const TIMELINE_LIMIT: usize = 5;
const TIMELINE_HABIT_LIMIT: usize = 2;
const REVIEW_EMPHASIS_THRESHOLD: usize = 4;

pub fn select_status(entry: &DailyEntry) -> TodayStatus {
    let has_activity = entry.habits_completion.values().any(|done| *done)
        || entry.water_ml > 0
        || !entry.symptom_logs.is_empty()
        || entry.has_note();
    if has_activity {
        TodayStatus::InProgress
    } else {
        TodayStatus::Empty
    }
}

/// Completed habits plus one point each for water, symptoms and a note.
pub fn count_logged_items(entry: &DailyEntry) -> usize {
    entry.completed_habits_count()
        + usize::from(entry.water_ml > 0)
        + usize::from(!entry.symptom_logs.is_empty())
        + usize::from(entry.has_note())
}

pub fn total_habits(config: &TrackerConfig, entry: &DailyEntry) -> usize {
    config.system_habits.len() + entry.custom_habits.len()
}

pub fn tracked_items_total(config: &TrackerConfig, entry: &DailyEntry) -> usize {
    total_habits(config, entry) + 3
}

pub fn greeting_label(now: &DateTime<FixedOffset>) -> &'static str {
    match now.hour() {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// First incomplete habit, system habits before custom ones.
fn pending_habit<'a>(config: &'a TrackerConfig, entry: &'a DailyEntry) -> Option<(&'a str, &'a str)> {
    entry
        .all_habits(&config.system_habits)
        .find(|(id, _)| !entry.is_completed(id))
}

pub fn select_view_model(
    config: &TrackerConfig,
    entry: &DailyEntry,
    now: &DateTime<FixedOffset>,
) -> TodayViewModel {
    let status = select_status(entry);
    let logged = count_logged_items(entry);
    let last_entry_label = match entry.last_entry_at {
        Some(ts) => format_time_label(ts, now.offset()),
        None => "No entries yet".into(),
    };

    TodayViewModel {
        date_label: format_long_date_label(local_date(now)),
        greeting_label: greeting_label(now).into(),
        day_status: status,
        day_status_label: match status {
            TodayStatus::Empty => "Waiting for your first entry".into(),
            TodayStatus::InProgress => "Day in progress".into(),
        },
        progress_label: format!(
            "{} of {} items logged",
            logged,
            tracked_items_total(config, entry)
        ),
        last_entry_label,
        water_progress_percent: hydration_percent(entry.water_ml, entry.water_goal_ml),
        review_cta_variant: if logged >= REVIEW_EMPHASIS_THRESHOLD {
            ReviewCtaVariant::Emphasized
        } else {
            ReviewCtaVariant::Default
        },
    }
}

// ── Next best action ────────────────────────────────────────────────────────

struct ActionContext<'a> {
    entry: &'a DailyEntry,
    logged: usize,
    hour: u32,
    water_percent: u32,
    pending_habit: Option<(&'a str, &'a str)>,
}

struct ActionRule {
    applies: fn(&ActionContext<'_>) -> bool,
    build: fn(&ActionContext<'_>) -> NextBestActionVm,
}

fn suggestion(title: &str, subtitle: &str, button_label: &str, action: NextAction) -> NextBestActionVm {
    NextBestActionVm {
        title: title.into(),
        subtitle: subtitle.into(),
        button_label: button_label.into(),
        action,
        habit_id: None,
    }
}

fn complete_pending(ctx: &ActionContext<'_>, title: &str, subtitle: &str) -> NextBestActionVm {
    match ctx.pending_habit {
        Some((id, label)) => NextBestActionVm {
            habit_id: Some(id.to_string()),
            ..suggestion(
                title,
                subtitle,
                &format!("Complete {}", label),
                NextAction::CompleteHabit,
            )
        },
        None => suggestion(title, subtitle, "Log a habit", NextAction::AddWater),
    }
}

fn ready_for_review() -> NextBestActionVm {
    suggestion(
        "Ready when you are",
        "Review your day whenever it feels right.",
        "Go to Review",
        NextAction::GoReview,
    )
}

/// Evaluated top to bottom; the first matching rule wins. The last rule
/// always matches.
const NEXT_ACTION_RULES: &[ActionRule] = &[
    ActionRule {
        applies: |ctx| ctx.logged == 0 && ctx.hour < 16,
        build: |_| {
            suggestion(
                "Good start",
                "Log your first action of the day.",
                "+250 ml now",
                NextAction::AddWater,
            )
        },
    },
    ActionRule {
        applies: |ctx| ctx.logged == 0,
        build: |ctx| {
            complete_pending(ctx, "Start your routine", "One quick habit can kick off your day.")
        },
    },
    ActionRule {
        applies: |ctx| ctx.logged >= REVIEW_EMPHASIS_THRESHOLD || ctx.hour >= 20,
        build: |_| {
            suggestion(
                "Almost there",
                "Your day looks consistent.",
                "Go to Review",
                NextAction::GoReview,
            )
        },
    },
    ActionRule {
        applies: |ctx| ctx.water_percent < 60,
        build: |_| {
            suggestion(
                "Hydration check",
                "A quick water update keeps momentum.",
                "+250 ml now",
                NextAction::AddWater,
            )
        },
    },
    ActionRule {
        applies: |ctx| ctx.pending_habit.is_some(),
        build: |ctx| complete_pending(ctx, "Next step", "Keep your streak going with one habit."),
    },
    ActionRule {
        applies: |ctx| ctx.entry.symptom_logs.is_empty() && ctx.hour >= 14,
        build: |_| {
            suggestion(
                "Body check",
                "No symptoms yet. Log if anything changed.",
                "Log symptom",
                NextAction::LogSymptom,
            )
        },
    },
    ActionRule {
        applies: |ctx| !ctx.entry.has_note() && ctx.hour >= 17,
        build: |_| {
            suggestion(
                "Quick reflection",
                "Save a short note before day review.",
                "Add a note",
                NextAction::AddNote,
            )
        },
    },
    ActionRule {
        applies: |_| true,
        build: |_| ready_for_review(),
    },
];

pub fn select_next_best_action(
    config: &TrackerConfig,
    entry: &DailyEntry,
    now: &DateTime<FixedOffset>,
) -> NextBestActionVm {
    let ctx = ActionContext {
        entry,
        logged: count_logged_items(entry),
        hour: now.hour(),
        water_percent: hydration_percent(entry.water_ml, entry.water_goal_ml),
        pending_habit: pending_habit(config, entry),
    };

    NEXT_ACTION_RULES
        .iter()
        .find(|rule| (rule.applies)(&ctx))
        .map(|rule| (rule.build)(&ctx))
        .unwrap_or_else(ready_for_review)
}

// ── Timeline ────────────────────────────────────────────────────────────────

/// Newest first, at most five events. Water, habit and note events share
/// `last_entry_at` since only one timestamp is kept per day.
pub fn select_timeline_events(
    config: &TrackerConfig,
    entry: &DailyEntry,
    offset: &FixedOffset,
) -> Vec<TimelineEventVm> {
    let mut events: Vec<(DateTime<Utc>, TimelineEventVm)> = entry
        .symptom_logs
        .iter()
        .map(|log| {
            (
                log.logged_at,
                TimelineEventVm {
                    id: format!("symptom-{}", log.id),
                    time: format_time_label(log.logged_at, offset),
                    icon: "bandage".into(),
                    label: format!("{} intensity {}", log.symptom_name, log.intensity),
                    kind: TimelineEventType::Symptom,
                },
            )
        })
        .collect();

    if let Some(last_entry_at) = entry.last_entry_at {
        let time = format_time_label(last_entry_at, offset);
        let date_key = to_date_key(entry.date_key);

        if entry.water_ml > 0 {
            events.push((
                last_entry_at,
                TimelineEventVm {
                    id: format!("water-{}", date_key),
                    time: time.clone(),
                    icon: "water".into(),
                    label: format!("{} ml water logged", entry.water_ml),
                    kind: TimelineEventType::Water,
                },
            ));
        }

        let completed = entry
            .all_habits(&config.system_habits)
            .filter(|(id, _)| entry.is_completed(id))
            .take(TIMELINE_HABIT_LIMIT);
        for (id, label) in completed {
            events.push((
                last_entry_at,
                TimelineEventVm {
                    id: format!("habit-{}", id),
                    time: time.clone(),
                    icon: "checkmark-circle".into(),
                    label: format!("{} completed", label),
                    kind: TimelineEventType::Habit,
                },
            ));
        }

        if entry.has_note() {
            events.push((
                last_entry_at,
                TimelineEventVm {
                    id: format!("note-{}", date_key),
                    time,
                    icon: "create".into(),
                    label: "Quick note updated".into(),
                    kind: TimelineEventType::Note,
                },
            ));
        }
    }

    events.sort_by(|a, b| b.0.cmp(&a.0));
    events
        .into_iter()
        .take(TIMELINE_LIMIT)
        .map(|(_, event)| event)
        .collect()
}

pub fn select_quick_summary(config: &TrackerConfig, entry: &DailyEntry) -> QuickSummaryVm {
    QuickSummaryVm {
        water: WaterSummary {
            current: entry.water_ml,
            goal: entry.water_goal_ml,
        },
        habits: HabitsSummary {
            completed: entry.completed_habits_count(),
            total: total_habits(config, entry),
        },
        symptoms: SymptomsSummary {
            count: entry.symptom_logs.len(),
        },
    }
}

/// Day-review card: "solid momentum" needs 60% of habits and 60% hydration.
pub fn select_review_insight(entry: &DailyEntry) -> ReviewInsight {
    let completed = entry.completed_habits_count();
    let total = entry.habits_completion.len();
    let required = (total as f64 * 0.6).ceil() as usize;
    let has_solid_momentum =
        completed >= required && hydration_percent(entry.water_ml, entry.water_goal_ml) >= 60;

    if has_solid_momentum {
        ReviewInsight {
            has_solid_momentum,
            title: "Great Momentum Today".into(),
            body: "You kept habits and hydration moving in the right direction. Try repeating the same first habit tomorrow morning to keep the streak alive.".into(),
        }
    } else {
        ReviewInsight {
            has_solid_momentum,
            title: "Small Win for Tomorrow".into(),
            body: "Start tomorrow with one easy habit and one glass of water in the first hour. A fast start usually makes the rest of the day easier.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::builder::create_default_entry;
    use crate::services::mutations::{add_water, save_quick_note, toggle_habit};
    use crate::models::entry::SymptomLogEntry;
    use chrono::{NaiveDate, TimeZone};

    fn config() -> TrackerConfig {
        TrackerConfig::default()
    }

    fn entry() -> DailyEntry {
        create_default_entry(&config(), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    fn at(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 10, hour, 0, 0)
            .unwrap()
    }

    fn utc(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn symptom(id: &str, hour: u32) -> SymptomLogEntry {
        SymptomLogEntry {
            id: id.into(),
            symptom_name: "Headache".into(),
            intensity: 2,
            note: String::new(),
            logged_at: utc(hour),
        }
    }

    #[test]
    fn test_status_and_logged_count() {
        let e = entry();
        assert_eq!(select_status(&e), TodayStatus::Empty);
        assert_eq!(count_logged_items(&e), 0);

        let e = save_quick_note(&e, "   ", utc(8));
        assert_eq!(select_status(&e), TodayStatus::Empty);

        let e = add_water(&e, 250, utc(8));
        let e = toggle_habit(&e, "coffee", utc(8));
        assert_eq!(select_status(&e), TodayStatus::InProgress);
        assert_eq!(count_logged_items(&e), 2);
        assert_eq!(tracked_items_total(&config(), &e), 6);
    }

    #[test]
    fn test_greeting_boundaries() {
        assert_eq!(greeting_label(&at(11)), "Good morning");
        assert_eq!(greeting_label(&at(12)), "Good afternoon");
        assert_eq!(greeting_label(&at(17)), "Good afternoon");
        assert_eq!(greeting_label(&at(18)), "Good evening");
    }

    #[test]
    fn test_view_model_labels() {
        let e = add_water(&entry(), 1200, utc(9));
        let vm = select_view_model(&config(), &e, &at(9));
        assert_eq!(vm.date_label, "Monday, Mar 10");
        assert_eq!(vm.progress_label, "1 of 6 items logged");
        assert_eq!(vm.last_entry_label, "9:00 AM");
        assert_eq!(vm.water_progress_percent, 60);
        assert_eq!(vm.day_status_label, "Day in progress");
        assert_eq!(vm.review_cta_variant, ReviewCtaVariant::Default);

        let vm = select_view_model(&config(), &entry(), &at(9));
        assert_eq!(vm.last_entry_label, "No entries yet");
        assert_eq!(vm.day_status_label, "Waiting for your first entry");
    }

    #[test]
    fn test_review_cta_emphasized_at_four_items() {
        let mut e = add_water(&entry(), 250, utc(9));
        e = toggle_habit(&e, "coffee", utc(9));
        e = toggle_habit(&e, "study", utc(9));
        e = save_quick_note(&e, "ok", utc(9));
        let vm = select_view_model(&config(), &e, &at(10));
        assert_eq!(vm.review_cta_variant, ReviewCtaVariant::Emphasized);
    }

    #[test]
    fn test_next_action_empty_morning_adds_water() {
        let action = select_next_best_action(&config(), &entry(), &at(9));
        assert_eq!(action.action, NextAction::AddWater);
        assert_eq!(action.button_label, "+250 ml now");
    }

    #[test]
    fn test_next_action_empty_afternoon_completes_habit() {
        let action = select_next_best_action(&config(), &entry(), &at(17));
        assert_eq!(action.action, NextAction::CompleteHabit);
        assert_eq!(action.habit_id.as_deref(), Some("coffee"));
        assert_eq!(action.button_label, "Complete Coffee");
    }

    #[test]
    fn test_next_action_late_evening_goes_to_review() {
        let e = add_water(&entry(), 100, utc(20));
        let action = select_next_best_action(&config(), &e, &at(20));
        assert_eq!(action.action, NextAction::GoReview);
        assert_eq!(action.title, "Almost there");
    }

    #[test]
    fn test_next_action_low_hydration() {
        let e = toggle_habit(&entry(), "coffee", utc(10));
        let action = select_next_best_action(&config(), &e, &at(10));
        assert_eq!(action.action, NextAction::AddWater);
        assert_eq!(action.title, "Hydration check");
    }

    #[test]
    fn test_next_action_pending_habit_after_hydration() {
        let e = add_water(&entry(), 1500, utc(10));
        let e = toggle_habit(&e, "coffee", utc(10));
        let action = select_next_best_action(&config(), &e, &at(10));
        assert_eq!(action.action, NextAction::CompleteHabit);
        assert_eq!(action.habit_id.as_deref(), Some("study"));
    }

    #[test]
    fn test_next_action_symptom_then_note_then_review() {
        let mut e = entry();
        e.habits_completion.clear();
        e = add_water(&e, 1500, utc(10));
        let mut cfg = config();
        cfg.system_habits.clear();

        let action = select_next_best_action(&cfg, &e, &at(15));
        assert_eq!(action.action, NextAction::LogSymptom);

        let action = select_next_best_action(&cfg, &e, &at(13));
        assert_eq!(action.action, NextAction::GoReview);
        assert_eq!(action.title, "Ready when you are");

        e.symptom_logs.push(symptom("s1", 15));
        let action = select_next_best_action(&cfg, &e, &at(17));
        assert_eq!(action.action, NextAction::AddNote);
    }

    #[test]
    fn test_timeline_sorted_and_truncated() {
        let mut e = entry();
        e.symptom_logs.push(symptom("a", 8));
        e.symptom_logs.push(symptom("b", 14));
        let events = select_timeline_events(&config(), &e, &FixedOffset::east_opt(0).unwrap());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "symptom-b");
        assert_eq!(events[0].time, "2:00 PM");
        assert_eq!(events[1].id, "symptom-a");

        let mut e = add_water(&e, 500, utc(12));
        e = toggle_habit(&e, "coffee", utc(12));
        e = toggle_habit(&e, "study", utc(12));
        e = toggle_habit(&e, "workout", utc(12));
        e = save_quick_note(&e, "fine", utc(12));
        let events = select_timeline_events(&config(), &e, &FixedOffset::east_opt(0).unwrap());
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].id, "symptom-b");
        let habit_events = events
            .iter()
            .filter(|ev| ev.kind == TimelineEventType::Habit)
            .count();
        assert_eq!(habit_events, 2);
        assert!(events.iter().all(|ev| ev.id != "symptom-a"));
    }

    #[test]
    fn test_timeline_without_last_entry_has_only_symptoms() {
        let mut e = entry();
        e.water_ml = 500;
        e.symptom_logs.push(symptom("a", 8));
        let events = select_timeline_events(&config(), &e, &FixedOffset::east_opt(0).unwrap());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, TimelineEventType::Symptom);
    }

    #[test]
    fn test_quick_summary() {
        let e = add_water(&entry(), 700, utc(9));
        let e = toggle_habit(&e, "workout", utc(9));
        let summary = select_quick_summary(&config(), &e);
        assert_eq!(summary.water.current, 700);
        assert_eq!(summary.water.goal, 2000);
        assert_eq!(summary.habits.completed, 1);
        assert_eq!(summary.habits.total, 3);
        assert_eq!(summary.symptoms.count, 0);
    }

    #[test]
    fn test_review_insight_momentum() {
        let e = add_water(&entry(), 1200, utc(9));
        let e = toggle_habit(&e, "coffee", utc(9));
        assert!(!select_review_insight(&e).has_solid_momentum);
        let e = toggle_habit(&e, "study", utc(9));
        let insight = select_review_insight(&e);
        assert!(insight.has_solid_momentum);
        assert_eq!(insight.title, "Great Momentum Today");
    }
}
