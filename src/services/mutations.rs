//! Pure entry mutations. Each returns a fresh snapshot with `last_entry_at`
//! set to `now`; validation failures leave the caller's entry untouched.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::config::TrackerConfig;
use crate::dto::{
    AddCustomHabitInput, AddSymptomPresetInput, HabitName, LogSymptomInput, SymptomLogDraft,
    SymptomName,
};
use crate::error::{AppError, AppResult};
use crate::models::entry::{CustomHabit, DailyEntry, SymptomLogEntry, SymptomPreset};
use crate::services::names::{normalize_name, same_name, slugify};

/// Millisecond stamp plus a short random tail so two ids minted at the same
/// instant still differ.
fn id_suffix(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &random[..8])
}

pub fn toggle_habit(entry: &DailyEntry, habit_id: &str, now: DateTime<Utc>) -> DailyEntry {
    let mut next = entry.clone();
    let current = entry.is_completed(habit_id);
    next.habits_completion.insert(habit_id.to_string(), !current);
    next.last_entry_at = Some(now);
    tracing::debug!(habit_id = %habit_id, completed = !current, "Habit toggled");
    next
}

/// Adds (or with a negative amount, removes) water. Never drops below zero.
pub fn add_water(entry: &DailyEntry, amount_ml: i32, now: DateTime<Utc>) -> DailyEntry {
    let mut next = entry.clone();
    let total = i64::from(entry.water_ml) + i64::from(amount_ml);
    next.water_ml = total.clamp(0, i64::from(u32::MAX)) as u32;
    next.last_entry_at = Some(now);
    next
}

pub fn save_quick_note(entry: &DailyEntry, note: &str, now: DateTime<Utc>) -> DailyEntry {
    let mut next = entry.clone();
    next.quick_note = note.to_string();
    next.last_entry_at = Some(now);
    next
}

pub fn add_custom_habit(
    entry: &DailyEntry,
    config: &TrackerConfig,
    input: &AddCustomHabitInput,
    now: DateTime<Utc>,
) -> AppResult<DailyEntry> {
    let name = HabitName {
        label: normalize_name(&input.label),
    };
    name.validate()?;

    let already_exists = entry
        .all_habits(&config.system_habits)
        .any(|(_, label)| same_name(label, &name.label));
    if already_exists {
        return Err(AppError::Validation("This habit already exists.".into()));
    }

    let habit = CustomHabit {
        id: format!("habit-{}-{}", slugify(&name.label), id_suffix(now)),
        label: name.label,
        icon: input.icon.unwrap_or_default(),
        created_at: now,
    };
    tracing::debug!(habit_id = %habit.id, "Custom habit added");

    let mut next = entry.clone();
    next.habits_completion.insert(habit.id.clone(), false);
    next.custom_habits.push(habit);
    next.last_entry_at = Some(now);
    Ok(next)
}

pub fn add_symptom_preset(
    entry: &DailyEntry,
    input: &AddSymptomPresetInput,
    now: DateTime<Utc>,
) -> AppResult<DailyEntry> {
    let name = SymptomName {
        name: normalize_name(&input.name),
    };
    name.validate()?;

    if entry
        .symptom_presets
        .iter()
        .any(|preset| same_name(&preset.name, &name.name))
    {
        return Err(AppError::Validation("This symptom already exists.".into()));
    }

    let mut next = entry.clone();
    next.symptom_presets.push(SymptomPreset {
        id: format!("symptom-{}-{}", slugify(&name.name), id_suffix(now)),
        name: name.name,
        is_default: false,
    });
    next.last_entry_at = Some(now);
    Ok(next)
}

pub fn log_symptom_detailed(
    entry: &DailyEntry,
    input: &LogSymptomInput,
    now: DateTime<Utc>,
) -> AppResult<DailyEntry> {
    let draft = SymptomLogDraft {
        symptom_name: normalize_name(&input.symptom_name),
        intensity: input.intensity,
    };
    draft.validate()?;

    let log = SymptomLogEntry {
        id: format!("symptom-log-{}", id_suffix(now)),
        symptom_name: draft.symptom_name,
        intensity: draft.intensity,
        note: normalize_name(input.note.as_deref().unwrap_or_default()),
        logged_at: input.logged_at.unwrap_or(now),
    };
    tracing::debug!(log_id = %log.id, intensity = log.intensity, "Symptom logged");

    let mut next = entry.clone();
    next.symptom_logs.push(log);
    next.last_entry_at = Some(now);
    Ok(next)
}

/// Most recently appended symptom log.
pub fn last_symptom(entry: &DailyEntry) -> Option<&SymptomLogEntry> {
    entry.symptom_logs.last()
}
