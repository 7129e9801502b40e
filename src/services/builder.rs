use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::config::TrackerConfig;
use crate::models::entry::{CustomHabit, DailyEntry, SymptomLogEntry, SymptomPreset};
use crate::models::rows::EntryRows;
use crate::services::names::{name_key, slugify};

fn initial_habits_completion(config: &TrackerConfig) -> BTreeMap<String, bool> {
    config
        .system_habits
        .iter()
        .map(|habit| (habit.id.clone(), false))
        .collect()
}

fn default_symptom_presets(config: &TrackerConfig) -> Vec<SymptomPreset> {
    config
        .default_symptom_presets
        .iter()
        .map(|name| SymptomPreset {
            id: format!("symptom-{}", slugify(name)),
            name: name.clone(),
            is_default: true,
        })
        .collect()
}

/// Placeholder entry for a day with no stored row yet.
pub fn create_default_entry(config: &TrackerConfig, date_key: NaiveDate) -> DailyEntry {
    DailyEntry {
        date_key,
        water_ml: 0,
        water_goal_ml: config.default_water_goal_ml,
        quick_note: String::new(),
        habits_completion: initial_habits_completion(config),
        custom_habits: Vec::new(),
        symptom_presets: default_symptom_presets(config),
        symptom_logs: Vec::new(),
        last_entry_at: None,
    }
}

/// Assemble the canonical entry from the rows fetched for one day.
///
/// Every system and custom habit gets a `false` slot first; status rows then
/// overwrite it (system rows before custom rows). Status rows for habits
/// that no longer exist are ignored. Persisted presets that collide with a
/// default name are dropped.
pub fn build_entry(config: &TrackerConfig, rows: &EntryRows) -> DailyEntry {
    let mut habits_completion = initial_habits_completion(config);
    for habit in &rows.custom_habits {
        habits_completion.insert(habit.id.clone(), false);
    }
    for status in &rows.system_statuses {
        if let Some(slot) = habits_completion.get_mut(&status.habit_id) {
            *slot = status.is_completed;
        }
    }
    for status in &rows.custom_statuses {
        if let Some(slot) = habits_completion.get_mut(&status.custom_habit_id) {
            *slot = status.is_completed;
        }
    }

    let mut symptom_presets = default_symptom_presets(config);
    let default_names: HashSet<String> = symptom_presets
        .iter()
        .map(|preset| name_key(&preset.name))
        .collect();
    let custom_presets: Vec<SymptomPreset> = rows
        .symptom_presets
        .iter()
        .filter(|preset| !default_names.contains(&name_key(&preset.name)))
        .map(|preset| SymptomPreset {
            id: preset.id.clone(),
            name: preset.name.clone(),
            is_default: false,
        })
        .collect();
    if custom_presets.len() < rows.symptom_presets.len() {
        tracing::debug!(
            dropped = rows.symptom_presets.len() - custom_presets.len(),
            "Skipped stored presets shadowing defaults"
        );
    }
    symptom_presets.extend(custom_presets);

    let row = &rows.entry;
    DailyEntry {
        date_key: row.entry_date,
        water_ml: row.water_ml.max(0) as u32,
        water_goal_ml: if row.water_goal_ml > 0 {
            row.water_goal_ml as u32
        } else {
            config.default_water_goal_ml
        },
        quick_note: row.quick_note.clone(),
        habits_completion,
        custom_habits: rows
            .custom_habits
            .iter()
            .map(|habit| CustomHabit {
                id: habit.id.clone(),
                label: habit.label.clone(),
                icon: habit.icon,
                created_at: habit.created_at,
            })
            .collect(),
        symptom_presets,
        symptom_logs: rows
            .symptom_logs
            .iter()
            .map(|log| SymptomLogEntry {
                id: log.id.clone(),
                symptom_name: log.symptom_name.clone(),
                intensity: log.intensity.clamp(1, 5) as u8,
                note: log.note.clone(),
                logged_at: log.logged_at,
            })
            .collect(),
        last_entry_at: row.last_entry_at,
    }
}
