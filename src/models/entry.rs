use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "habit_icon", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HabitIcon {
    Cafe,
    Book,
    Barbell,
    #[default]
    Leaf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitDefinition {
    pub id: String,
    pub label: String,
    pub icon: HabitIcon,
}

impl HabitDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: HabitIcon) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomHabit {
    pub id: String,
    pub label: String,
    pub icon: HabitIcon,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomPreset {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLogEntry {
    pub id: String,
    pub symptom_name: String,
    /// 1 (barely noticeable) to 5 (severe).
    pub intensity: u8,
    pub note: String,
    pub logged_at: DateTime<Utc>,
}

/// Canonical per-day record. One per user per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date_key: NaiveDate,
    pub water_ml: u32,
    pub water_goal_ml: u32,
    pub quick_note: String,
    pub habits_completion: BTreeMap<String, bool>,
    pub custom_habits: Vec<CustomHabit>,
    pub symptom_presets: Vec<SymptomPreset>,
    pub symptom_logs: Vec<SymptomLogEntry>,
    pub last_entry_at: Option<DateTime<Utc>>,
}

impl DailyEntry {
    pub fn is_completed(&self, habit_id: &str) -> bool {
        self.habits_completion.get(habit_id).copied().unwrap_or(false)
    }

    pub fn completed_habits_count(&self) -> usize {
        self.habits_completion.values().filter(|done| **done).count()
    }

    pub fn has_note(&self) -> bool {
        !self.quick_note.trim().is_empty()
    }

    /// System habits first (configured order), then custom habits.
    pub fn all_habits<'a>(
        &'a self,
        system_habits: &'a [HabitDefinition],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        system_habits
            .iter()
            .map(|h| (h.id.as_str(), h.label.as_str()))
            .chain(
                self.custom_habits
                    .iter()
                    .map(|h| (h.id.as_str(), h.label.as_str())),
            )
    }
}
