//! Row shapes read from the hosted database. Querying happens outside this
//! crate; these only describe the columns the builder consumes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::entry::HabitIcon;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyEntryRow {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub water_ml: i32,
    pub water_goal_ml: i32,
    pub quick_note: String,
    pub last_entry_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomHabitRow {
    pub id: String,
    pub label: String,
    pub icon: HabitIcon,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SymptomPresetRow {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SymptomLogRow {
    pub id: String,
    pub entry_id: Uuid,
    pub symptom_name: String,
    pub intensity: i16,
    pub note: String,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SystemHabitStatusRow {
    pub entry_id: Uuid,
    pub habit_id: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomHabitStatusRow {
    pub entry_id: Uuid,
    pub custom_habit_id: String,
    pub is_completed: bool,
}

/// Everything fetched for a single day.
#[derive(Debug, Clone)]
pub struct EntryRows {
    pub entry: DailyEntryRow,
    pub custom_habits: Vec<CustomHabitRow>,
    pub symptom_presets: Vec<SymptomPresetRow>,
    pub symptom_logs: Vec<SymptomLogRow>,
    pub system_statuses: Vec<SystemHabitStatusRow>,
    pub custom_statuses: Vec<CustomHabitStatusRow>,
}

/// Everything fetched for a trailing window of days.
#[derive(Debug, Clone, Default)]
pub struct HistoryRows {
    pub entries: Vec<DailyEntryRow>,
    pub symptom_logs: Vec<SymptomLogRow>,
    pub system_statuses: Vec<SystemHabitStatusRow>,
    pub custom_statuses: Vec<CustomHabitStatusRow>,
    /// Non-archived custom habits of the user.
    pub custom_habits: Vec<CustomHabitRow>,
}
