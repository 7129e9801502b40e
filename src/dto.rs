//! # Daylog: view-model shapes
//!
//! Everything the presentation layer receives from this crate. Each struct
//! serializes to the camelCase JSON the mobile screens bind to.
//!
//! Conventions:
//! - `*Input`   → user action parameters, validated with `validator`
//! - `*ViewModel` / `*Vm` → derived, display-ready values
//! - Nothing here is persisted; every value is recomputed on read

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::entry::{DailyEntry, HabitIcon, SymptomLogEntry};

// ============================================================================
// Action inputs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AddCustomHabitInput {
    pub label: String,
    pub icon: Option<HabitIcon>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddSymptomPresetInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSymptomInput {
    pub symptom_name: String,
    pub intensity: u8,
    pub note: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
}

/// Habit label after whitespace normalization.
#[derive(Debug, Validate)]
pub(crate) struct HabitName {
    #[validate(length(
        min = 2,
        max = 32,
        message = "Habit name should be 2-32 characters."
    ))]
    pub label: String,
}

/// Symptom name after whitespace normalization.
#[derive(Debug, Validate)]
pub(crate) struct SymptomName {
    #[validate(length(
        min = 2,
        max = 40,
        message = "Symptom name should be 2-40 characters."
    ))]
    pub name: String,
}

#[derive(Debug, Validate)]
pub(crate) struct SymptomLogDraft {
    #[validate(length(
        min = 2,
        max = 40,
        message = "Symptom name should be 2-40 characters."
    ))]
    pub symptom_name: String,

    #[validate(range(min = 1, max = 5, message = "Intensity must be between 1 and 5."))]
    pub intensity: u8,
}

// ============================================================================
// Today
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodayStatus {
    Empty,
    InProgress,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewCtaVariant {
    Default,
    Emphasized,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TodayViewModel {
    pub date_label: String,
    pub greeting_label: String,
    pub day_status: TodayStatus,
    pub day_status_label: String,
    pub progress_label: String,
    pub last_entry_label: String,
    pub water_progress_percent: u32,
    pub review_cta_variant: ReviewCtaVariant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    AddWater,
    CompleteHabit,
    LogSymptom,
    AddNote,
    GoReview,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextBestActionVm {
    pub title: String,
    pub subtitle: String,
    pub button_label: String,
    pub action: NextAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habit_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineEventType {
    Symptom,
    Water,
    Habit,
    Note,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEventVm {
    pub id: String,
    pub time: String,
    pub icon: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: TimelineEventType,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WaterSummary {
    pub current: u32,
    pub goal: u32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct HabitsSummary {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SymptomsSummary {
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct QuickSummaryVm {
    pub water: WaterSummary,
    pub habits: HabitsSummary,
    pub symptoms: SymptomsSummary,
}

/// Day-review card copy.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInsight {
    pub has_solid_momentum: bool,
    pub title: String,
    pub body: String,
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDayStatus {
    NoData,
    PendingReview,
    Reviewed,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDaySummary {
    pub date_key: NaiveDate,
    pub date_label: String,
    pub relative_label: Option<String>,
    pub status: HistoryDayStatus,
    pub water_ml: u32,
    pub water_goal_ml: u32,
    pub completed_habits_count: usize,
    pub total_habits_count: usize,
    pub completed_habit_labels: Vec<String>,
    pub symptom_count: usize,
    pub top_symptoms: Vec<String>,
    pub quick_note_preview: String,
    pub last_entry_at: Option<DateTime<Utc>>,
    pub has_journal: bool,
    pub has_any_activity: bool,
}

impl HistoryDaySummary {
    /// Capped at 1.0: completions of archived habits still count toward
    /// `completed_habits_count` but not toward the total.
    pub fn completion_ratio(&self) -> f64 {
        if self.total_habits_count == 0 {
            return 0.0;
        }
        (self.completed_habits_count as f64 / self.total_habits_count as f64).min(1.0)
    }

    pub fn water_goal_reached(&self) -> bool {
        self.water_goal_ml > 0 && self.water_ml >= self.water_goal_ml
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryMonthSection {
    pub title: String,
    pub data: Vec<HistoryDaySummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetailViewModel {
    pub entry: DailyEntry,
    pub date_label: String,
    pub hydration_value_label: String,
    pub hydration_goal_label: String,
    pub hydration_progress_percent: u32,
    pub completed_habits_count: usize,
    pub total_habits_count: usize,
    pub completed_habit_labels: Vec<String>,
    pub symptoms: Vec<SymptomLogEntry>,
    pub insight_title: String,
    pub insight_body: String,
    pub journal_text: String,
}

// ============================================================================
// KPIs & Insights
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KpiCategory {
    Hydration,
    Habits,
    Symptoms,
    Journal,
    #[default]
    All,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KpiCardItem {
    pub label: String,
    pub value: String,
    pub delta: String,
}

impl KpiCardItem {
    pub(crate) fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        delta: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: delta.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_ratio_is_capped() {
        let day = HistoryDaySummary {
            date_key: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            date_label: "Mar 10".into(),
            relative_label: None,
            status: HistoryDayStatus::Reviewed,
            water_ml: 2000,
            water_goal_ml: 2000,
            completed_habits_count: 4,
            total_habits_count: 3,
            completed_habit_labels: Vec::new(),
            symptom_count: 0,
            top_symptoms: Vec::new(),
            quick_note_preview: String::new(),
            last_entry_at: None,
            has_journal: false,
            has_any_activity: true,
        };
        assert_eq!(day.completion_ratio(), 1.0);
        let day = HistoryDaySummary {
            completed_habits_count: 0,
            total_habits_count: 0,
            ..day
        };
        assert_eq!(day.completion_ratio(), 0.0);
    }

    #[test]
    fn test_habit_name_bounds() {
        let name = |label: &str| HabitName {
            label: label.to_string(),
        };
        assert!(name("Read").validate().is_ok());
        assert!(name("R").validate().is_err());
        assert!(name(&"x".repeat(32)).validate().is_ok());
        assert!(name(&"x".repeat(33)).validate().is_err());
    }

    #[test]
    fn test_symptom_name_bounds() {
        let name = |value: &str| SymptomName {
            name: value.to_string(),
        };
        assert!(name(&"x".repeat(2)).validate().is_ok());
        assert!(name(&"x".repeat(40)).validate().is_ok());
        assert!(name(&"x".repeat(41)).validate().is_err());
    }

    #[test]
    fn test_symptom_log_draft_rejects_intensity_out_of_range() {
        let draft = SymptomLogDraft {
            symptom_name: "Headache".into(),
            intensity: 6,
        };
        assert!(draft.validate().is_err());
        let draft = SymptomLogDraft {
            symptom_name: "Headache".into(),
            intensity: 5,
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_next_best_action_omits_missing_habit_id() {
        let vm = NextBestActionVm {
            title: "Good start".into(),
            subtitle: "Log your first action of the day.".into(),
            button_label: "+250 ml now".into(),
            action: NextAction::AddWater,
            habit_id: None,
        };
        let json = serde_json::to_value(&vm).unwrap();
        assert_eq!(json["action"], "add_water");
        assert_eq!(json["buttonLabel"], "+250 ml now");
        assert!(json.get("habitId").is_none());
    }

    #[test]
    fn test_timeline_event_serializes_type_field() {
        let event = TimelineEventVm {
            id: "note-2025-03-10".into(),
            time: "9:00 AM".into(),
            icon: "create".into(),
            label: "Quick note updated".into(),
            kind: TimelineEventType::Note,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "note");
        assert!(json.get("timestamp").is_none());
    }

    #[test]
    fn test_history_status_serialization() {
        let json = serde_json::to_value(HistoryDayStatus::PendingReview).unwrap();
        assert_eq!(json, "pending_review");
        let category: KpiCategory = serde_json::from_str("\"hydration\"").unwrap();
        assert_eq!(category, KpiCategory::Hydration);
    }
}
