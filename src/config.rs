use std::env;

use crate::models::entry::{HabitDefinition, HabitIcon};

pub const DEFAULT_WATER_GOAL_ML: u32 = 2000;

/// Immutable tracker configuration handed to the builder and mutators.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub default_water_goal_ml: u32,
    pub system_habits: Vec<HabitDefinition>,
    pub default_symptom_presets: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_water_goal_ml: DEFAULT_WATER_GOAL_ML,
            system_habits: vec![
                HabitDefinition::new("coffee", "Coffee", HabitIcon::Cafe),
                HabitDefinition::new("study", "Study", HabitIcon::Book),
                HabitDefinition::new("workout", "Workout", HabitIcon::Barbell),
            ],
            default_symptom_presets: vec![
                "Headache".into(),
                "Negative thoughts".into(),
                "Fatigue".into(),
                "Anxiety".into(),
                "Bloating".into(),
            ],
        }
    }
}

impl TrackerConfig {
    /// Defaults, with `DEFAULT_WATER_GOAL_ML` taken from the environment
    /// (or a `.env` file) when it holds a positive integer.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            default_water_goal_ml: env::var("DEFAULT_WATER_GOAL_ML")
                .ok()
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .filter(|goal| *goal > 0)
                .unwrap_or(DEFAULT_WATER_GOAL_ML),
            ..Self::default()
        };

        tracing::debug!(
            water_goal_ml = config.default_water_goal_ml,
            system_habits = config.system_habits.len(),
            "Tracker config loaded"
        );
        config
    }

    pub fn is_system_habit(&self, habit_id: &str) -> bool {
        self.system_habits.iter().any(|habit| habit.id == habit_id)
    }

    pub fn system_habit_label(&self, habit_id: &str) -> Option<&str> {
        self.system_habits
            .iter()
            .find(|habit| habit.id == habit_id)
            .map(|habit| habit.label.as_str())
    }
}
