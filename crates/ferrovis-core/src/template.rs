//! Template entities: the reference rows written once by the bootstrapper.
//!
//! Templates are catalog data: programs, exercises, achievements and fake
//! social activity. Downstream user activity references them by id but never
//! mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The four template tables, in seeding order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemplateKind {
  Program,
  Exercise,
  Achievement,
  FakeSocialActivity,
}

impl TemplateKind {
  /// Every kind, in the order batches are inserted.
  pub const ALL: [TemplateKind; 4] = [
    TemplateKind::Program,
    TemplateKind::Exercise,
    TemplateKind::Achievement,
    TemplateKind::FakeSocialActivity,
  ];

  /// Name of the backing table.
  pub fn table(self) -> &'static str {
    match self {
      Self::Program => "programs",
      Self::Exercise => "exercises",
      Self::Achievement => "achievements",
      Self::FakeSocialActivity => "fake_social_activities",
    }
  }
}

// ─── Enumerations ────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExerciseCategory {
  Compound,
  Isolation,
  Cardio,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AchievementCategory {
  Consistency,
  Strength,
  Social,
  Funny,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityType {
  WorkoutCompleted,
  StreakExtended,
  PrAchieved,
}

// ─── Templates ───────────────────────────────────────────────────────────────

/// A training program such as "Starting Strength".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTemplate {
  pub name:           String,
  pub description:    String,
  pub difficulty:     Difficulty,
  pub duration_weeks: u32,
  /// Schedule, exercise list and progression scheme. Stored as JSON text and
  /// never interpreted by the bootstrapper.
  pub structure:      serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
  pub name:                String,
  pub category:            ExerciseCategory,
  pub muscle_groups:       Vec<String>,
  pub instructions:        String,
  /// Factor applied when displaying progress in Weasel Mode. Always `>= 1.0`.
  pub progress_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementTemplate {
  pub name:                String,
  pub description:         String,
  pub category:            AchievementCategory,
  pub icon:                String,
  pub target:              u32,
  /// Marks achievements that have no real unlock criterion.
  pub is_fake_achievement: bool,
  /// Drives "only X% of users earn this" messaging. In `0..=100`.
  pub rarity_percent:      u8,
  pub weasel_message:      String,
}

/// A fabricated feed entry shown to matching audiences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeSocialActivityTemplate {
  pub activity_type:      ActivityType,
  pub fake_user_name:     String,
  pub details:            String,
  pub timestamp:          DateTime<Utc>,
  pub target_user_groups: Vec<String>,
}

// ─── Persisted rows ──────────────────────────────────────────────────────────

/// A template as read back from the store, with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
  pub id:         i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub template:   T,
}

pub type Program = Stored<ProgramTemplate>;
pub type Exercise = Stored<ExerciseTemplate>;
pub type Achievement = Stored<AchievementTemplate>;
pub type FakeSocialActivity = Stored<FakeSocialActivityTemplate>;

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn enum_text_forms_match_serde() {
    assert_eq!(ActivityType::PrAchieved.as_ref(), "pr_achieved");
    assert_eq!(
      serde_json::to_string(&ActivityType::PrAchieved).unwrap(),
      "\"pr_achieved\""
    );
    assert_eq!(Difficulty::from_str("advanced").unwrap(), Difficulty::Advanced);
    assert!(AchievementCategory::from_str("heroic").is_err());
  }

  #[test]
  fn kinds_are_in_seeding_order() {
    let tables: Vec<_> = TemplateKind::ALL.iter().map(|k| k.table()).collect();
    assert_eq!(tables, [
      "programs",
      "exercises",
      "achievements",
      "fake_social_activities"
    ]);
    assert_eq!(TemplateKind::FakeSocialActivity.to_string(), "fake_social_activity");
  }
}
