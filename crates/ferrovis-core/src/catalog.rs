//! The reference-data catalog seeded into every fresh store.
//!
//! The built-in catalog lives in `catalog.json` next to this file and is
//! embedded at compile time. The bootstrapper takes any [`Catalog`], so tests
//! can drive it with synthetic data.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::CatalogError,
  template::{
    AchievementTemplate, ActivityType, ExerciseTemplate, FakeSocialActivityTemplate,
    ProgramTemplate, TemplateKind,
  },
};

const BUILTIN: &str = include_str!("catalog.json");

/// A fake activity as declared in the catalog. Its timestamp is relative to
/// the moment the bootstrapper runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeActivitySeed {
  pub activity_type:      ActivityType,
  pub fake_user_name:     String,
  pub details:            String,
  pub hours_ago:          u32,
  pub target_user_groups: Vec<String>,
}

impl FakeActivitySeed {
  /// Materialise the template with a timestamp `hours_ago` before `now`.
  pub fn at(&self, now: DateTime<Utc>) -> FakeSocialActivityTemplate {
    FakeSocialActivityTemplate {
      activity_type:      self.activity_type,
      fake_user_name:     self.fake_user_name.clone(),
      details:            self.details.clone(),
      timestamp:          now - Duration::hours(i64::from(self.hours_ago)),
      target_user_groups: self.target_user_groups.clone(),
    }
  }

  /// Natural key: one entry per fake user and activity type.
  pub fn key(&self) -> String { format!("{}/{}", self.fake_user_name, self.activity_type) }
}

/// A fixed, versionless set of template rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
  #[serde(default)]
  pub programs:        Vec<ProgramTemplate>,
  #[serde(default)]
  pub exercises:       Vec<ExerciseTemplate>,
  #[serde(default)]
  pub achievements:    Vec<AchievementTemplate>,
  #[serde(default)]
  pub fake_activities: Vec<FakeActivitySeed>,
}

impl Catalog {
  /// The catalog shipped with the service.
  pub fn builtin() -> Result<Self, CatalogError> { Self::from_json(BUILTIN) }

  pub fn from_json(json: &str) -> Result<Self, CatalogError> {
    Ok(serde_json::from_str(json)?)
  }

  /// Number of entries declared for `kind`.
  pub fn len(&self, kind: TemplateKind) -> usize {
    match kind {
      TemplateKind::Program => self.programs.len(),
      TemplateKind::Exercise => self.exercises.len(),
      TemplateKind::Achievement => self.achievements.len(),
      TemplateKind::FakeSocialActivity => self.fake_activities.len(),
    }
  }

  /// All fake activities with timestamps anchored at `now`.
  pub fn fake_activities_at(&self, now: DateTime<Utc>) -> Vec<FakeSocialActivityTemplate> {
    self.fake_activities.iter().map(|seed| seed.at(now)).collect()
  }

  /// Check natural-key uniqueness and the value ranges the store enforces.
  ///
  /// Returns the first defect found, walking kinds in seeding order.
  pub fn validate(&self) -> Result<(), CatalogError> {
    unique(TemplateKind::Program, self.programs.iter().map(|p| p.name.clone()))?;
    for p in &self.programs {
      check(TemplateKind::Program, &p.name, !p.name.trim().is_empty(), "name is empty")?;
      check(
        TemplateKind::Program,
        &p.name,
        p.duration_weeks > 0,
        "duration_weeks must be positive",
      )?;
    }

    unique(TemplateKind::Exercise, self.exercises.iter().map(|e| e.name.clone()))?;
    for e in &self.exercises {
      check(TemplateKind::Exercise, &e.name, !e.name.trim().is_empty(), "name is empty")?;
      check(
        TemplateKind::Exercise,
        &e.name,
        e.progress_multiplier >= 1.0,
        &format!("progress_multiplier {} is below 1.0", e.progress_multiplier),
      )?;
    }

    unique(TemplateKind::Achievement, self.achievements.iter().map(|a| a.name.clone()))?;
    for a in &self.achievements {
      check(TemplateKind::Achievement, &a.name, !a.name.trim().is_empty(), "name is empty")?;
      check(TemplateKind::Achievement, &a.name, a.target > 0, "target must be positive")?;
      check(
        TemplateKind::Achievement,
        &a.name,
        a.rarity_percent <= 100,
        &format!("rarity_percent {} exceeds 100", a.rarity_percent),
      )?;
    }

    unique(TemplateKind::FakeSocialActivity, self.fake_activities.iter().map(FakeActivitySeed::key))?;
    for f in &self.fake_activities {
      check(
        TemplateKind::FakeSocialActivity,
        &f.key(),
        !f.fake_user_name.trim().is_empty(),
        "fake_user_name is empty",
      )?;
    }

    Ok(())
  }
}

fn unique(kind: TemplateKind, keys: impl Iterator<Item = String>) -> Result<(), CatalogError> {
  let mut seen = HashSet::new();
  for key in keys {
    if !seen.insert(key.clone()) {
      return Err(CatalogError::DuplicateKey { kind, key });
    }
  }
  Ok(())
}

fn check(kind: TemplateKind, key: &str, ok: bool, reason: &str) -> Result<(), CatalogError> {
  if ok {
    Ok(())
  } else {
    Err(CatalogError::OutOfRange {
      kind,
      key: key.to_owned(),
      reason: reason.to_owned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;
  use crate::template::{AchievementCategory, Difficulty};

  #[test]
  fn builtin_catalog_parses_and_validates() {
    let catalog = Catalog::builtin().unwrap();
    catalog.validate().unwrap();

    assert_eq!(catalog.len(TemplateKind::Program), 2);
    assert_eq!(catalog.len(TemplateKind::Exercise), 5);
    assert_eq!(catalog.len(TemplateKind::Achievement), 7);
    assert_eq!(catalog.len(TemplateKind::FakeSocialActivity), 3);
  }

  #[test]
  fn builtin_programs_and_fake_achievement() {
    let catalog = Catalog::builtin().unwrap();

    let ss = catalog
      .programs
      .iter()
      .find(|p| p.name == "Starting Strength")
      .unwrap();
    assert_eq!(ss.duration_weeks, 12);
    assert_eq!(ss.difficulty, Difficulty::Beginner);
    assert_eq!(ss.structure["progression"], "linear");

    let fakes: Vec<_> = catalog
      .achievements
      .iter()
      .filter(|a| a.is_fake_achievement)
      .collect();
    assert_eq!(fakes.len(), 1);
    assert_eq!(fakes[0].name, "Gym Whisperer");
    assert_eq!(fakes[0].rarity_percent, 5);
    assert_eq!(fakes[0].category, AchievementCategory::Consistency);
  }

  #[test]
  fn builtin_ranges_hold() {
    let catalog = Catalog::builtin().unwrap();
    for e in &catalog.exercises {
      assert!(e.progress_multiplier >= 1.0 && e.progress_multiplier <= 2.0, "{}", e.name);
    }
    for a in &catalog.achievements {
      assert!(a.target > 0, "{}", a.name);
      assert!(a.rarity_percent <= 100, "{}", a.name);
    }
    let deadlift = catalog.exercises.iter().find(|e| e.name == "Deadlift").unwrap();
    assert_eq!(deadlift.progress_multiplier, 1.3);
  }

  #[test]
  fn fake_activities_are_anchored_in_the_recent_past() {
    let catalog = Catalog::builtin().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();

    let hours: Vec<_> = catalog
      .fake_activities_at(now)
      .iter()
      .map(|f| (now - f.timestamp).num_hours())
      .collect();
    assert_eq!(hours, [2, 4, 6]);
  }

  #[test]
  fn duplicate_exercise_name_is_rejected() {
    let mut catalog = Catalog::builtin().unwrap();
    let copy = catalog.exercises[0].clone();
    catalog.exercises.push(copy);

    let err = catalog.validate().unwrap_err();
    assert!(matches!(
      err,
      CatalogError::DuplicateKey { kind: TemplateKind::Exercise, ref key } if key == "Squat"
    ));
  }

  #[test]
  fn out_of_range_values_are_rejected() {
    let mut catalog = Catalog::builtin().unwrap();
    catalog.achievements[2].rarity_percent = 101;
    let err = catalog.validate().unwrap_err();
    assert_eq!(err.kind(), Some(TemplateKind::Achievement));

    let mut catalog = Catalog::builtin().unwrap();
    catalog.exercises[1].progress_multiplier = 0.9;
    assert!(matches!(catalog.validate(), Err(CatalogError::OutOfRange { .. })));

    let mut catalog = Catalog::builtin().unwrap();
    catalog.programs[0].duration_weeks = 0;
    assert!(matches!(catalog.validate(), Err(CatalogError::OutOfRange { .. })));
  }

  #[test]
  fn empty_catalog_is_valid() {
    let catalog = Catalog::from_json("{}").unwrap();
    assert!(TemplateKind::ALL.iter().all(|k| catalog.len(*k) == 0));
    catalog.validate().unwrap();
  }
}
