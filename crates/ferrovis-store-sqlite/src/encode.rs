//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Lists and program structure
//! are stored as compact JSON. Enumerations use their snake_case names.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use ferrovis_core::{
  store::Batch,
  template::{
    Achievement, AchievementTemplate, Exercise, ExerciseTemplate, FakeSocialActivity,
    FakeSocialActivityTemplate, Program, ProgramTemplate, Stored, TemplateKind,
  },
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(column: &'static str, s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode { column, message: e.to_string() })
}

pub fn encode_list(items: &[String]) -> Result<String> { Ok(serde_json::to_string(items)?) }

pub fn decode_list(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse()
    .map_err(|_| Error::Decode { column, message: format!("unknown value {s:?}") })
}

fn decode_u32(column: &'static str, n: i64) -> Result<u32> {
  u32::try_from(n).map_err(|_| Error::Decode { column, message: format!("{n} out of range") })
}

// ─── Batches ─────────────────────────────────────────────────────────────────

/// A batch flattened into owned SQL values, ready to move onto the
/// connection thread.
pub struct EncodedBatch {
  pub kind: TemplateKind,
  pub sql:  &'static str,
  pub rows: Vec<Vec<Value>>,
}

const INSERT_PROGRAM: &str = "INSERT INTO programs (
    created_at, updated_at, name, description, difficulty, duration_weeks, structure
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_EXERCISE: &str = "INSERT INTO exercises (
    created_at, updated_at, name, category, muscle_groups, instructions, progress_multiplier
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_ACHIEVEMENT: &str = "INSERT INTO achievements (
    created_at, updated_at, name, description, category, icon, target,
    is_fake_achievement, rarity_percent, weasel_message
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

const INSERT_FAKE_ACTIVITY: &str = "INSERT INTO fake_social_activities (
    created_at, updated_at, activity_type, fake_user_name, details, timestamp,
    target_user_groups
  ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Encode every row of `batch`, stamping `created_at`/`updated_at` with `now`.
pub fn encode_batch(batch: &Batch<'_>, now: DateTime<Utc>) -> Result<EncodedBatch> {
  let stamp = || [Value::Text(encode_dt(now)), Value::Text(encode_dt(now))];

  let (sql, rows) = match batch {
    Batch::Programs(rows) => (
      INSERT_PROGRAM,
      rows
        .iter()
        .map(|p| -> Result<Vec<Value>> {
          let mut row = Vec::from(stamp());
          row.extend([
            Value::Text(p.name.clone()),
            Value::Text(p.description.clone()),
            Value::Text(p.difficulty.to_string()),
            Value::Integer(i64::from(p.duration_weeks)),
            Value::Text(serde_json::to_string(&p.structure)?),
          ]);
          Ok(row)
        })
        .collect::<Result<Vec<_>>>()?,
    ),
    Batch::Exercises(rows) => (
      INSERT_EXERCISE,
      rows
        .iter()
        .map(|e| -> Result<Vec<Value>> {
          let mut row = Vec::from(stamp());
          row.extend([
            Value::Text(e.name.clone()),
            Value::Text(e.category.to_string()),
            Value::Text(encode_list(&e.muscle_groups)?),
            Value::Text(e.instructions.clone()),
            Value::Real(e.progress_multiplier),
          ]);
          Ok(row)
        })
        .collect::<Result<Vec<_>>>()?,
    ),
    Batch::Achievements(rows) => (
      INSERT_ACHIEVEMENT,
      rows
        .iter()
        .map(|a| {
          let mut row = Vec::from(stamp());
          row.extend([
            Value::Text(a.name.clone()),
            Value::Text(a.description.clone()),
            Value::Text(a.category.to_string()),
            Value::Text(a.icon.clone()),
            Value::Integer(i64::from(a.target)),
            Value::Integer(i64::from(a.is_fake_achievement)),
            Value::Integer(i64::from(a.rarity_percent)),
            Value::Text(a.weasel_message.clone()),
          ]);
          row
        })
        .collect(),
    ),
    Batch::FakeActivities(rows) => (
      INSERT_FAKE_ACTIVITY,
      rows
        .iter()
        .map(|f| -> Result<Vec<Value>> {
          let mut row = Vec::from(stamp());
          row.extend([
            Value::Text(f.activity_type.to_string()),
            Value::Text(f.fake_user_name.clone()),
            Value::Text(f.details.clone()),
            Value::Text(encode_dt(f.timestamp)),
            Value::Text(encode_list(&f.target_user_groups)?),
          ]);
          Ok(row)
        })
        .collect::<Result<Vec<_>>>()?,
    ),
  };

  Ok(EncodedBatch { kind: batch.kind(), sql, rows })
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// Columns shared by every template table, in select order.
pub struct RawMeta {
  pub id:         i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawMeta {
  fn into_stored<T>(self, template: T) -> Result<Stored<T>> {
    Ok(Stored {
      id: self.id,
      created_at: decode_dt("created_at", &self.created_at)?,
      updated_at: decode_dt("updated_at", &self.updated_at)?,
      template,
    })
  }
}

pub struct RawProgram {
  pub meta:           RawMeta,
  pub name:           String,
  pub description:    String,
  pub difficulty:     String,
  pub duration_weeks: i64,
  pub structure:      String,
}

impl RawProgram {
  pub const COLUMNS: &'static str =
    "id, created_at, updated_at, name, description, difficulty, duration_weeks, structure";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      meta:           RawMeta {
        id:         row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
      },
      name:           row.get(3)?,
      description:    row.get(4)?,
      difficulty:     row.get(5)?,
      duration_weeks: row.get(6)?,
      structure:      row.get(7)?,
    })
  }

  pub fn into_program(self) -> Result<Program> {
    let template = ProgramTemplate {
      name:           self.name,
      description:    self.description,
      difficulty:     decode_enum("difficulty", &self.difficulty)?,
      duration_weeks: decode_u32("duration_weeks", self.duration_weeks)?,
      structure:      serde_json::from_str(&self.structure)?,
    };
    self.meta.into_stored(template)
  }
}

pub struct RawExercise {
  pub meta:                RawMeta,
  pub name:                String,
  pub category:            String,
  pub muscle_groups:       String,
  pub instructions:        String,
  pub progress_multiplier: f64,
}

impl RawExercise {
  pub const COLUMNS: &'static str = "id, created_at, updated_at, name, category, muscle_groups, \
                                     instructions, progress_multiplier";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      meta:                RawMeta {
        id:         row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
      },
      name:                row.get(3)?,
      category:            row.get(4)?,
      muscle_groups:       row.get(5)?,
      instructions:        row.get(6)?,
      progress_multiplier: row.get(7)?,
    })
  }

  pub fn into_exercise(self) -> Result<Exercise> {
    let template = ExerciseTemplate {
      name:                self.name,
      category:            decode_enum("category", &self.category)?,
      muscle_groups:       decode_list(&self.muscle_groups)?,
      instructions:        self.instructions,
      progress_multiplier: self.progress_multiplier,
    };
    self.meta.into_stored(template)
  }
}

pub struct RawAchievement {
  pub meta:                RawMeta,
  pub name:                String,
  pub description:         String,
  pub category:            String,
  pub icon:                String,
  pub target:              i64,
  pub is_fake_achievement: bool,
  pub rarity_percent:      i64,
  pub weasel_message:      String,
}

impl RawAchievement {
  pub const COLUMNS: &'static str = "id, created_at, updated_at, name, description, category, \
                                     icon, target, is_fake_achievement, rarity_percent, \
                                     weasel_message";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      meta:                RawMeta {
        id:         row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
      },
      name:                row.get(3)?,
      description:         row.get(4)?,
      category:            row.get(5)?,
      icon:                row.get(6)?,
      target:              row.get(7)?,
      is_fake_achievement: row.get(8)?,
      rarity_percent:      row.get(9)?,
      weasel_message:      row.get(10)?,
    })
  }

  pub fn into_achievement(self) -> Result<Achievement> {
    let rarity_percent = u8::try_from(self.rarity_percent).map_err(|_| Error::Decode {
      column:  "rarity_percent",
      message: format!("{} out of range", self.rarity_percent),
    })?;
    let template = AchievementTemplate {
      name: self.name,
      description: self.description,
      category: decode_enum("category", &self.category)?,
      icon: self.icon,
      target: decode_u32("target", self.target)?,
      is_fake_achievement: self.is_fake_achievement,
      rarity_percent,
      weasel_message: self.weasel_message,
    };
    self.meta.into_stored(template)
  }
}

pub struct RawFakeActivity {
  pub meta:               RawMeta,
  pub activity_type:      String,
  pub fake_user_name:     String,
  pub details:            String,
  pub timestamp:          String,
  pub target_user_groups: String,
}

impl RawFakeActivity {
  pub const COLUMNS: &'static str = "id, created_at, updated_at, activity_type, fake_user_name, \
                                     details, timestamp, target_user_groups";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      meta:               RawMeta {
        id:         row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
      },
      activity_type:      row.get(3)?,
      fake_user_name:     row.get(4)?,
      details:            row.get(5)?,
      timestamp:          row.get(6)?,
      target_user_groups: row.get(7)?,
    })
  }

  pub fn into_activity(self) -> Result<FakeSocialActivity> {
    let template = FakeSocialActivityTemplate {
      activity_type:      decode_enum("activity_type", &self.activity_type)?,
      fake_user_name:     self.fake_user_name,
      details:            self.details,
      timestamp:          decode_dt("timestamp", &self.timestamp)?,
      target_user_groups: decode_list(&self.target_user_groups)?,
    };
    self.meta.into_stored(template)
  }
}
