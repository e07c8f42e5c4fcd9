//! SQL schema for the Ferrovis SQLite store.
//!
//! Every statement is idempotent (`IF NOT EXISTS`), so the whole script runs
//! on each open. `user_version` is stamped but not yet read back.
//!
//! The template tables carry the constraints the bootstrapper relies on:
//! a UNIQUE natural key per table and CHECKs for the catalog value ranges.

/// Every table the schema creates, template tables first.
pub const TABLES: [&str; 10] = [
  "programs",
  "exercises",
  "achievements",
  "fake_social_activities",
  "users",
  "workouts",
  "user_achievements",
  "buddy_relationships",
  "weasel_messages",
  "streaks",
];

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Templates ───────────────────────────────────────────────────────────────
-- Written once by the bootstrapper, never updated.

CREATE TABLE IF NOT EXISTS programs (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    deleted_at     TEXT,
    name           TEXT NOT NULL UNIQUE,
    description    TEXT NOT NULL DEFAULT '',
    difficulty     TEXT NOT NULL
                   CHECK (difficulty IN ('beginner', 'intermediate', 'advanced')),
    duration_weeks INTEGER NOT NULL CHECK (duration_weeks > 0),
    structure      TEXT NOT NULL DEFAULT '{}' CHECK (json_valid(structure))
);

CREATE TABLE IF NOT EXISTS exercises (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    deleted_at          TEXT,
    name                TEXT NOT NULL UNIQUE,
    category            TEXT NOT NULL
                        CHECK (category IN ('compound', 'isolation', 'cardio')),
    muscle_groups       TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    instructions        TEXT NOT NULL DEFAULT '',
    progress_multiplier REAL NOT NULL DEFAULT 1.0 CHECK (progress_multiplier >= 1.0)
);

CREATE TABLE IF NOT EXISTS achievements (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    deleted_at          TEXT,
    name                TEXT NOT NULL UNIQUE,
    description         TEXT NOT NULL DEFAULT '',
    category            TEXT NOT NULL
                        CHECK (category IN ('consistency', 'strength', 'social', 'funny')),
    icon                TEXT NOT NULL DEFAULT '',
    target              INTEGER NOT NULL CHECK (target > 0),
    is_fake_achievement INTEGER NOT NULL DEFAULT 0,
    rarity_percent      INTEGER NOT NULL DEFAULT 50
                        CHECK (rarity_percent BETWEEN 0 AND 100),
    weasel_message      TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS fake_social_activities (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL,
    deleted_at         TEXT,
    activity_type      TEXT NOT NULL
                       CHECK (activity_type IN ('workout_completed', 'streak_extended', 'pr_achieved')),
    fake_user_name     TEXT NOT NULL,
    details            TEXT NOT NULL DEFAULT '',
    timestamp          TEXT NOT NULL,
    target_user_groups TEXT NOT NULL DEFAULT '[]',   -- JSON array of audience tags
    UNIQUE (fake_user_name, activity_type)
);

-- ── User data ───────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS users (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at             TEXT NOT NULL,
    updated_at             TEXT NOT NULL,
    deleted_at             TEXT,
    email                  TEXT NOT NULL UNIQUE,
    name                   TEXT NOT NULL,
    password_hash          TEXT NOT NULL,
    weasel_mode_enabled    INTEGER NOT NULL DEFAULT 1,
    weasel_intensity       TEXT NOT NULL DEFAULT 'medium'
                           CHECK (weasel_intensity IN ('gentle', 'medium', 'aggressive', 'full_chaos')),
    allow_guilt_trips      INTEGER NOT NULL DEFAULT 1,
    allow_fake_stats       INTEGER NOT NULL DEFAULT 1,
    allow_social_pressure  INTEGER NOT NULL DEFAULT 1,
    preferred_workout_time TEXT,   -- 'morning' | 'afternoon' | 'evening'
    fitness_goal           TEXT    -- 'strength' | 'endurance' | 'weight_loss' | 'general'
);

CREATE TABLE IF NOT EXISTS workouts (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL,
    deleted_at          TEXT,
    user_id             INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
    program_id          INTEGER REFERENCES programs(id) ON UPDATE CASCADE ON DELETE SET NULL,
    completed_at        TEXT NOT NULL,
    duration_minutes    INTEGER NOT NULL DEFAULT 0,
    exercises           TEXT NOT NULL DEFAULT '[]' CHECK (json_valid(exercises)),
    fake_progress_boost INTEGER NOT NULL DEFAULT 0,
    is_personal_record  INTEGER NOT NULL DEFAULT 0,
    notes               TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS user_achievements (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    deleted_at     TEXT,
    user_id        INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
    achievement_id INTEGER NOT NULL REFERENCES achievements(id) ON UPDATE CASCADE ON DELETE CASCADE,
    unlocked_at    TEXT,
    progress       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS buddy_relationships (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    deleted_at        TEXT,
    user_id           INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
    buddy_id          INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
    relationship_type TEXT NOT NULL CHECK (relationship_type IN ('peer', 'coach')),
    status            TEXT NOT NULL DEFAULT 'pending'
                      CHECK (status IN ('pending', 'active', 'paused')),
    invited_at        TEXT NOT NULL,
    accepted_at       TEXT
);

CREATE TABLE IF NOT EXISTS weasel_messages (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL,
    deleted_at        TEXT,
    user_id           INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
    message_type      TEXT NOT NULL
                      CHECK (message_type IN ('guilt', 'fomo', 'urgency', 'social', 'funny')),
    content           TEXT NOT NULL,
    intensity         TEXT NOT NULL CHECK (intensity IN ('gentle', 'medium', 'aggressive')),
    sent_at           TEXT NOT NULL,
    read_at           TEXT,
    user_reaction     TEXT,   -- 'ignored' | 'annoyed' | 'motivated' | 'worked_out'
    triggered_workout INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS streaks (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    deleted_at   TEXT,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON UPDATE CASCADE ON DELETE CASCADE,
    streak_type  TEXT NOT NULL CHECK (streak_type IN ('workout', 'weekly', 'monthly')),
    current      INTEGER NOT NULL DEFAULT 0,
    longest      INTEGER NOT NULL DEFAULT 0,
    last_workout TEXT,
    streak_start TEXT,
    is_active    INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS workouts_user_idx          ON workouts(user_id);
CREATE INDEX IF NOT EXISTS workouts_program_idx       ON workouts(program_id);
CREATE INDEX IF NOT EXISTS user_achievements_user_idx ON user_achievements(user_id);
CREATE INDEX IF NOT EXISTS buddy_relationships_idx    ON buddy_relationships(user_id, buddy_id);
CREATE INDEX IF NOT EXISTS weasel_messages_user_idx   ON weasel_messages(user_id);
CREATE INDEX IF NOT EXISTS streaks_user_idx           ON streaks(user_id);
CREATE INDEX IF NOT EXISTS fake_activity_time_idx     ON fake_social_activities(timestamp);

PRAGMA user_version = 1;
";
