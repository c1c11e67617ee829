mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

use crate::models::*;
use crate::stats::RunningDay;
use crate::workouts::{split_workout_result, Catalog};

/// Columns selected for a [`DailyEntry`], joined with its track.
const ENTRY_COLUMNS: &str = "de.date, de.week, de.year, de.month, de.day,
    de.running_schedule, de.running_progress, de.running_performance,
    de.workout_schedule, de.workout_routine,
    de.weight, de.last_meal, de.stretching, de.stairs, de.diary,
    rt.id, rt.name, rt.length, rt.url, rt.progress_unit";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "fitlog")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("fitlog.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Exercise catalog
    // ============================================================

    /// Raw catalog rows, each `<exercise>/<execution>`.
    pub fn list_exercise_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT name FROM exercises ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Build the exercise catalog. Fails if any stored row is inconsistent.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let names = self.list_exercise_names()?;
        let catalog = Catalog::from_names(&names)?;
        tracing::debug!("Loaded exercise catalog with {} exercises", catalog.len());
        Ok(catalog)
    }

    // ============================================================
    // Track operations
    // ============================================================

    pub fn get_all_tracks(&self) -> Result<Vec<Track>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, length, url, progress_unit FROM running_tracks ORDER BY name",
        )?;

        let tracks = stmt
            .query_map([], row_to_track)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tracks)
    }

    pub fn get_track(&self, id: &str) -> Result<Option<Track>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, name, length, url, progress_unit FROM running_tracks WHERE id = ?",
        )?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row_to_track(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn create_track(&self, track: &Track) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO running_tracks (id, name, length, url, progress_unit)
             VALUES (?, ?, ?, ?, ?)",
            (
                &track.id,
                &track.name,
                track.length,
                &track.url,
                track.progress_unit.as_str(),
            ),
        )?;
        Ok(())
    }

    // ============================================================
    // Daily entry operations
    // ============================================================

    /// All entries, newest first, each with its workout results.
    pub fn get_all_entries(&self) -> Result<Vec<DailyEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS}
             FROM daily_entries de
             LEFT JOIN running_tracks rt ON de.track_id = rt.id
             ORDER BY de.date DESC"
        ))?;

        let mut entries = stmt
            .query_map([], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT daily_entry_date, exercise, execution, volume
             FROM workout_results ORDER BY daily_entry_date, id",
        )?;
        let results = stmt
            .query_map([], row_to_dated_result)?
            .collect::<Result<Vec<_>, _>>()?;

        attach_results(&mut entries, results);
        Ok(entries)
    }

    pub fn get_entry(&self, date: NaiveDate) -> Result<Option<DailyEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS}
             FROM daily_entries de
             LEFT JOIN running_tracks rt ON de.track_id = rt.id
             WHERE de.date = ?"
        ))?;

        let mut rows = stmt.query([date.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut entry = row_to_entry(row)?;
        drop(rows);
        drop(stmt);

        entry.workout.results = query_results_by_date(&conn, date)?;
        Ok(Some(entry))
    }

    /// Entries of one ISO week (`YYYY-WW`), oldest first.
    pub fn get_week_entries(&self, week: &str) -> Result<Vec<DailyEntry>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS}
             FROM daily_entries de
             LEFT JOIN running_tracks rt ON de.track_id = rt.id
             WHERE de.week = ?
             ORDER BY de.date"
        ))?;

        let mut entries = stmt
            .query_map([week], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT wr.daily_entry_date, wr.exercise, wr.execution, wr.volume
             FROM workout_results wr
             JOIN daily_entries de ON wr.daily_entry_date = de.date
             WHERE de.week = ?
             ORDER BY wr.daily_entry_date, wr.id",
        )?;
        let results = stmt
            .query_map([week], row_to_dated_result)?
            .collect::<Result<Vec<_>, _>>()?;

        attach_results(&mut entries, results);
        Ok(entries)
    }

    /// Write a daily entry and its workout results in one transaction.
    ///
    /// Results must already be validated against the catalog. Returns the
    /// number of workout results written.
    pub fn insert_daily_entry(&self, entry: &NewDailyEntry, results: &[String]) -> Result<usize> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO daily_entries
             (date, week, year, month, day, track_id, running_schedule, running_progress,
              running_performance, workout_schedule, workout_routine, weight, last_meal,
              stretching, stairs, diary)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                entry.date.to_string(),
                &entry.week,
                entry.year,
                &entry.month,
                &entry.day,
                &entry.track_id,
                entry.running_schedule.as_str(),
                &entry.running_progress,
                entry.running_performance,
                entry.workout_schedule.as_str(),
                &entry.workout_routine,
                entry.weight,
                &entry.last_meal,
                &entry.stretching,
                &entry.stairs,
                &entry.diary,
            ],
        )?;

        let count = insert_results(&tx, entry.date, results)?;
        tx.commit()?;

        Ok(count)
    }

    /// Append validated workout results to an existing entry, all or nothing.
    pub fn insert_workout_results(&self, date: NaiveDate, results: &[String]) -> Result<usize> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let count = insert_results(&tx, date, results)?;
        tx.commit()?;
        Ok(count)
    }

    /// Apply a partial update. Returns `false` if nothing was updated.
    pub fn update_entry(&self, date: NaiveDate, input: &DailyEntryUpdate) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let mut updates = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(weight) = input.weight {
            updates.push("weight = ?");
            params.push(Box::new(weight));
        }
        if let Some(last_meal) = &input.last_meal {
            updates.push("last_meal = ?");
            params.push(Box::new(last_meal.clone()));
        }
        if let Some(stretching) = &input.stretching {
            updates.push("stretching = ?");
            params.push(Box::new(stretching.clone()));
        }
        if let Some(stairs) = &input.stairs {
            updates.push("stairs = ?");
            params.push(Box::new(stairs.clone()));
        }
        if let Some(diary) = &input.diary {
            updates.push("diary = ?");
            params.push(Box::new(diary.clone()));
        }

        if updates.is_empty() {
            return Ok(false);
        }

        params.push(Box::new(date.to_string()));

        let sql = format!(
            "UPDATE daily_entries SET {} WHERE date = ?",
            updates.join(", ")
        );
        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_ref.as_slice())?;

        tracing::debug!("Updated daily entry for {}: {} row(s)", date, rows);
        Ok(rows > 0)
    }

    /// Dates and diary texts of every entry that has one, oldest first.
    pub fn get_diary_rows(&self) -> Result<Vec<(NaiveDate, String)>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT date, diary FROM daily_entries WHERE diary IS NOT NULL ORDER BY date ASC",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((parse_date(row, 0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// The running part of every entry, oldest first.
    pub fn get_running_days(&self) -> Result<Vec<RunningDay>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT rt.length, rt.progress_unit, de.running_progress
             FROM daily_entries de
             LEFT JOIN running_tracks rt ON de.track_id = rt.id
             ORDER BY de.date ASC",
        )?;

        let days = stmt
            .query_map([], |row| {
                let length: Option<f64> = row.get(0)?;
                let unit: Option<String> = row.get(1)?;
                let track = match (length, unit) {
                    (Some(length), Some(unit)) => Some((length, parse_progress_unit(&unit, 1)?)),
                    _ => None,
                };
                Ok(RunningDay {
                    track,
                    progress: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(days)
    }

    // ============================================================
    // Workout result operations
    // ============================================================

    pub fn get_workout_results_by_date(&self, date: NaiveDate) -> Result<Vec<WorkoutResult>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        query_results_by_date(&conn, date)
    }

    /// Every stored workout result ordered by date, then insertion order.
    pub fn get_all_workout_results(&self) -> Result<Vec<DatedWorkoutResult>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT daily_entry_date, exercise, execution, volume
             FROM workout_results ORDER BY daily_entry_date ASC, id ASC",
        )?;

        let results = stmt
            .query_map([], row_to_dated_result)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn insert_results(conn: &Connection, date: NaiveDate, results: &[String]) -> Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO workout_results (daily_entry_date, exercise, execution, volume)
         VALUES (?, ?, ?, ?)",
    )?;

    for result in results {
        let parsed = split_workout_result(result)
            .ok_or_else(|| anyhow::anyhow!("Invalid workout result format: {}", result))?;
        stmt.execute((
            date.to_string(),
            parsed.exercise,
            parsed.execution,
            parsed.volume,
        ))?;
    }

    Ok(results.len())
}

fn query_results_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<WorkoutResult>> {
    let mut stmt = conn.prepare(
        "SELECT exercise, execution, volume
         FROM workout_results WHERE daily_entry_date = ? ORDER BY id",
    )?;

    let results = stmt
        .query_map([date.to_string()], |row| {
            Ok(WorkoutResult {
                exercise: row.get(0)?,
                execution: row.get(1)?,
                volume: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Distribute date-ordered results onto their entries.
fn attach_results(entries: &mut [DailyEntry], results: Vec<DatedWorkoutResult>) {
    let mut by_date: std::collections::HashMap<NaiveDate, Vec<WorkoutResult>> =
        std::collections::HashMap::new();
    for dated in results {
        by_date.entry(dated.date).or_default().push(dated.result);
    }

    for entry in entries {
        if let Some(results) = by_date.remove(&entry.date) {
            entry.workout.results = results;
        }
    }
}

fn row_to_track(row: &Row<'_>) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        name: row.get(1)?,
        length: row.get(2)?,
        url: row.get(3)?,
        progress_unit: parse_progress_unit(&row.get::<_, String>(4)?, 4)?,
    })
}

fn row_to_dated_result(row: &Row<'_>) -> rusqlite::Result<DatedWorkoutResult> {
    Ok(DatedWorkoutResult {
        date: parse_date(row, 0)?,
        result: WorkoutResult {
            exercise: row.get(1)?,
            execution: row.get(2)?,
            volume: row.get(3)?,
        },
    })
}

/// Decode a row selected with [`ENTRY_COLUMNS`]. Workout results are attached
/// separately.
fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<DailyEntry> {
    let track = match row.get::<_, Option<String>>(15)? {
        Some(id) => Some(Track {
            id,
            name: row.get(16)?,
            length: row.get(17)?,
            url: row.get(18)?,
            progress_unit: parse_progress_unit(&row.get::<_, String>(19)?, 19)?,
        }),
        None => None,
    };

    Ok(DailyEntry {
        date: parse_date(row, 0)?,
        week: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        day: row.get(4)?,
        running: Running {
            schedule: parse_schedule(&row.get::<_, String>(5)?, 5)?,
            track,
            progress: row.get(6)?,
            performance: row.get(7)?,
        },
        workout: Workout {
            schedule: parse_schedule(&row.get::<_, String>(8)?, 8)?,
            routine: row.get(9)?,
            results: Vec::new(),
        },
        weight: row.get(10)?,
        last_meal: row.get(11)?,
        stretching: row.get(12)?,
        stairs: row.get(13)?,
        diary: row.get(14)?,
    })
}

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_schedule(text: &str, idx: usize) -> rusqlite::Result<Schedule> {
    Schedule::from_str(text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown schedule: {text}").into(),
        )
    })
}

fn parse_progress_unit(text: &str, idx: usize) -> rusqlite::Result<ProgressUnit> {
    ProgressUnit::from_str(text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown progress unit: {text}").into(),
        )
    })
}
