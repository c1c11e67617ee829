//! Recording and reading daily entries.
//!
//! [`record_entry`] is the single write path for new entries: it applies
//! defaults, derives the calendar fields from the date, checks the running
//! track and workout results, and writes the entry together with its results.

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::db::Database;
use crate::models::*;
use crate::workouts::Catalog;

/// The routine recorded when none is given. Results are never stored for it.
pub const REST_ROUTINE: &str = "rest";

#[derive(Debug, Error)]
pub enum EntryError {
    /// The input was refused; each message describes one problem.
    #[error("{}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl EntryError {
    fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(vec![message.into()])
    }
}

/// Local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve a path date: `today` or `YYYY-MM-DD`.
pub fn resolve_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if text == "today" {
        return Some(today);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// ISO week of `date` as `YYYY-WW`, using the ISO week-numbering year.
pub fn iso_week(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-{:02}", week.year(), week.week())
}

/// Lowercase three-letter month, `jan`..`dec`.
pub fn month_abbrev(date: NaiveDate) -> String {
    date.format("%b").to_string().to_lowercase()
}

/// Lowercase three-letter weekday, `mon`..`sun`.
pub fn day_abbrev(date: NaiveDate) -> String {
    date.format("%a").to_string().to_lowercase()
}

/// Record a new daily entry.
///
/// Nothing is written unless the running track exists and every workout
/// result validates. On success returns a short report of what was stored.
pub fn record_entry(
    db: &Database,
    catalog: &Catalog,
    input: DailyEntryInput,
    today: NaiveDate,
) -> Result<Vec<String>, EntryError> {
    let date = input.date.unwrap_or(today);

    let running = input.running.unwrap_or(RunningInput {
        schedule: Schedule::Void,
        track_id: None,
        progress: None,
        performance: None,
    });

    if let Some(track_id) = &running.track_id {
        if db.get_track(track_id)?.is_none() {
            return Err(EntryError::rejected(format!(
                "Running track with ID {track_id} does not exist"
            )));
        }
    }

    if let Some(performance) = running.performance {
        if !(0..=4).contains(&performance) {
            return Err(EntryError::rejected(format!(
                "Running performance must be between 0 and 4, got {performance}"
            )));
        }
    }

    let (workout_schedule, routine, results) = match input.workout {
        Some(workout) => (workout.schedule, workout.routine, workout.results),
        None => (Schedule::Adhoc, None, Vec::new()),
    };

    if let Err(errors) = catalog.validate_workout(&results) {
        return Err(EntryError::Rejected(
            errors.iter().map(ToString::to_string).collect(),
        ));
    }

    // Only an explicit rest routine discards results; an omitted one is
    // stored as rest but keeps them.
    let to_store: &[String] = if routine.as_deref() == Some(REST_ROUTINE) {
        &[]
    } else {
        &results
    };
    let routine = routine.unwrap_or_else(|| REST_ROUTINE.to_string());

    let entry = NewDailyEntry {
        date,
        week: iso_week(date),
        year: date.year(),
        month: month_abbrev(date),
        day: day_abbrev(date),
        track_id: running.track_id,
        running_schedule: running.schedule,
        running_progress: running.progress,
        running_performance: running.performance,
        workout_schedule,
        workout_routine: routine,
        weight: input.weight,
        last_meal: input.last_meal,
        stretching: input.stretching,
        stairs: input.stairs,
        diary: input.diary,
    };

    let count = db.insert_daily_entry(&entry, to_store).map_err(|e| {
        tracing::warn!("Failed to create daily entry for {}: {:#}", date, e);
        EntryError::rejected(format!("Failed to create daily entry: {e}"))
    })?;

    tracing::info!("Recorded daily entry for {} ({} workout results)", date, count);

    let report = if count > 0 {
        format!("Recorded {count} workout results")
    } else {
        "No workout results to record".to_string()
    };
    Ok(vec![report])
}

/// Replace the diary text of one entry. Returns `false` if there is no entry.
pub fn update_diary(db: &Database, date: NaiveDate, diary: String) -> Result<bool> {
    let update = DailyEntryUpdate {
        diary: Some(Some(diary)),
        ..Default::default()
    };
    db.update_entry(date, &update)
}

/// Every diary as plain text, oldest first.
pub fn build_diary(db: &Database) -> Result<String> {
    Ok(format_diary(&db.get_diary_rows()?))
}

fn format_diary(rows: &[(NaiveDate, String)]) -> String {
    rows.iter()
        .map(|(date, diary)| format!("{}\n{}", date.format("%a, %d %b %Y 00:00:00 GMT"), diary))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One compact YAML entry, or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlDocument {
    Many(Vec<DailyYamlInput>),
    One(DailyYamlInput),
}

/// Read a YAML document holding a single compact entry or a list of entries.
pub fn parse_yaml_entries(text: &str) -> Result<Vec<DailyYamlInput>, serde_yaml::Error> {
    Ok(match serde_yaml::from_str(text)? {
        YamlDocument::Many(entries) => entries,
        YamlDocument::One(entry) => vec![entry],
    })
}

/// Expand the compact YAML form into a regular entry input.
///
/// `run` must have exactly four space-separated parts and `workout` exactly
/// two; otherwise that part is left out. Parts that are present but not
/// understood are reported.
pub fn parse_daily_entry_yaml(data: DailyYamlInput) -> Result<DailyEntryInput, Vec<String>> {
    let mut errors = Vec::new();

    let running = data.run.as_deref().and_then(|run| {
        let parts: Vec<&str> = run.split(' ').collect();
        let &[schedule, track_id, progress, performance] = parts.as_slice() else {
            tracing::debug!("Ignoring run line without four parts: {:?}", run);
            return None;
        };

        let schedule = parse_schedule("run", schedule, &mut errors)?;
        let Ok(performance) = performance.parse::<i64>() else {
            errors.push(format!("run.performance - expected a number, got {performance}"));
            return None;
        };

        Some(RunningInput {
            schedule,
            track_id: Some(track_id.to_string()),
            progress: Some(progress.to_string()),
            performance: Some(performance),
        })
    });

    let workout = data.workout.as_deref().and_then(|workout| {
        let parts: Vec<&str> = workout.split(' ').collect();
        let &[schedule, routine] = parts.as_slice() else {
            tracing::debug!("Ignoring workout line without two parts: {:?}", workout);
            return None;
        };

        Some(WorkoutInput {
            schedule: parse_schedule("workout", schedule, &mut errors)?,
            routine: Some(routine.to_string()),
            results: data.results.clone().unwrap_or_default(),
        })
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(DailyEntryInput {
        date: data.date,
        running,
        workout,
        weight: data.weight,
        last_meal: data.last_meal,
        stretching: data.stretching,
        stairs: data.stairs,
        diary: data.diary,
    })
}

/// Outcome of importing a YAML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Record every entry of a compact YAML document.
///
/// Entries that fail to parse or record are logged and skipped; only an
/// unreadable document fails the import.
pub fn import_yaml(
    db: &Database,
    catalog: &Catalog,
    text: &str,
    today: NaiveDate,
) -> Result<ImportSummary, serde_yaml::Error> {
    let mut summary = ImportSummary::default();

    for (index, data) in parse_yaml_entries(text)?.into_iter().enumerate() {
        let label = data
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| format!("#{}", index + 1));

        let outcome = parse_daily_entry_yaml(data)
            .map_err(EntryError::Rejected)
            .and_then(|input| record_entry(db, catalog, input, today));

        match outcome {
            Ok(report) => {
                tracing::info!("Imported entry {}: {}", label, report.join(", "));
                summary.imported += 1;
            }
            Err(e) => {
                tracing::warn!("Skipped entry {}: {}", label, e);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

fn parse_schedule(field: &str, text: &str, errors: &mut Vec<String>) -> Option<Schedule> {
    let schedule = Schedule::from_str(text);
    if schedule.is_none() {
        errors.push(format!("{field}.schedule - unknown schedule {text}"));
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup() -> (Database, Catalog) {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db.create_track(&Track {
            id: "park".to_string(),
            name: "Park loop".to_string(),
            length: 5.0,
            url: "https://example.com/park".to_string(),
            progress_unit: ProgressUnit::Km,
        })
        .unwrap();
        let catalog = db.load_catalog().unwrap();
        (db, catalog)
    }

    fn strength(results: &[&str]) -> DailyEntryInput {
        DailyEntryInput {
            date: Some(date("2026-01-15")),
            workout: Some(WorkoutInput {
                schedule: Schedule::Regular,
                routine: Some("strength-a".to_string()),
                results: results.iter().map(|r| r.to_string()).collect(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn calendar_fields_follow_iso_weeks() {
        assert_eq!(iso_week(date("2026-01-15")), "2026-03");
        // 2027-01-01 is a Friday, still in ISO week 53 of 2026
        assert_eq!(iso_week(date("2027-01-01")), "2026-53");
        assert_eq!(month_abbrev(date("2026-01-15")), "jan");
        assert_eq!(day_abbrev(date("2026-01-15")), "thu");
    }

    #[test]
    fn resolve_date_accepts_today() {
        let today = date("2026-10-15");
        assert_eq!(resolve_date("today", today), Some(today));
        assert_eq!(resolve_date("2026-01-02", today), Some(date("2026-01-02")));
        assert_eq!(resolve_date("yesterday", today), None);
    }

    #[test]
    fn records_entry_with_results() {
        let (db, catalog) = setup();
        let input = strength(&["squats/set3x 22+22+22", "frontPlank/maxhold 60s"]);

        let report = record_entry(&db, &catalog, input, date("2026-10-15")).unwrap();
        assert_eq!(report, vec!["Recorded 2 workout results"]);

        let entry = db.get_entry(date("2026-01-15")).unwrap().unwrap();
        assert_eq!(entry.week, "2026-03");
        assert_eq!(entry.running.schedule, Schedule::Void);
        assert_eq!(entry.workout.routine.as_deref(), Some("strength-a"));
        assert_eq!(entry.workout.results.len(), 2);
        assert_eq!(entry.workout.results[0].exercise, "squats");
        assert_eq!(entry.workout.results[0].execution, "set3x");
    }

    #[test]
    fn empty_input_defaults_to_rest_today() {
        let (db, catalog) = setup();
        let today = date("2026-10-15");

        let report = record_entry(&db, &catalog, DailyEntryInput::default(), today).unwrap();
        assert_eq!(report, vec!["No workout results to record"]);

        let entry = db.get_entry(today).unwrap().unwrap();
        assert_eq!(entry.workout.schedule, Schedule::Adhoc);
        assert_eq!(entry.workout.routine.as_deref(), Some("rest"));
        assert!(entry.running.track.is_none());
    }

    #[test]
    fn rest_routine_does_not_store_results() {
        let (db, catalog) = setup();
        let mut input = strength(&["squats/set3x 22+22+22"]);
        if let Some(workout) = input.workout.as_mut() {
            workout.routine = Some("rest".to_string());
        }

        let report = record_entry(&db, &catalog, input, date("2026-10-15")).unwrap();
        assert_eq!(report, vec!["No workout results to record"]);
        assert!(db
            .get_workout_results_by_date(date("2026-01-15"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn omitted_routine_still_stores_results() {
        let (db, catalog) = setup();
        let mut input = strength(&["pushUps/maxset 25"]);
        if let Some(workout) = input.workout.as_mut() {
            workout.routine = None;
        }

        let report = record_entry(&db, &catalog, input, date("2026-10-15")).unwrap();
        assert_eq!(report, vec!["Recorded 1 workout results"]);

        let entry = db.get_entry(date("2026-01-15")).unwrap().unwrap();
        assert_eq!(entry.workout.routine.as_deref(), Some("rest"));
        assert_eq!(entry.workout.results.len(), 1);
        assert_eq!(entry.workout.results[0].volume, "25");
    }

    #[test]
    fn invalid_results_reject_the_whole_entry() {
        let (db, catalog) = setup();
        let input = strength(&["squats/set3x 22+22", "badformat"]);

        let Err(EntryError::Rejected(errors)) =
            record_entry(&db, &catalog, input, date("2026-10-15"))
        else {
            panic!("expected rejection");
        };
        assert_eq!(
            errors,
            vec![
                "Invalid volume format for squats/set3x: 22+22",
                "Invalid workout result format: badformat",
            ]
        );
        assert!(db.get_entry(date("2026-01-15")).unwrap().is_none());
    }

    #[test]
    fn unknown_track_is_rejected() {
        let (db, catalog) = setup();
        let input = DailyEntryInput {
            running: Some(RunningInput {
                schedule: Schedule::Regular,
                track_id: Some("nowhere".to_string()),
                progress: Some("full".to_string()),
                performance: Some(3),
            }),
            ..Default::default()
        };

        let err = record_entry(&db, &catalog, input, date("2026-10-15")).unwrap_err();
        assert_eq!(err.to_string(), "Running track with ID nowhere does not exist");
    }

    #[test]
    fn performance_out_of_range_is_rejected() {
        let (db, catalog) = setup();
        let input = DailyEntryInput {
            running: Some(RunningInput {
                schedule: Schedule::Regular,
                track_id: Some("park".to_string()),
                progress: Some("full".to_string()),
                performance: Some(5),
            }),
            ..Default::default()
        };

        assert!(matches!(
            record_entry(&db, &catalog, input, date("2026-10-15")),
            Err(EntryError::Rejected(_))
        ));
    }

    #[test]
    fn duplicate_date_fails_to_create() {
        let (db, catalog) = setup();
        let today = date("2026-10-15");
        record_entry(&db, &catalog, DailyEntryInput::default(), today).unwrap();

        let Err(EntryError::Rejected(errors)) =
            record_entry(&db, &catalog, DailyEntryInput::default(), today)
        else {
            panic!("expected rejection");
        };
        assert!(errors[0].starts_with("Failed to create daily entry: "));
    }

    #[test]
    fn diary_is_built_oldest_first() {
        let (db, catalog) = setup();
        for (day, diary) in [("2026-01-16", "second"), ("2026-01-15", "first")] {
            let input = DailyEntryInput {
                date: Some(date(day)),
                diary: Some(diary.to_string()),
                ..Default::default()
            };
            record_entry(&db, &catalog, input, date("2026-10-15")).unwrap();
        }

        assert_eq!(
            build_diary(&db).unwrap(),
            "Thu, 15 Jan 2026 00:00:00 GMT\nfirst\n\nFri, 16 Jan 2026 00:00:00 GMT\nsecond"
        );
    }

    #[test]
    fn yaml_compact_form_expands() {
        let yaml = "date: 2026-01-15\n\
                    run: regular park full 3\n\
                    workout: regular strength-a\n\
                    results:\n  - squats/set3x 22+22+22\n\
                    weight: 75.5\n";
        let parsed = parse_yaml_entries(yaml).unwrap();
        assert_eq!(parsed.len(), 1);

        let input = parse_daily_entry_yaml(parsed[0].clone()).unwrap();
        let running = input.running.unwrap();
        assert_eq!(running.schedule, Schedule::Regular);
        assert_eq!(running.track_id.as_deref(), Some("park"));
        assert_eq!(running.performance, Some(3));

        let workout = input.workout.unwrap();
        assert_eq!(workout.routine.as_deref(), Some("strength-a"));
        assert_eq!(workout.results, vec!["squats/set3x 22+22+22"]);
        assert_eq!(input.weight, Some(75.5));
    }

    #[test]
    fn yaml_lines_with_wrong_arity_are_ignored() {
        let data = DailyYamlInput {
            run: Some("regular park full".to_string()),
            workout: Some("regular".to_string()),
            ..Default::default()
        };
        let input = parse_daily_entry_yaml(data).unwrap();
        assert!(input.running.is_none());
        assert!(input.workout.is_none());
    }

    #[test]
    fn yaml_unknown_schedule_is_reported() {
        let data = DailyYamlInput {
            workout: Some("sometimes strength-a".to_string()),
            ..Default::default()
        };
        let errors = parse_daily_entry_yaml(data).unwrap_err();
        assert_eq!(errors, vec!["workout.schedule - unknown schedule sometimes"]);
    }

    #[test]
    fn import_skips_failing_entries() {
        let (db, catalog) = setup();
        let yaml = "- date: 2026-01-15\n  workout: regular strength-a\n  results:\n    - squats/set3x 20+20+20\n\
                    - date: 2026-01-16\n  workout: regular strength-a\n  results:\n    - squats/set3x 20\n\
                    - date: 2026-01-15\n";

        let summary = import_yaml(&db, &catalog, yaml, date("2026-10-15")).unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 2 });
        assert_eq!(db.get_all_entries().unwrap().len(), 1);
    }

    #[test]
    fn yaml_list_documents_and_unknown_fields() {
        let list = "- date: 2026-01-15\n- date: 2026-01-16\n";
        assert_eq!(parse_yaml_entries(list).unwrap().len(), 2);

        assert!(parse_yaml_entries("mood: great\n").is_err());
    }
}
