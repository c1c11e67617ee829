use chrono::{Datelike, NaiveDate};
use fitlog::db::Database;
use fitlog::entries::{day_abbrev, iso_week, month_abbrev};
use fitlog::models::*;
use speculate2::speculate;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid test date")
}

fn park_track() -> Track {
    Track {
        id: "park".to_string(),
        name: "Park loop".to_string(),
        length: 5.0,
        url: "https://example.com/park".to_string(),
        progress_unit: ProgressUnit::Km,
    }
}

fn new_entry(day: &str) -> NewDailyEntry {
    let date = date(day);
    NewDailyEntry {
        date,
        week: iso_week(date),
        year: date.year(),
        month: month_abbrev(date),
        day: day_abbrev(date),
        track_id: None,
        running_schedule: Schedule::Void,
        running_progress: None,
        running_performance: None,
        workout_schedule: Schedule::Regular,
        workout_routine: "strength-a".to_string(),
        weight: None,
        last_meal: None,
        stretching: None,
        stairs: None,
        diary: None,
    }
}

fn run_entry(day: &str, progress: &str) -> NewDailyEntry {
    NewDailyEntry {
        track_id: Some("park".to_string()),
        running_schedule: Schedule::Regular,
        running_progress: Some(progress.to_string()),
        running_performance: Some(3),
        ..new_entry(day)
    }
}

fn results(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "exercise catalog" {
        it "lists the seeded exercise names" {
            let names = db.list_exercise_names().expect("Query failed");
            assert_eq!(names.len(), 10);
            assert!(names.contains(&"squats/set3x".to_string()));
            assert!(names.contains(&"frontPlank/maxhold".to_string()));
        }

        it "loads a catalog that knows every seeded exercise" {
            let catalog = db.load_catalog().expect("Failed to load catalog");
            assert_eq!(catalog.len(), 10);
            assert!(catalog.get("pushUps/maxset").is_some());
        }
    }

    describe "tracks" {
        it "returns None for an unknown track" {
            assert!(db.get_track("nowhere").expect("Query failed").is_none());
        }

        it "creates and reads back a track" {
            db.create_track(&park_track()).expect("Failed to create track");

            let found = db.get_track("park").expect("Query failed").expect("Track missing");
            assert_eq!(found, park_track());
        }

        it "lists tracks ordered by name" {
            db.create_track(&park_track()).expect("Failed to create track");
            db.create_track(&Track {
                id: "stairs".to_string(),
                name: "Office stairs".to_string(),
                length: 10.0,
                url: "https://example.com/stairs".to_string(),
                progress_unit: ProgressUnit::Flight,
            }).expect("Failed to create track");

            let tracks = db.get_all_tracks().expect("Query failed");
            let names: Vec<&str> = tracks.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["Office stairs", "Park loop"]);
        }

        it "rejects a duplicate id" {
            db.create_track(&park_track()).expect("Failed to create track");
            assert!(db.create_track(&park_track()).is_err());
        }
    }

    describe "daily entries" {
        it "returns None for a date without an entry" {
            assert!(db.get_entry(date("1999-01-01")).expect("Query failed").is_none());
        }

        it "stores an entry with its results in order" {
            let count = db
                .insert_daily_entry(
                    &new_entry("2026-01-15"),
                    &results(&["squats/set3x 22+22+22", "frontPlank/maxhold 60s"]),
                )
                .expect("Insert failed");
            assert_eq!(count, 2);

            let entry = db.get_entry(date("2026-01-15")).expect("Query failed").expect("Entry missing");
            assert_eq!(entry.week, "2026-03");
            assert_eq!(entry.month, "jan");
            assert_eq!(entry.day, "thu");
            assert_eq!(entry.workout.results, vec![
                WorkoutResult {
                    exercise: "squats".to_string(),
                    execution: "set3x".to_string(),
                    volume: "22+22+22".to_string(),
                },
                WorkoutResult {
                    exercise: "frontPlank".to_string(),
                    execution: "maxhold".to_string(),
                    volume: "60s".to_string(),
                },
            ]);
        }

        it "joins the running track" {
            db.create_track(&park_track()).expect("Failed to create track");
            db.insert_daily_entry(&run_entry("2026-01-15", "full"), &[]).expect("Insert failed");

            let entry = db.get_entry(date("2026-01-15")).expect("Query failed").expect("Entry missing");
            assert_eq!(entry.running.track, Some(park_track()));
            assert_eq!(entry.running.performance, Some(3));
        }

        it "rolls back the entry when a result cannot be stored" {
            let outcome = db.insert_daily_entry(
                &new_entry("2026-01-15"),
                &results(&["squats/set3x 22+22+22", "badformat"]),
            );

            assert!(outcome.is_err());
            assert!(db.get_entry(date("2026-01-15")).expect("Query failed").is_none());
            assert!(db.get_all_workout_results().expect("Query failed").is_empty());
        }

        it "refuses a second entry for the same date" {
            db.insert_daily_entry(&new_entry("2026-01-15"), &[]).expect("Insert failed");
            assert!(db.insert_daily_entry(&new_entry("2026-01-15"), &[]).is_err());
        }

        it "lists entries newest first with their results" {
            db.insert_daily_entry(&new_entry("2026-01-15"), &results(&["pushUps/maxset 30"]))
                .expect("Insert failed");
            db.insert_daily_entry(&new_entry("2026-01-16"), &[]).expect("Insert failed");

            let entries = db.get_all_entries().expect("Query failed");
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].date, date("2026-01-16"));
            assert!(entries[0].workout.results.is_empty());
            assert_eq!(entries[1].workout.results.len(), 1);
        }

        it "selects the entries of one ISO week oldest first" {
            for day in ["2026-01-18", "2026-01-12", "2026-01-19"] {
                db.insert_daily_entry(&new_entry(day), &[]).expect("Insert failed");
            }

            let week = db.get_week_entries("2026-03").expect("Query failed");
            let dates: Vec<NaiveDate> = week.iter().map(|e| e.date).collect();
            assert_eq!(dates, vec![date("2026-01-12"), date("2026-01-18")]);

            assert!(db.get_week_entries("2025-01").expect("Query failed").is_empty());
        }
    }

    describe "update_entry" {
        before {
            db.insert_daily_entry(
                &NewDailyEntry {
                    weight: Some(75.5),
                    stretching: Some("yes".to_string()),
                    ..new_entry("2026-01-15")
                },
                &[],
            )
            .expect("Insert failed");
        }

        it "changes only the given fields" {
            let update: DailyEntryUpdate =
                serde_json::from_str(r#"{"weight": 76.0}"#).expect("Invalid update");
            assert!(db.update_entry(date("2026-01-15"), &update).expect("Update failed"));

            let entry = db.get_entry(date("2026-01-15")).expect("Query failed").expect("Entry missing");
            assert_eq!(entry.weight, Some(76.0));
            assert_eq!(entry.stretching.as_deref(), Some("yes"));
        }

        it "clears a field given as null" {
            let update: DailyEntryUpdate =
                serde_json::from_str(r#"{"stretching": null}"#).expect("Invalid update");
            assert!(db.update_entry(date("2026-01-15"), &update).expect("Update failed"));

            let entry = db.get_entry(date("2026-01-15")).expect("Query failed").expect("Entry missing");
            assert!(entry.stretching.is_none());
            assert_eq!(entry.weight, Some(75.5));
        }

        it "returns false when there is nothing to update" {
            let update = DailyEntryUpdate::default();
            assert!(!db.update_entry(date("2026-01-15"), &update).expect("Update failed"));
        }

        it "returns false for a missing entry" {
            let update: DailyEntryUpdate =
                serde_json::from_str(r#"{"weight": 80}"#).expect("Invalid update");
            assert!(!db.update_entry(date("1999-01-01"), &update).expect("Update failed"));
        }
    }

    describe "workout results" {
        it "appends results to an existing entry" {
            db.insert_daily_entry(&new_entry("2026-01-15"), &[]).expect("Insert failed");
            let count = db
                .insert_workout_results(date("2026-01-15"), &results(&["pullUps/maxset 8", "squats/set3x 20+20+20"]))
                .expect("Insert failed");
            assert_eq!(count, 2);

            let stored = db.get_workout_results_by_date(date("2026-01-15")).expect("Query failed");
            assert_eq!(stored[0].exercise, "pullUps");
            assert_eq!(stored[1].volume, "20+20+20");
        }

        it "stores nothing when any result is malformed" {
            db.insert_daily_entry(&new_entry("2026-01-15"), &[]).expect("Insert failed");
            let outcome = db.insert_workout_results(
                date("2026-01-15"),
                &results(&["pullUps/maxset 8", "nonsense"]),
            );

            assert!(outcome.is_err());
            assert!(db.get_workout_results_by_date(date("2026-01-15")).expect("Query failed").is_empty());
        }

        it "orders the full history by date then insertion" {
            db.insert_daily_entry(&new_entry("2026-01-16"), &results(&["squats/set3x 12+12+12"]))
                .expect("Insert failed");
            db.insert_daily_entry(
                &new_entry("2026-01-15"),
                &results(&["squats/set3x 10+10+10", "pushUps/maxset 20"]),
            )
            .expect("Insert failed");

            let history = db.get_all_workout_results().expect("Query failed");
            let volumes: Vec<&str> = history.iter().map(|r| r.result.volume.as_str()).collect();
            assert_eq!(volumes, vec!["10+10+10", "20", "12+12+12"]);
        }
    }

    describe "diary and running history" {
        it "returns only entries with a diary, oldest first" {
            db.insert_daily_entry(&NewDailyEntry { diary: Some("later".to_string()), ..new_entry("2026-01-17") }, &[])
                .expect("Insert failed");
            db.insert_daily_entry(&new_entry("2026-01-16"), &[]).expect("Insert failed");
            db.insert_daily_entry(&NewDailyEntry { diary: Some("first".to_string()), ..new_entry("2026-01-15") }, &[])
                .expect("Insert failed");

            let rows = db.get_diary_rows().expect("Query failed");
            assert_eq!(rows, vec![
                (date("2026-01-15"), "first".to_string()),
                (date("2026-01-17"), "later".to_string()),
            ]);
        }

        it "returns running days with their track" {
            db.create_track(&park_track()).expect("Failed to create track");
            db.insert_daily_entry(&run_entry("2026-01-16", "2.5"), &[]).expect("Insert failed");
            db.insert_daily_entry(&new_entry("2026-01-15"), &[]).expect("Insert failed");

            let days = db.get_running_days().expect("Query failed");
            assert_eq!(days.len(), 2);
            assert!(days[0].track.is_none());
            assert_eq!(days[1].track, Some((5.0, ProgressUnit::Km)));
            assert_eq!(days[1].progress.as_deref(), Some("2.5"));
        }
    }

    describe "file database" {
        it "keeps data across reopening" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("fitlog.db");

            {
                let file_db = Database::open(path.clone()).expect("Failed to open");
                file_db.migrate().expect("Failed to migrate");
                file_db.create_track(&park_track()).expect("Failed to create track");
            }

            let reopened = Database::open(path).expect("Failed to reopen");
            reopened.migrate().expect("Failed to migrate");
            assert!(reopened.get_track("park").expect("Query failed").is_some());
            assert_eq!(db.get_all_tracks().expect("Query failed").len(), 0);
        }

        it "fails to decode an entry with an unknown schedule" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("fitlog.db");

            let file_db = Database::open(path.clone()).expect("Failed to open");
            file_db.migrate().expect("Failed to migrate");
            file_db.insert_daily_entry(&new_entry("2026-01-15"), &[]).expect("Insert failed");

            let raw = rusqlite::Connection::open(&path).expect("Failed to open raw connection");
            raw.execute(
                "UPDATE daily_entries SET workout_schedule = 'sometimes' WHERE date = '2026-01-15'",
                [],
            )
            .expect("Update failed");

            assert!(file_db.get_entry(date("2026-01-15")).is_err());
            assert!(file_db.get_all_entries().is_err());
        }
    }
}
