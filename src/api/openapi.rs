//! OpenAPI 3.1 description of the HTTP API, served at `GET /api`.

use serde_json::{json, Value};

fn envelope_of(result: Value) -> Value {
    json!({
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "links": { "$ref": "#/components/schemas/Links" },
                        "result": result,
                    },
                    "required": ["links", "result"],
                }
            }
        }
    })
}

fn response(description: &str, result: Value) -> Value {
    let mut body = envelope_of(result);
    body["description"] = json!(description);
    body
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "array", "items": items })
}

fn message() -> Value {
    json!({ "type": "object", "properties": { "message": { "type": "string" } } })
}

fn date_param() -> Value {
    json!({
        "name": "date",
        "in": "path",
        "required": true,
        "schema": { "type": "string" },
        "description": "Date in YYYY-MM-DD format, or \"today\"",
    })
}

fn components() -> Value {
    let nullable_string = json!({ "type": ["string", "null"] });
    let streak = json!({
        "type": "object",
        "properties": { "count": { "type": "integer" }, "distance": { "type": "number" } },
    });
    let schedule = json!({ "type": "string", "enum": ["regular", "adhoc", "legacy", "void"] });

    json!({
        "schemas": {
            "Links": {
                "type": "object",
                "properties": { "self": { "type": "string" } },
                "required": ["self"],
                "additionalProperties": { "type": "string" },
            },
            "ErrorResponse": {
                "type": "object",
                "properties": {
                    "error": { "type": "string" },
                    "details": array_of(json!({ "type": "string" })),
                },
                "required": ["error"],
            },
            "Track": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "name": { "type": "string" },
                    "length": { "type": "number" },
                    "url": { "type": "string" },
                    "progressUnit": { "type": "string", "enum": ["km", "flight", "pole"] },
                },
                "required": ["id", "name", "length", "url", "progressUnit"],
            },
            "Running": {
                "type": "object",
                "properties": {
                    "schedule": schedule,
                    "track": { "oneOf": [schema_ref("Track"), { "type": "null" }] },
                    "progress": nullable_string,
                    "performance": { "type": ["integer", "null"], "minimum": 0, "maximum": 4 },
                },
                "required": ["schedule"],
            },
            "WorkoutResult": {
                "type": "object",
                "properties": {
                    "exercise": { "type": "string" },
                    "execution": { "type": "string", "enum": ["set3x", "hold3x", "maxset", "maxhold"] },
                    "volume": { "type": "string" },
                },
                "required": ["exercise", "execution", "volume"],
            },
            "Workout": {
                "type": "object",
                "properties": {
                    "schedule": schedule,
                    "routine": nullable_string,
                    "results": array_of(schema_ref("WorkoutResult")),
                },
                "required": ["schedule"],
            },
            "DailyEntry": {
                "type": "object",
                "properties": {
                    "date": { "type": "string", "format": "date" },
                    "week": { "type": "string", "description": "ISO week as YYYY-WW" },
                    "year": { "type": "integer" },
                    "month": { "type": "string" },
                    "day": { "type": "string" },
                    "running": schema_ref("Running"),
                    "workout": schema_ref("Workout"),
                    "weight": { "type": ["number", "null"] },
                    "lastMeal": nullable_string,
                    "stretching": nullable_string,
                    "stairs": nullable_string,
                    "diary": nullable_string,
                },
                "required": ["date", "week", "year", "month", "day", "running", "workout"],
            },
            "DailyEntryInput": {
                "type": "object",
                "properties": {
                    "date": { "type": "string", "format": "date" },
                    "running": {
                        "type": "object",
                        "properties": {
                            "schedule": schedule,
                            "trackId": { "type": "string" },
                            "progress": { "type": "string" },
                            "performance": { "type": "integer", "minimum": 0, "maximum": 4 },
                        },
                        "required": ["schedule"],
                    },
                    "workout": {
                        "type": "object",
                        "properties": {
                            "schedule": schedule,
                            "routine": { "type": "string" },
                            "results": array_of(json!({
                                "type": "string",
                                "description": "<exercise>/<execution> <volume>, e.g. squats/set3x 22+22+22",
                            })),
                        },
                        "required": ["schedule"],
                    },
                    "weight": { "type": "number" },
                    "lastMeal": { "type": "string" },
                    "stretching": { "type": "string" },
                    "stairs": { "type": "string" },
                    "diary": { "type": "string" },
                },
                "additionalProperties": false,
            },
            "DailyEntryUpdate": {
                "type": "object",
                "properties": {
                    "weight": { "type": ["number", "null"] },
                    "lastMeal": nullable_string,
                    "stretching": nullable_string,
                    "stairs": nullable_string,
                    "diary": nullable_string,
                },
            },
            "Stats": {
                "type": "object",
                "properties": {
                    "bestRunningStreak": streak,
                    "currentRunningStreak": streak,
                    "total": streak,
                },
            },
            "Meal": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "name": { "type": "string" },
                    "kcal": { "type": "integer" },
                    "ingredients": array_of(json!({
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "quantity": { "type": "string" },
                            "kcal": { "type": "integer" },
                        },
                    })),
                },
                "required": ["id", "name", "kcal", "ingredients"],
            },
        }
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Daily Fitness Tracker API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Personal fitness tracking REST API for daily entries including running, workouts, weight, meals, stretching, stairs, and diary notes.",
        },
        "paths": {
            "/health": {
                "get": {
                    "summary": "Health check",
                    "operationId": "getHealth",
                    "responses": {
                        "200": response("Service status", json!({
                            "type": "object",
                            "properties": {
                                "status": { "type": "string", "const": "ok" },
                                "timestamp": { "type": "string", "format": "date-time" },
                                "uptime": { "type": "number" },
                            },
                        })),
                    },
                }
            },
            "/stats": {
                "get": {
                    "summary": "Running statistics and streaks",
                    "operationId": "getStats",
                    "responses": { "200": response("Running stats", schema_ref("Stats")) },
                }
            },
            "/summary": {
                "get": {
                    "summary": "Workout exercise progression summary",
                    "operationId": "getSummary",
                    "responses": {
                        "200": response("Map of exercise names to their volume history", json!({
                            "type": "object",
                            "additionalProperties": array_of(json!({ "type": "integer" })),
                        })),
                    },
                }
            },
            "/exercises": {
                "get": {
                    "summary": "List all available exercises",
                    "operationId": "getExercises",
                    "responses": {
                        "200": response("List of exercises", array_of(json!({
                            "type": "object",
                            "properties": { "name": { "type": "string" } },
                        }))),
                    },
                }
            },
            "/tracks": {
                "get": {
                    "summary": "List all running tracks",
                    "operationId": "getTracks",
                    "responses": { "200": response("List of tracks", array_of(schema_ref("Track"))) },
                },
                "post": {
                    "summary": "Create a running track",
                    "operationId": "createTrack",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": schema_ref("Track") } },
                    },
                    "responses": {
                        "201": response("Track created", message()),
                        "500": error_response("Server error"),
                    },
                }
            },
            "/tracks/{id}": {
                "get": {
                    "summary": "Get a running track by ID",
                    "operationId": "getTrackById",
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                    "responses": {
                        "200": response("Track details", schema_ref("Track")),
                        "404": error_response("Track not found"),
                    },
                }
            },
            "/entries": {
                "get": {
                    "summary": "List all daily entries",
                    "operationId": "getEntries",
                    "responses": {
                        "200": response("List of daily entries", array_of(schema_ref("DailyEntry"))),
                    },
                },
                "post": {
                    "summary": "Create a daily entry",
                    "operationId": "createEntry",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": { "schema": schema_ref("DailyEntryInput") },
                            "application/yaml": {
                                "schema": {
                                    "type": "object",
                                    "description": "YAML format with compact strings. run: \"schedule trackId progress performance\", workout: \"schedule routine\"",
                                }
                            },
                        },
                    },
                    "responses": {
                        "201": response("Entry created", json!({
                            "type": "object",
                            "properties": {
                                "message": { "type": "string" },
                                "report": array_of(json!({ "type": "string" })),
                            },
                        })),
                        "400": error_response("Validation error"),
                    },
                }
            },
            "/entries/{date}": {
                "get": {
                    "summary": "Get a daily entry by date",
                    "operationId": "getEntryByDate",
                    "parameters": [date_param()],
                    "responses": {
                        "200": response("Daily entry with navigation links (previous, next)", schema_ref("DailyEntry")),
                        "404": error_response("Entry not found"),
                    },
                },
                "patch": {
                    "summary": "Update a daily entry",
                    "operationId": "updateEntry",
                    "parameters": [date_param()],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": schema_ref("DailyEntryUpdate") } },
                    },
                    "responses": {
                        "200": response("Entry updated", message()),
                        "404": error_response("Entry not found"),
                    },
                }
            },
            "/entries/{date}/diary": {
                "post": {
                    "summary": "Update diary text for a daily entry",
                    "operationId": "updateDiary",
                    "parameters": [date_param()],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "type": "object", "properties": { "diary": { "type": "string" } } }
                            }
                        },
                    },
                    "responses": {
                        "200": response("Diary updated", message()),
                        "404": error_response("Entry not found"),
                    },
                }
            },
            "/workouts/{date}": {
                "get": {
                    "summary": "Get workout results for a date",
                    "operationId": "getWorkoutsByDate",
                    "parameters": [date_param()],
                    "responses": {
                        "200": response("Workout results", array_of(schema_ref("WorkoutResult"))),
                    },
                }
            },
            "/diary": {
                "get": {
                    "summary": "Get all diary entries as plain text",
                    "operationId": "getDiary",
                    "responses": {
                        "200": {
                            "description": "Diary text",
                            "content": { "text/plain": { "schema": { "type": "string" } } },
                        }
                    },
                }
            },
            "/week/{week}": {
                "get": {
                    "summary": "Get the daily entries of one ISO week",
                    "operationId": "getWeek",
                    "parameters": [{
                        "name": "week",
                        "in": "path",
                        "required": true,
                        "schema": { "type": "string" },
                        "description": "ISO week as YYYY-WW, e.g. 2026-07",
                    }],
                    "responses": {
                        "200": response("All daily entries of the week", array_of(schema_ref("DailyEntry"))),
                        "404": error_response("Week not found"),
                    },
                }
            },
            "/meals": {
                "get": {
                    "summary": "List meals with computed calories",
                    "operationId": "getMeals",
                    "responses": { "200": response("List of meals", array_of(schema_ref("Meal"))) },
                }
            },
        },
        "components": components(),
    })
}
