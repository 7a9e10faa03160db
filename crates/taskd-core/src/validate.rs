//! Request validation applied before create/update reach the store.
//!
//! Bodies arrive as loosely-typed JSON so that type mismatches (a numeric
//! title, a string completed flag) surface as validation failures instead of
//! body-parse rejections. All violations on one request are collected and
//! returned together.

use serde::Serialize;

use crate::task::{TaskDraft, TaskPatch};

/// Maximum title length after trimming surrounding whitespace.
pub const TITLE_MAX_LEN: usize = 200;

/// A single failed validation rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

impl Violation {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate a create body. `title` is required; `completed` is optional and
/// must be strictly boolean.
pub fn validate_create(body: &serde_json::Value) -> Result<TaskDraft, Vec<Violation>> {
    let mut violations = Vec::new();

    let title = match body.get("title").and_then(|v| v.as_str()) {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                violations.push(Violation::new(
                    "title",
                    "Title is required and must be a non-empty string",
                ));
                None
            } else if trimmed.chars().count() > TITLE_MAX_LEN {
                violations.push(Violation::new(
                    "title",
                    "Title must be between 1 and 200 characters",
                ));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => {
            violations.push(Violation::new(
                "title",
                "Title is required and must be a non-empty string",
            ));
            None
        }
    };

    let completed = match validate_completed(body) {
        Ok(completed) => completed,
        Err(v) => {
            violations.push(v);
            None
        }
    };

    if violations.is_empty() {
        Ok(TaskDraft {
            title: title.unwrap_or_default(),
            completed: completed.unwrap_or(false),
        })
    } else {
        Err(violations)
    }
}

/// Validate an update body. Both fields are optional, but a supplied `title`
/// must still be a non-empty string within the length bound. An empty body is
/// a valid (empty) patch.
pub fn validate_update(body: &serde_json::Value) -> Result<TaskPatch, Vec<Violation>> {
    let mut violations = Vec::new();

    let title = match body.get("title") {
        None => None,
        Some(value) => match value.as_str() {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    violations.push(Violation::new("title", "Title must be a non-empty string"));
                    None
                } else if trimmed.chars().count() > TITLE_MAX_LEN {
                    violations.push(Violation::new(
                        "title",
                        "Title must be between 1 and 200 characters",
                    ));
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => {
                violations.push(Violation::new("title", "Title must be a non-empty string"));
                None
            }
        },
    };

    let completed = match validate_completed(body) {
        Ok(completed) => completed,
        Err(v) => {
            violations.push(v);
            None
        }
    };

    if violations.is_empty() {
        Ok(TaskPatch { title, completed })
    } else {
        Err(violations)
    }
}

/// Parse a path identifier. Failure is a validation error, never a not-found.
pub fn parse_id(raw: &str) -> Result<i64, Violation> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Violation::new("id", "ID must be a positive integer")),
    }
}

fn validate_completed(body: &serde_json::Value) -> Result<Option<bool>, Violation> {
    match body.get("completed") {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| Violation::new("completed", "Completed must be a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_title() {
        let err = validate_create(&json!({})).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "title");
    }

    #[test]
    fn create_rejects_empty_and_whitespace_title() {
        assert!(validate_create(&json!({"title": ""})).is_err());
        assert!(validate_create(&json!({"title": "   "})).is_err());
    }

    #[test]
    fn create_rejects_non_string_title() {
        let err = validate_create(&json!({"title": 42})).unwrap_err();
        assert_eq!(err[0].field, "title");
    }

    #[test]
    fn create_trims_title() {
        let draft = validate_create(&json!({"title": " pad "})).unwrap();
        assert_eq!(draft.title, "pad");
    }

    #[test]
    fn create_defaults_completed_to_false() {
        let draft = validate_create(&json!({"title": "a"})).unwrap();
        assert!(!draft.completed);

        let draft = validate_create(&json!({"title": "a", "completed": true})).unwrap();
        assert!(draft.completed);
    }

    #[test]
    fn create_rejects_non_boolean_completed() {
        let err = validate_create(&json!({"title": "a", "completed": "yes"})).unwrap_err();
        assert_eq!(err[0].field, "completed");
    }

    #[test]
    fn create_rejects_oversized_title() {
        let long = "x".repeat(TITLE_MAX_LEN + 1);
        let err = validate_create(&json!({ "title": long })).unwrap_err();
        assert_eq!(err[0].message, "Title must be between 1 and 200 characters");

        let max = "x".repeat(TITLE_MAX_LEN);
        assert!(validate_create(&json!({ "title": max })).is_ok());
    }

    #[test]
    fn create_collects_all_violations() {
        let err = validate_create(&json!({"title": " ", "completed": 1})).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err[0].field, "title");
        assert_eq!(err[1].field, "completed");
    }

    #[test]
    fn update_accepts_empty_body() {
        let patch = validate_update(&json!({})).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn update_rejects_present_but_empty_title() {
        let err = validate_update(&json!({"title": "  "})).unwrap_err();
        assert_eq!(err[0].message, "Title must be a non-empty string");
    }

    #[test]
    fn update_rejects_null_title() {
        assert!(validate_update(&json!({"title": null})).is_err());
    }

    #[test]
    fn update_trims_title() {
        let patch = validate_update(&json!({"title": " New "})).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert!(patch.completed.is_none());
    }

    #[test]
    fn update_rejects_non_boolean_completed() {
        let err = validate_update(&json!({"completed": "true"})).unwrap_err();
        assert_eq!(err[0].field, "completed");
    }

    #[test]
    fn parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("42").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_bad_input() {
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn violation_serializes_field_and_message() {
        let json = serde_json::to_value(Violation::new("id", "ID must be a positive integer"))
            .unwrap();
        assert_eq!(json["field"], "id");
        assert_eq!(json["message"], "ID must be a positive integer");
    }
}
