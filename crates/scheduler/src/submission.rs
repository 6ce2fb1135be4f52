//! Validation of incoming submissions.
//!
//! Requests arrive as loosely-typed JSON. A [`Submission`] only exists once
//! the id list is a non-empty array of strings and the priority is one of the
//! three recognized levels, so nothing downstream re-checks either.

use serde_json::Value;

use crate::error::SchedulerError;
use crate::types::Priority;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    ids: Vec<String>,
    priority: Priority,
}

impl Submission {
    pub fn new(ids: Vec<String>, priority: Priority) -> Result<Self, SchedulerError> {
        if ids.is_empty() {
            return Err(SchedulerError::InvalidInput("ids must not be empty".into()));
        }
        Ok(Self { ids, priority })
    }

    /// Parse `{"ids": [...], "priority": "HIGH" | "MEDIUM" | "LOW"}`.
    pub fn from_json(body: &Value) -> Result<Self, SchedulerError> {
        let ids = match body.get("ids") {
            None | Some(Value::Null) => {
                return Err(SchedulerError::InvalidInput("ids is required".into()));
            }
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(SchedulerError::InvalidInput(format!(
                        "ids[{}] must be a string",
                        i
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(SchedulerError::InvalidInput("ids must be an array".into()));
            }
        };

        let priority = match body.get("priority") {
            Some(Value::String(p)) => p.parse::<Priority>()?,
            Some(Value::Null) | None => {
                return Err(SchedulerError::InvalidInput("priority is required".into()));
            }
            Some(_) => {
                return Err(SchedulerError::InvalidInput("priority must be a string".into()));
            }
        };

        Self::new(ids, priority)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn into_parts(self) -> (Vec<String>, Priority) {
        (self.ids, self.priority)
    }
}
