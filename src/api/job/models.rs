use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A job posting
///
/// Jobs carry no fixed schema: every field the caller supplies is kept as-is.
/// The only field the service owns is `id`, a string assigned on creation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Job {
    fields: Map<String, Value>,
}

impl Job {
    /// The job's id, if it has a string `id` field
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    /// Returns the job with its `id` field set, replacing any existing value
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.fields.insert("id".to_string(), Value::String(id.into()));
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for Job {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_id_overwrites_caller_supplied_id() {
        let job: Job = serde_json::from_value(json!({"id": "spoofed", "title": "Welder"})).unwrap();

        let job = job.with_id("42");

        assert_eq!(job.id(), Some("42"));
        assert_eq!(job.fields()["title"], "Welder");
    }

    #[test]
    fn numeric_id_is_not_a_string_id() {
        let job: Job = serde_json::from_value(json!({"id": 42})).unwrap();
        assert_eq!(job.id(), None);
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(serde_json::from_value::<Job>(json!(["not", "a", "job"])).is_err());
        assert!(serde_json::from_value::<Job>(json!("text")).is_err());
    }
}
