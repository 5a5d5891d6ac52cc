use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::job::Job;

/// On-disk shape of the job store
///
/// The file is normally a bare array of jobs. Some deployments keep the
/// array under a `jobs` key instead; that shape is read the same way and
/// written back unchanged, including any sibling keys.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StoreDocument {
    List(Vec<Job>),
    Wrapped {
        jobs: Vec<Job>,
        #[serde(flatten)]
        rest: Map<String, Value>,
    },
}

impl Default for StoreDocument {
    fn default() -> Self {
        StoreDocument::List(Vec::new())
    }
}

impl StoreDocument {
    pub fn jobs(&self) -> &[Job] {
        match self {
            StoreDocument::List(jobs) => jobs,
            StoreDocument::Wrapped { jobs, .. } => jobs,
        }
    }

    pub fn jobs_mut(&mut self) -> &mut Vec<Job> {
        match self {
            StoreDocument::List(jobs) => jobs,
            StoreDocument::Wrapped { jobs, .. } => jobs,
        }
    }

    /// Index of the first job whose `id` equals `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.jobs().iter().position(|job| job.id() == Some(id))
    }

    pub fn find(&self, id: &str) -> Option<&Job> {
        self.position(id).map(|index| &self.jobs()[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_parses_as_list() {
        let document: StoreDocument =
            serde_json::from_value(json!([{"id": "1", "title": "Baker"}])).unwrap();

        assert!(matches!(document, StoreDocument::List(_)));
        assert_eq!(document.find("1").unwrap().fields()["title"], "Baker");
    }

    #[test]
    fn wrapped_shape_keeps_sibling_keys() {
        let raw = json!({"jobs": [{"id": "7"}], "updated": "yesterday"});
        let document: StoreDocument = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(document.position("7"), Some(0));
        assert_eq!(serde_json::to_value(&document).unwrap(), raw);
    }

    #[test]
    fn object_without_jobs_key_is_rejected() {
        assert!(serde_json::from_value::<StoreDocument>(json!({"items": []})).is_err());
    }

    #[test]
    fn lookup_is_by_exact_string_id() {
        let document: StoreDocument =
            serde_json::from_value(json!([{"id": 5}, {"id": "5"}])).unwrap();

        assert_eq!(document.position("5"), Some(1));
        assert_eq!(document.position("6"), None);
    }
}
