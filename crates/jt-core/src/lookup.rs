use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::TopicError;
use crate::ids;
use crate::types::{EntityIdentity, JobCategory};

/// Answers "what is this id?" for the resolver. Implementations are
/// typically backed by the job store; they must know every id that is
/// ever resolved.
pub trait IdentityLookup: Send + Sync {
    fn classify(&self, id: &str) -> Result<EntityIdentity, TopicError>;
}

impl<T: IdentityLookup + ?Sized> IdentityLookup for Arc<T> {
    fn classify(&self, id: &str) -> Result<EntityIdentity, TopicError> {
        (**self).classify(id)
    }
}

impl<T: IdentityLookup + ?Sized> IdentityLookup for &T {
    fn classify(&self, id: &str) -> Result<EntityIdentity, TopicError> {
        (**self).classify(id)
    }
}

#[derive(Debug, Clone)]
struct JobRecord {
    category: JobCategory,
    user: String,
}

/// Job and action registry held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryJobStore {
    system: String,
    next_seq: u64,
    jobs: HashMap<String, JobRecord>,
    /// action id -> owning job id
    actions: HashMap<String, String>,
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new("jobtopic")
    }
}

impl InMemoryJobStore {
    /// `system` is embedded in generated job ids.
    pub fn new(system: &str) -> Self {
        Self {
            system: system.to_string(),
            next_seq: 0,
            jobs: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Register a job under a freshly generated id and return it.
    pub fn add_job(&mut self, category: JobCategory, user: &str) -> String {
        let id = ids::job_id(self.next_seq, &self.system, category);
        self.next_seq += 1;
        self.insert_job(&id, category, user);
        id
    }

    /// Register a job under a caller-chosen id.
    pub fn insert_job(&mut self, id: &str, category: JobCategory, user: &str) {
        self.jobs.insert(
            id.to_string(),
            JobRecord {
                category,
                user: user.to_string(),
            },
        );
    }

    /// Register an action of an existing job and return its id.
    pub fn add_action(&mut self, job_id: &str, name: &str) -> Result<String, TopicError> {
        let record = self
            .jobs
            .get(job_id)
            .ok_or_else(|| TopicError::EntityNotFound(job_id.to_string()))?;
        let action = ids::action_id(job_id, record.category, name);
        self.actions.insert(action.clone(), job_id.to_string());
        Ok(action)
    }

    pub fn len(&self) -> usize {
        self.jobs.len() + self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.actions.is_empty()
    }

    /// Build a store from a TOML fixture:
    ///
    /// ```toml
    /// [[jobs]]
    /// id = "0000001-120424120000000-oozie-oozi-W"
    /// user = "alice"
    /// actions = ["1", "2"]
    /// ```
    ///
    /// `category` may be omitted when the id follows the job id layout.
    pub fn from_toml(content: &str) -> Result<Self, TopicError> {
        let fixture: StoreFixture =
            toml::from_str(content).map_err(|e| TopicError::ConfigParse(e.to_string()))?;

        let mut store = InMemoryJobStore::default();
        for job in fixture.jobs {
            let category = match job.category {
                Some(category) => category,
                None => ids::parse_entity_id(&job.id)
                    .filter(|r| !r.is_action())
                    .map(|r| r.category)
                    .ok_or_else(|| {
                        TopicError::ConfigParse(format!(
                            "cannot infer category of job {}, set `category`",
                            job.id
                        ))
                    })?,
            };
            store.insert_job(&job.id, category, &job.user);
            for action in &job.actions {
                store.add_action(&job.id, action)?;
            }
        }
        Ok(store)
    }
}

impl IdentityLookup for InMemoryJobStore {
    fn classify(&self, id: &str) -> Result<EntityIdentity, TopicError> {
        let job_id = match self.actions.get(id) {
            Some(parent) => parent.as_str(),
            None => id,
        };
        let record = self
            .jobs
            .get(job_id)
            .ok_or_else(|| TopicError::EntityNotFound(id.to_string()))?;
        Ok(EntityIdentity {
            category: record.category,
            owner_user: record.user.clone(),
            owner_job_id: job_id.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StoreFixture {
    #[serde(default)]
    jobs: Vec<JobFixture>,
}

#[derive(Debug, Deserialize)]
struct JobFixture {
    id: String,
    user: String,
    #[serde(default)]
    category: Option<JobCategory>,
    #[serde(default)]
    actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_job_and_action() {
        let mut store = InMemoryJobStore::new("oozie-oozi");
        let wf = store.add_job(JobCategory::Workflow, "alice");
        let action = store.add_action(&wf, "1").unwrap();
        assert_eq!(action, format!("{wf}@1"));

        let job = store.classify(&wf).unwrap();
        assert_eq!(job.category, JobCategory::Workflow);
        assert_eq!(job.owner_user, "alice");
        assert_eq!(job.owner_job_id, wf);

        let act = store.classify(&action).unwrap();
        assert_eq!(act, job);
    }

    #[test]
    fn generated_ids_are_unique_and_typed() {
        let mut store = InMemoryJobStore::default();
        let a = store.add_job(JobCategory::Bundle, "u");
        let b = store.add_job(JobCategory::Bundle, "u");
        assert_ne!(a, b);
        assert!(a.ends_with("-B"));
        let action = store.add_action(&a, "coord-1").unwrap();
        assert_eq!(action, format!("{a}_coord-1"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = InMemoryJobStore::default();
        assert!(store.is_empty());
        let err = store.classify("0000009-x-W").unwrap_err();
        assert!(matches!(err, TopicError::EntityNotFound(ref id) if id == "0000009-x-W"));
    }

    #[test]
    fn action_of_unknown_job_is_rejected() {
        let mut store = InMemoryJobStore::default();
        assert!(matches!(
            store.add_action("missing-W", "1"),
            Err(TopicError::EntityNotFound(_))
        ));
    }

    #[test]
    fn lookup_through_arc() {
        let mut store = InMemoryJobStore::default();
        let coord = store.add_job(JobCategory::Coordinator, "bob");
        let shared: Arc<dyn IdentityLookup> = Arc::new(store);
        assert_eq!(shared.classify(&coord).unwrap().owner_user, "bob");
    }

    #[test]
    fn load_fixture() {
        let content = r#"
[[jobs]]
id = "0000001-120424120000000-oozie-oozi-W"
user = "alice"
actions = ["1"]

[[jobs]]
id = "nightly"
category = "bundle"
user = "ops"
actions = ["coord-a"]
"#;
        let store = InMemoryJobStore::from_toml(content).unwrap();
        let act = store
            .classify("0000001-120424120000000-oozie-oozi-W@1")
            .unwrap();
        assert_eq!(act.category, JobCategory::Workflow);
        assert_eq!(act.owner_job_id, "0000001-120424120000000-oozie-oozi-W");

        let bundle_action = store.classify("nightly_coord-a").unwrap();
        assert_eq!(bundle_action.category, JobCategory::Bundle);
        assert_eq!(bundle_action.owner_user, "ops");
    }

    #[test]
    fn fixture_requires_category_for_free_form_ids() {
        let content = r#"
[[jobs]]
id = "nightly"
user = "ops"
"#;
        let err = InMemoryJobStore::from_toml(content).unwrap_err();
        assert!(matches!(err, TopicError::ConfigParse(ref msg) if msg.contains("nightly")));
    }
}
