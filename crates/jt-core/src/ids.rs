use chrono::{DateTime, Utc};

use crate::types::JobCategory;

/// A job or action id split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub category: JobCategory,
    pub job_id: String,
    /// Action name, `None` when the id names a job.
    pub action: Option<String>,
}

impl EntityRef {
    pub fn is_action(&self) -> bool {
        self.action.is_some()
    }
}

/// Single-letter suffix that closes a job id of the given category.
pub fn category_suffix(category: JobCategory) -> char {
    match category {
        JobCategory::Workflow => 'W',
        JobCategory::Coordinator => 'C',
        JobCategory::Bundle => 'B',
    }
}

/// Generate a job id with format: `{seq:07}-{yyMMddHHmmssSSS}-{system}-{W|C|B}`
pub fn job_id(seq: u64, system: &str, category: JobCategory) -> String {
    job_id_at(seq, Utc::now(), system, category)
}

/// Same as [`job_id`] with an explicit start time.
pub fn job_id_at(seq: u64, started: DateTime<Utc>, system: &str, category: JobCategory) -> String {
    format!(
        "{seq:07}-{}-{system}-{}",
        started.format("%y%m%d%H%M%S%3f"),
        category_suffix(category)
    )
}

/// Action ids are `{job}@{name}` for workflows and coordinators and
/// `{job}_{name}` for bundles.
pub fn action_id(job_id: &str, category: JobCategory, name: &str) -> String {
    match category {
        JobCategory::Workflow | JobCategory::Coordinator => format!("{job_id}@{name}"),
        JobCategory::Bundle => format!("{job_id}_{name}"),
    }
}

fn category_of_job(job_id: &str) -> Option<JobCategory> {
    let (head, suffix) = job_id.rsplit_once('-')?;
    if head.is_empty() {
        return None;
    }
    match suffix {
        "W" => Some(JobCategory::Workflow),
        "C" => Some(JobCategory::Coordinator),
        "B" => Some(JobCategory::Bundle),
        _ => None,
    }
}

/// Recognise an id by its shape. Returns `None` for anything that does not
/// follow the job/action layout.
pub fn parse_entity_id(id: &str) -> Option<EntityRef> {
    if let Some((job, action)) = id.split_once('@') {
        let category = category_of_job(job)?;
        if action.is_empty() || category == JobCategory::Bundle {
            return None;
        }
        return Some(EntityRef {
            category,
            job_id: job.to_string(),
            action: Some(action.to_string()),
        });
    }

    if let Some(category) = category_of_job(id) {
        return Some(EntityRef {
            category,
            job_id: id.to_string(),
            action: None,
        });
    }

    // Bundle action: the coordinator name follows the bundle id after `_`.
    let idx = id.find("-B_")?;
    let (job, rest) = id.split_at(idx + 2);
    let action = &rest[1..];
    if action.is_empty() || category_of_job(job) != Some(JobCategory::Bundle) {
        return None;
    }
    Some(EntityRef {
        category: JobCategory::Bundle,
        job_id: job.to_string(),
        action: Some(action.to_string()),
    })
}
