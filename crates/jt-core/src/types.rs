use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Tokens ---

/// Configuration tokens shared by the parser and the pattern renderer.
pub mod tokens {
    pub const WORKFLOW: &str = "workflow";
    pub const COORDINATOR: &str = "coordinator";
    pub const BUNDLE: &str = "bundle";
    pub const DEFAULT: &str = "default";
    pub const JOBID: &str = "jobid";
    pub const USER: &str = "user";
}

// --- Enums ---

/// The three kinds of schedulable job. An action belongs to its owning
/// job's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobCategory {
    Workflow,
    Coordinator,
    Bundle,
}

impl JobCategory {
    pub const ALL: [JobCategory; 3] = [
        JobCategory::Workflow,
        JobCategory::Coordinator,
        JobCategory::Bundle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobCategory::Workflow => tokens::WORKFLOW,
            JobCategory::Coordinator => tokens::COORDINATOR,
            JobCategory::Bundle => tokens::BUNDLE,
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobCategory {
    type Err = String;

    /// Case-sensitive: `Workflow` is not a category token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            tokens::WORKFLOW => Ok(JobCategory::Workflow),
            tokens::COORDINATOR => Ok(JobCategory::Coordinator),
            tokens::BUNDLE => Ok(JobCategory::Bundle),
            other => Err(format!("unknown job category: {other}")),
        }
    }
}

/// How a topic name is derived for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum TopicDirective {
    /// Always the given literal.
    FixedName(String),
    /// The owning job's id, even when the event is for one of its actions.
    UseJobId,
    /// The owner's username.
    UseOwnerName,
}

impl TopicDirective {
    /// Interpret a configured value: `jobid` and `user` are keywords,
    /// anything else is a fixed topic name.
    pub fn from_value(value: &str) -> Self {
        Self::from_keyword(value).unwrap_or_else(|| TopicDirective::FixedName(value.to_string()))
    }

    /// Only the two keywords; `None` for anything else.
    pub fn from_keyword(value: &str) -> Option<Self> {
        match value {
            tokens::JOBID => Some(TopicDirective::UseJobId),
            tokens::USER => Some(TopicDirective::UseOwnerName),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        !matches!(self, TopicDirective::FixedName(_))
    }
}

impl fmt::Display for TopicDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicDirective::FixedName(name) => f.write_str(name),
            TopicDirective::UseJobId => f.write_str(tokens::JOBID),
            TopicDirective::UseOwnerName => f.write_str(tokens::USER),
        }
    }
}

// --- Structs ---

/// What the persistence layer knows about a job or action id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIdentity {
    pub category: JobCategory,
    pub owner_user: String,
    /// The id itself for a job, the parent job's id for an action.
    pub owner_job_id: String,
}
