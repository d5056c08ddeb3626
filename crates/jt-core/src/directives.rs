//! Parser for the topic directive string and the table it produces.
//!
//! The grammar is a comma-separated list of `key = value` pairs:
//!
//! ```text
//! workflow = wf-events, coordinator = jobid, default = user
//! ```
//!
//! Keys are `workflow`, `coordinator`, `bundle` or `default`. Values are the
//! keywords `jobid` and `user`, or (for category keys only) a literal topic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::TopicError;
use crate::types::{tokens, EntityIdentity, JobCategory, TopicDirective};

/// Placeholder a subscriber substitutes with the owner's username.
pub const USERNAME_PATTERN: &str = "${username}";
/// Placeholder a subscriber substitutes with the job id.
pub const JOB_ID_PATTERN: &str = "${jobId}";

static FALLBACK: TopicDirective = TopicDirective::UseOwnerName;

/// Immutable mapping from category to directive plus an optional default.
///
/// Deserialization applies the same rules as [`DirectiveTable::parse`]: the
/// default is a keyword, fixed names are non-empty and not keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDirectiveTable")]
pub struct DirectiveTable {
    directives: BTreeMap<JobCategory, TopicDirective>,
    default: Option<TopicDirective>,
}

#[derive(Deserialize)]
struct RawDirectiveTable {
    #[serde(default)]
    directives: BTreeMap<JobCategory, TopicDirective>,
    #[serde(default)]
    default: Option<TopicDirective>,
}

impl TryFrom<RawDirectiveTable> for DirectiveTable {
    type Error = TopicError;

    fn try_from(raw: RawDirectiveTable) -> Result<Self, Self::Error> {
        if let Some(TopicDirective::FixedName(name)) = &raw.default {
            return Err(TopicError::Config(format!(
                "{name} not allowed in default, expected {} or {}",
                tokens::JOBID,
                tokens::USER
            )));
        }
        for (category, directive) in &raw.directives {
            if let TopicDirective::FixedName(name) = directive {
                if name.trim().is_empty() || TopicDirective::from_keyword(name).is_some() {
                    return Err(TopicError::Config(format!(
                        "invalid fixed topic name '{name}' for {category}"
                    )));
                }
            }
        }
        Ok(Self {
            directives: raw.directives,
            default: raw.default,
        })
    }
}

impl DirectiveTable {
    /// Parse a directive string. Empty or whitespace-only input gives an
    /// empty table.
    pub fn parse(raw: &str) -> Result<Self, TopicError> {
        let mut table = DirectiveTable::default();

        for segment in raw.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (key, value) = segment
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .ok_or_else(|| {
                    TopicError::Config(format!(
                        "malformed topic entry '{segment}', expected key=value"
                    ))
                })?;

            if key == tokens::DEFAULT {
                let directive = TopicDirective::from_keyword(value).ok_or_else(|| {
                    TopicError::Config(format!(
                        "{value} not allowed in default, expected {} or {}",
                        tokens::JOBID,
                        tokens::USER
                    ))
                })?;
                if table.default.replace(directive).is_some() {
                    return Err(TopicError::Config(
                        "default specified more than once in topic configuration".into(),
                    ));
                }
                continue;
            }

            let category: JobCategory = key.parse().map_err(|_| {
                TopicError::Config(format!(
                    "Incorrect job type: {key} in topic configuration, \
                     expected one of {}, {}, {} or {}",
                    tokens::WORKFLOW,
                    tokens::COORDINATOR,
                    tokens::BUNDLE,
                    tokens::DEFAULT
                ))
            })?;
            if table
                .directives
                .insert(category, TopicDirective::from_value(value))
                .is_some()
            {
                return Err(TopicError::Config(format!(
                    "{category} specified more than once in topic configuration"
                )));
            }
        }

        Ok(table)
    }

    /// Directive configured explicitly for `category`.
    pub fn get(&self, category: JobCategory) -> Option<&TopicDirective> {
        self.directives.get(&category)
    }

    pub fn default_directive(&self) -> Option<&TopicDirective> {
        self.default.as_ref()
    }

    /// Directive that applies to `category` after the default and the
    /// owner-name fallback.
    pub fn effective(&self, category: JobCategory) -> &TopicDirective {
        self.get(category)
            .or(self.default.as_ref())
            .unwrap_or(&FALLBACK)
    }

    /// Explicit entries in category order.
    pub fn iter(&self) -> impl Iterator<Item = (JobCategory, &TopicDirective)> {
        self.directives.iter().map(|(c, d)| (*c, d))
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty() && self.default.is_none()
    }

    /// Topic name for a classified entity.
    pub fn topic_for(&self, identity: &EntityIdentity) -> String {
        match self.effective(identity.category) {
            TopicDirective::FixedName(name) => name.clone(),
            TopicDirective::UseJobId => identity.owner_job_id.clone(),
            TopicDirective::UseOwnerName => identity.owner_user.clone(),
        }
    }

    /// What a subscriber should listen on for `category`: a literal topic
    /// or a placeholder to fill with the username or job id.
    pub fn topic_pattern(&self, category: JobCategory) -> String {
        match self.effective(category) {
            TopicDirective::FixedName(name) => name.clone(),
            TopicDirective::UseJobId => JOB_ID_PATTERN.to_string(),
            TopicDirective::UseOwnerName => USERNAME_PATTERN.to_string(),
        }
    }

    pub fn topic_patterns(&self) -> BTreeMap<JobCategory, String> {
        JobCategory::ALL
            .into_iter()
            .map(|c| (c, self.topic_pattern(c)))
            .collect()
    }
}
