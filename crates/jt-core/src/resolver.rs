use arc_swap::ArcSwap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::directives::DirectiveTable;
use crate::errors::TopicError;
use crate::lookup::IdentityLookup;
use crate::types::JobCategory;

/// Maps job and action ids to the topic their lifecycle events go to.
///
/// The directive table is published through an `ArcSwap`: each call works
/// on one complete snapshot, and [`TopicResolver::reload`] replaces the
/// whole table in a single store.
pub struct TopicResolver<L> {
    lookup: L,
    table: ArcSwap<DirectiveTable>,
}

impl<L: IdentityLookup> TopicResolver<L> {
    pub fn new(lookup: L, table: DirectiveTable) -> Self {
        Self {
            lookup,
            table: ArcSwap::from_pointee(table),
        }
    }

    /// Parse `raw` and build a resolver. A bad directive string is fatal.
    pub fn from_config(lookup: L, raw: &str) -> Result<Self, TopicError> {
        let table = DirectiveTable::parse(raw)?;
        tracing::info!(
            entries = table.iter().count(),
            default = ?table.default_directive(),
            "topic directives loaded"
        );
        Ok(Self::new(lookup, table))
    }

    /// Topic name for a job or action id. Lookup failures are returned as-is.
    pub fn resolve_topic(&self, id: &str) -> Result<String, TopicError> {
        let identity = self.lookup.classify(id)?;
        let table = self.table.load();
        let topic = table.topic_for(&identity);
        tracing::debug!(
            id,
            category = %identity.category,
            job_id = %identity.owner_job_id,
            topic = %topic,
            "resolved topic"
        );
        Ok(topic)
    }

    /// Current table snapshot.
    pub fn table(&self) -> Arc<DirectiveTable> {
        self.table.load_full()
    }

    pub fn topic_patterns(&self) -> BTreeMap<JobCategory, String> {
        self.table.load().topic_patterns()
    }

    /// Rebuild the table from `raw` and swap it in. On error the current
    /// table stays active.
    pub fn reload(&self, raw: &str) -> Result<(), TopicError> {
        let fresh = match DirectiveTable::parse(raw) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(error = %e, "rejected topic directive reload");
                return Err(e);
            }
        };
        self.table.store(Arc::new(fresh));
        tracing::info!("topic directives reloaded");
        Ok(())
    }
}
