use std::path::{Path, PathBuf};

use anyhow::Context as _;
use jt_core::config::{self, ServiceConfig, TOPIC_NAME_ENV};
use jt_core::{DirectiveTable, InMemoryJobStore};

/// Where the directive string comes from. `--topics` beats
/// `JOBTOPIC_TOPIC_NAME`, which beats the config file.
#[derive(Debug, Clone, clap::Args)]
pub struct TopicSource {
    /// Directive string, e.g. "workflow=wf, default=jobid"
    #[arg(long, global = true)]
    pub topics: Option<String>,

    /// Config file (default: nearest .jobtopic/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl TopicSource {
    fn file_config(&self) -> anyhow::Result<Option<ServiceConfig>> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => {
                let cwd = std::env::current_dir()?;
                match config::find_config_root(&cwd) {
                    Some(root) => config::config_path(&root),
                    None => return Ok(None),
                }
            }
        };
        tracing::debug!(path = %path.display(), "loading service config");
        let loaded = config::load_service_config(&path)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(Some(loaded))
    }

    pub fn directive_string(&self) -> anyhow::Result<String> {
        let env = std::env::var(TOPIC_NAME_ENV).ok();
        // The file is only consulted when neither flag nor env is set.
        let file = match (&self.topics, &env) {
            (None, None) => self.file_config()?,
            _ => None,
        };
        Ok(config::topic_setting(
            self.topics.as_deref(),
            env,
            file.as_ref(),
        ))
    }

    pub fn table(&self) -> anyhow::Result<DirectiveTable> {
        let raw = self.directive_string()?;
        let table = DirectiveTable::parse(&raw).context("invalid topic configuration")?;
        Ok(table)
    }
}

pub fn load_store(path: &Path) -> anyhow::Result<InMemoryJobStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading entities from {}", path.display()))?;
    let store = InMemoryJobStore::from_toml(&content)
        .with_context(|| format!("parsing entities from {}", path.display()))?;
    tracing::debug!(entities = store.len(), "entity fixture loaded");
    Ok(store)
}
