use std::path::PathBuf;

use clap::Args;
use jt_core::{IdentityLookup, TopicResolver};
use serde::Serialize;

use crate::context::{self, TopicSource};

#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Job or action ids to resolve
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// TOML file describing known jobs and their actions
    #[arg(short, long)]
    pub entities: PathBuf,

    /// Print JSON instead of tab-separated lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Resolved {
    id: String,
    topic: String,
}

pub fn run(cmd: &ResolveCommand, source: &TopicSource) -> anyhow::Result<()> {
    let store = context::load_store(&cmd.entities)?;
    let resolver = TopicResolver::new(store, source.table()?);
    print!("{}", render(&resolver, &cmd.ids, cmd.json)?);
    Ok(())
}

/// One line (or JSON array entry) per id, in argument order.
fn render<L: IdentityLookup>(
    resolver: &TopicResolver<L>,
    ids: &[String],
    json: bool,
) -> anyhow::Result<String> {
    let resolved = ids
        .iter()
        .map(|id| -> anyhow::Result<Resolved> {
            Ok(Resolved {
                id: id.clone(),
                topic: resolver.resolve_topic(id)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&resolved)?));
    }
    Ok(resolved
        .iter()
        .map(|r| format!("{}\t{}\n", r.id, r.topic))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jt_core::{InMemoryJobStore, JobCategory};

    fn resolver(raw: &str) -> (TopicResolver<InMemoryJobStore>, String, String) {
        let mut store = InMemoryJobStore::new("oozie-oozi");
        let wf = store.add_job(JobCategory::Workflow, "alice");
        let action = store.add_action(&wf, "1").unwrap();
        (TopicResolver::from_config(store, raw).unwrap(), wf, action)
    }

    #[test]
    fn text_output_keeps_argument_order() {
        let (resolver, wf, action) = resolver("default=jobid");
        let ids = vec![action.clone(), wf.clone()];
        let out = render(&resolver, &ids, false).unwrap();
        assert_eq!(out, format!("{action}\t{wf}\n{wf}\t{wf}\n"));
    }

    #[test]
    fn json_output_keeps_repeated_ids_in_order() {
        let (resolver, wf, action) = resolver("");
        let ids = vec![wf.clone(), action.clone(), wf.clone()];
        let out = render(&resolver, &ids, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["id"], wf.as_str());
        assert_eq!(entries[1]["id"], action.as_str());
        assert_eq!(entries[2]["id"], wf.as_str());
        for entry in entries {
            assert_eq!(entry["topic"], "alice");
        }
    }

    #[test]
    fn unknown_id_fails_the_command() {
        let (resolver, wf, _) = resolver("");
        let ids = vec![wf, "0000099-x-W".to_string()];
        let err = render(&resolver, &ids, false).unwrap_err();
        assert!(err.to_string().contains("0000099-x-W"), "got: {err}");
    }
}
