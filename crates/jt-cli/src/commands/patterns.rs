use std::collections::BTreeMap;

use clap::Args;
use jt_core::JobCategory;

use crate::context::TopicSource;

#[derive(Debug, Args)]
pub struct PatternsCommand {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Show what subscribers should listen on for each category.
pub fn run(cmd: &PatternsCommand, source: &TopicSource) -> anyhow::Result<()> {
    let patterns = source.table()?.topic_patterns();
    print!("{}", render(&patterns, cmd.json)?);
    Ok(())
}

fn render(patterns: &BTreeMap<JobCategory, String>, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(patterns)?));
    }
    Ok(patterns
        .iter()
        .map(|(category, pattern)| format!("{:<12}{pattern}\n", category.as_str()))
        .collect())
}
