use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::directives::DirectiveTable;
use crate::errors::TopicError;

/// Environment variable holding a directive string; overrides the file.
pub const TOPIC_NAME_ENV: &str = "JOBTOPIC_TOPIC_NAME";

/// Directory that marks a config root, holding `config.toml`.
pub const CONFIG_DIR: &str = ".jobtopic";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub topic: TopicConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Directive string, e.g. `workflow=wf, default=jobid`.
    #[serde(default)]
    pub name: String,
}

impl ServiceConfig {
    pub fn directives(&self) -> Result<DirectiveTable, TopicError> {
        DirectiveTable::parse(&self.topic.name)
    }
}

/// Pick the directive string: explicit flag, then environment, then file.
pub fn topic_setting(
    flag: Option<&str>,
    env: Option<String>,
    file: Option<&ServiceConfig>,
) -> String {
    flag.map(str::to_string)
        .or(env)
        .or_else(|| file.map(|c| c.topic.name.clone()))
        .unwrap_or_default()
}

/// Nearest ancestor of `start` (inclusive) holding `.jobtopic/config.toml`.
pub fn find_config_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| config_path(dir).exists())
        .map(Path::to_path_buf)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join("config.toml")
}

/// Load the service config, distinguishing a missing file from a bad one.
pub fn load_service_config(path: &Path) -> Result<ServiceConfig, TopicError> {
    if !path.exists() {
        return Err(TopicError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| TopicError::ConfigParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JobCategory, TopicDirective};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parse_service_config() {
        let toml_str = r#"
[topic]
name = "workflow = workflow, coordinator=coord, default = jobid"
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        let table = config.directives().unwrap();
        assert_eq!(
            table.get(JobCategory::Coordinator),
            Some(&TopicDirective::FixedName("coord".into()))
        );
        assert_eq!(table.default_directive(), Some(&TopicDirective::UseJobId));
    }

    #[test]
    fn service_config_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.topic.name, "");
        assert!(config.directives().unwrap().is_empty());
    }

    #[test]
    fn invalid_directives_surface_from_file_config() {
        let config: ServiceConfig =
            toml::from_str("[topic]\nname = \"default=invalidvalue\"").unwrap();
        assert!(matches!(config.directives(), Err(TopicError::Config(_))));
    }

    #[test]
    fn topic_setting_precedence() {
        let file = ServiceConfig {
            topic: TopicConfig {
                name: "default=user".into(),
            },
        };
        assert_eq!(
            topic_setting(Some("default=jobid"), Some("bundle=b".into()), Some(&file)),
            "default=jobid"
        );
        assert_eq!(topic_setting(None, Some("bundle=b".into()), Some(&file)), "bundle=b");
        assert_eq!(topic_setting(None, None, Some(&file)), "default=user");
        assert_eq!(topic_setting(None, None, None), "");
    }

    #[test]
    fn find_config_root_walks_up() {
        let dir = tempdir().unwrap();
        let cfg_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(cfg_dir.join("config.toml"), "[topic]\nname = \"\"").unwrap();

        let nested = dir.path().join("some").join("nested").join("dir");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_root(&nested).unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn find_config_root_returns_none_when_missing() {
        let dir = tempdir().unwrap();
        assert!(find_config_root(dir.path()).is_none());
    }

    #[test]
    fn load_service_config_reports_missing_and_malformed() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            load_service_config(&missing),
            Err(TopicError::ConfigNotFound(_))
        ));

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[topic\nname = ").unwrap();
        assert!(matches!(load_service_config(&bad), Err(TopicError::ConfigParse(_))));

        let good = dir.path().join("good.toml");
        fs::write(&good, "[topic]\nname = \"bundle=bundle\"").unwrap();
        let config = load_service_config(&good).unwrap();
        assert_eq!(config.topic.name, "bundle=bundle");
    }
}
