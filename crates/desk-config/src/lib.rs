use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Simple configuration for desk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Technicians in round-robin order
    #[serde(default)]
    pub roster: Vec<TechnicianConfig>,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianConfig {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub extension: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// tracing-subscriber filter directive, overridden by RUST_LOG
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load and validate config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "desk", "desk") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.desk/config.toml")
        }
    }

    /// Reject rosters that list the same technician id twice
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for tech in &self.roster {
            if !seen.insert(tech.id.as_str()) {
                anyhow::bail!("technician '{}' appears more than once in the roster", tech.id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.roster.is_empty());
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.roster.push(TechnicianConfig {
            id: "TECH1".to_string(),
            name: "Tess".to_string(),
            extension: 12345,
        });
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.roster.len(), 1);
        assert_eq!(parsed.roster[0].extension, 12345);
    }

    #[test]
    fn test_roster_parse() {
        let toml_str = r#"
[log]
filter = "desk_core=debug"

[[roster]]
id = "TECH1"
name = "Tess"
extension = 12345

[[roster]]
id = "TECH2"
name = "Theo"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log.filter, "desk_core=debug");
        let ids: Vec<_> = config.roster.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["TECH1", "TECH2"]);
        assert_eq!(config.roster[1].extension, 0);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[[roster]]\nid = \"TECH1\"\nname = \"Tess\"\nextension = 1\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.roster[0].name, "Tess");
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_duplicate_roster_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[[roster]]\nid = \"TECH1\"\nname = \"Tess\"\n\n[[roster]]\nid = \"TECH1\"\nname = \"Theo\"\n",
        )
        .unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("TECH1"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.toml")).is_err());
    }
}
