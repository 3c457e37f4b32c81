use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SealnotesConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub notes: NotesSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NotesSection {
    pub owner: Option<String>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LogSection {
    /// `tracing` filter directive, e.g. `"sealnotes_core=debug"`
    pub filter: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("notes.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SealnotesConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config at `path`, or defaults if there is no file.
pub fn load_config(path: &Path) -> anyhow::Result<SealnotesConfig> {
    if !path.exists() {
        return Ok(SealnotesConfig::default());
    }
    read_config(path)
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealnotes"));
        }
    }
    Ok(home_dir()?.join(".config").join("sealnotes"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("sealnotes"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("sealnotes"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_parses() {
        let config: SealnotesConfig = toml::from_str("[notes]\nowner = \"alice\"\n").unwrap();
        assert_eq!(config.notes.owner.as_deref(), Some("alice"));
        assert!(config.store.path.is_none());
        assert!(config.log.filter.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let config: SealnotesConfig = toml::from_str(
            "[store]\npath = \"/tmp/n.db\"\n\n[notes]\npage_size = 5\n\n[log]\nfilter = \"debug\"\n",
        )
        .unwrap();
        assert_eq!(config.store.path.as_deref(), Some("/tmp/n.db"));
        assert_eq!(config.notes.page_size, Some(5));
        assert_eq!(config.log.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert!(config.notes.owner.is_none());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[notes\nowner = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}
