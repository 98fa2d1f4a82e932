use crate::error::{Result, SemanticBranchError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Table names searched for branch rules, in order
const RULE_TABLES: [&[&str]; 3] = [
    &["tool", "semantic-branch"],
    &["tool", "semantic_branch"],
    &["package", "metadata", "semantic-branch"],
];

/// Branch rules as written in configuration.
///
/// Each key holds regex patterns matched against the full branch name.
/// Missing keys are empty lists.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SemanticBranchConfig {
    #[serde(default)]
    pub release: Vec<String>,

    #[serde(default)]
    pub prerelease: Vec<String>,

    #[serde(default)]
    pub patch: Vec<String>,

    #[serde(default)]
    pub minor: Vec<String>,

    #[serde(default)]
    pub major: Vec<String>,

    #[serde(default, alias = "prerelease_ignore")]
    pub prerelease_ignore: Vec<String>,

    #[serde(default, alias = "release_ignore")]
    pub release_ignore: Vec<String>,
}

/// A loaded configuration document.
///
/// Keeps the whole TOML table since the same file usually doubles as the
/// project manifest holding the current version.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub rules: SemanticBranchConfig,
    pub document: toml::Table,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Parse configuration text. `path` is recorded for later manifest writes.
    pub fn parse(text: &str, path: Option<PathBuf>) -> Result<Self> {
        let document: toml::Table = toml::from_str(text)?;
        let rules = extract_rules(&document)?;
        Ok(LoadedConfig {
            rules,
            document,
            path,
        })
    }

    /// Configuration with no rules and no backing file
    pub fn empty() -> Self {
        LoadedConfig {
            rules: SemanticBranchConfig::default(),
            document: toml::Table::new(),
            path: None,
        }
    }
}

/// Locate the branch rule table inside a TOML document.
///
/// An absent table is an empty rule set; a table of the wrong shape is an error.
pub fn extract_rules(document: &toml::Table) -> Result<SemanticBranchConfig> {
    for keys in RULE_TABLES {
        if let Some(value) = lookup(document, keys) {
            debug!("using branch rules from [{}]", keys.join("."));
            return SemanticBranchConfig::deserialize(value.clone()).map_err(|e| {
                SemanticBranchError::config(format!("[{}]: {}", keys.join("."), e))
            });
        }
    }
    debug!("no branch rule table found, using empty rules");
    Ok(SemanticBranchConfig::default())
}

fn lookup<'a>(document: &'a toml::Table, keys: &[&str]) -> Option<&'a toml::Value> {
    let (first, rest) = keys.split_first()?;
    rest.iter()
        .try_fold(document.get(*first)?, |value, key| value.get(*key))
}

/// Loads configuration from file or returns an empty rule set.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter (must exist)
/// 2. `pyproject.toml` in current directory
/// 3. `Cargo.toml` in current directory
/// 4. `semantic-branch.toml` in the user config directory
/// 5. Empty configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(SemanticBranchError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path)
        }
        None => discover_config(),
    };

    match path {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            let text = fs::read_to_string(&path)?;
            LoadedConfig::parse(&text, Some(path))
        }
        None => {
            info!("no configuration file found, using empty branch rules");
            Ok(LoadedConfig::empty())
        }
    }
}

fn discover_config() -> Option<PathBuf> {
    ["./pyproject.toml", "./Cargo.toml"]
        .iter()
        .map(Path::new)
        .find(|candidate| candidate.exists())
        .map(Path::to_path_buf)
        .or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("semantic-branch.toml"))
                .filter(|candidate| candidate.exists())
        })
}
