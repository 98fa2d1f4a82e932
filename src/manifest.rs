//! Project manifest version access.
//!
//! `pyproject.toml` keeps the version under `project.version`, `Cargo.toml`
//! under `package.version`. The first one present wins.

use crate::domain::Version;
use crate::error::{Result, SemanticBranchError};
use log::{info, warn};
use std::fs;
use std::path::Path;
use toml_edit::{DocumentMut, Item, Value};

const VERSION_TABLES: [&str; 2] = ["project", "package"];

/// Version assumed when the manifest does not declare one
pub const DEFAULT_VERSION: Version = Version {
    major: 0,
    minor: 1,
    patch: 0,
    prerelease: None,
};

/// Read the current version from a manifest document
pub fn read_version(document: &toml::Table) -> Result<Version> {
    for table in VERSION_TABLES {
        if let Some(value) = document.get(table).and_then(|t| t.get("version")) {
            let text = value.as_str().ok_or_else(|| {
                SemanticBranchError::manifest(format!("{}.version must be a string", table))
            })?;
            return Version::parse(text);
        }
    }

    warn!("manifest declares no version, assuming {}", DEFAULT_VERSION);
    Ok(DEFAULT_VERSION)
}

/// Store a version in the document, under the key it was read from.
///
/// Edits happen in place, so comments, key order and formatting of the rest of
/// the file are kept.
pub fn set_version(document: &mut DocumentMut, version: &Version) -> Result<()> {
    let table_name = VERSION_TABLES
        .iter()
        .copied()
        .find(|name| {
            document
                .get(name)
                .and_then(|t| t.get("version"))
                .is_some()
        })
        .unwrap_or(VERSION_TABLES[0]);

    let table = document
        .entry(table_name)
        .or_insert(toml_edit::table())
        .as_table_like_mut()
        .ok_or_else(|| {
            SemanticBranchError::manifest(format!("'{}' is not a table", table_name))
        })?;

    if let Some(Item::Value(existing)) = table.get_mut("version") {
        let decor = existing.decor().clone();
        *existing = Value::from(version.to_string());
        *existing.decor_mut() = decor;
        return Ok(());
    }
    table.insert("version", toml_edit::value(version.to_string()));
    Ok(())
}

/// Rewrite the version in the manifest file, leaving everything else untouched
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let mut document = content.parse::<DocumentMut>().map_err(|e| {
        SemanticBranchError::manifest(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    set_version(&mut document, version)?;
    fs::write(path, document.to_string())?;
    info!("wrote version {} to {}", version, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(text: &str) -> toml::Table {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_read_pyproject_version() {
        let doc = table("[project]\nname = \"demo\"\nversion = \"1.2.3\"\n");
        assert_eq!(read_version(&doc).unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_read_cargo_version() {
        let doc = table("[package]\nname = \"demo\"\nversion = \"0.4.0\"\n");
        assert_eq!(read_version(&doc).unwrap(), Version::new(0, 4, 0));
    }

    #[test]
    fn test_read_missing_version_defaults() {
        let doc = table("[tool.other]\nx = 1\n");
        assert_eq!(read_version(&doc).unwrap(), DEFAULT_VERSION);
    }

    #[test]
    fn test_read_non_string_version_fails() {
        let doc = table("[project]\nversion = 3\n");
        assert!(matches!(
            read_version(&doc),
            Err(SemanticBranchError::Manifest(_))
        ));
    }

    fn editable(text: &str) -> DocumentMut {
        text.parse().unwrap()
    }

    #[test]
    fn test_set_version_keeps_existing_table() {
        let mut doc = editable("[package]\nname = \"demo\"\nversion = \"0.4.0\"\n");
        set_version(&mut doc, &Version::new(0, 5, 0)).unwrap();
        assert_eq!(
            read_version(&table(&doc.to_string())).unwrap(),
            Version::new(0, 5, 0)
        );
        assert!(doc.get("project").is_none());
    }

    #[test]
    fn test_set_version_creates_project_table() {
        let mut doc = editable("[tool.semantic-branch]\nrelease = [\"main\"]\n");
        set_version(&mut doc, &Version::new(1, 0, 0)).unwrap();
        assert_eq!(
            doc.get("project")
                .and_then(|p| p.get("version"))
                .and_then(|v| v.as_str()),
            Some("1.0.0")
        );
    }

    #[test]
    fn test_write_version_round_trips_rules() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pyproject.toml");
        fs::write(
            &path,
            "[project]\nversion = \"1.2.3\"\n\n[tool.semantic-branch]\nminor = [\"feature/.*\"]\n",
        )
        .unwrap();

        write_version(&path, &Version::new(1, 3, 0)).unwrap();

        let written = table(&fs::read_to_string(&path).unwrap());
        assert_eq!(read_version(&written).unwrap(), Version::new(1, 3, 0));
        assert_eq!(
            written
                .get("tool")
                .and_then(|t| t.get("semantic-branch"))
                .and_then(|t| t.get("minor"))
                .and_then(|m| m.get(0))
                .and_then(|v| v.as_str()),
            Some("feature/.*")
        );
    }

    #[test]
    fn test_write_version_preserves_comments_and_table_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cargo.toml");
        let original = "\
# top comment
[package]
name = \"demo\" # inline
version = \"1.2.3\" # bumped by CI

[dependencies]
serde = \"1\"
";
        fs::write(&path, original).unwrap();

        write_version(&path, &Version::new(1, 3, 0)).unwrap();

        let expected = original.replace("\"1.2.3\"", "\"1.3.0\"");
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }
}
