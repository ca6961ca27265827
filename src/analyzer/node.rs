use std::path::{Path, PathBuf};

use anyhow::Result;
use indexmap::IndexSet;
use serde_json::Value;

use crate::error::SetupError;
use crate::models::Project;
use crate::progress::{Phase, Progress};

const LOG_TARGET: &str = "thanks::analyzer";

const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "devDependencies", "optionalDependencies"];

pub struct NodeAnalyzer;

impl NodeAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for NodeAnalyzer {
    fn analyze(&self, path: &Path, progress: &dyn Progress) -> Result<Project> {
        progress.phase(Phase::ReadingManifest);
        let manifest = find_manifest(path).ok_or_else(|| SetupError::ManifestMissing {
            path: path.to_path_buf(),
        })?;
        let direct = read_direct_names(&manifest)?;

        // `find_manifest` only returns paths that have a parent
        let root = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.to_path_buf());

        progress.phase(Phase::ReadingTree);
        let installed = read_installed_names(&root)?;
        if installed.is_empty() {
            return Err(SetupError::NoPackages {
                path: root.join("node_modules"),
            }
            .into());
        }

        log::debug!(
            target: LOG_TARGET,
            "{} direct and {} installed packages under {}",
            direct.len(),
            installed.len(),
            root.display()
        );

        Ok(Project {
            root,
            direct,
            installed,
        })
    }
}

/// Walk up from `start` to the nearest directory holding a `package.json`.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("package.json"))
        .find(|candidate| candidate.is_file())
}

/// Direct dependency names, in manifest order, across all three sections.
fn read_direct_names(manifest: &Path) -> Result<IndexSet<String>, SetupError> {
    let content = std::fs::read_to_string(manifest).map_err(|source| SetupError::ReadFile {
        path: manifest.to_path_buf(),
        source,
    })?;
    let json: Value =
        serde_json::from_str(&content).map_err(|source| SetupError::ManifestInvalid {
            path: manifest.to_path_buf(),
            source,
        })?;

    let mut names = IndexSet::new();
    for section in DEPENDENCY_SECTIONS {
        if let Some(deps) = json.get(section).and_then(|v| v.as_object()) {
            names.extend(deps.keys().cloned());
        }
    }

    Ok(names)
}

/// Names of the packages installed one level deep in `node_modules`.
///
/// Scope folders (`@scope`) are descended into once. Folders without a
/// readable `package.json` name are skipped.
fn read_installed_names(root: &Path) -> Result<Vec<String>, SetupError> {
    let node_modules = root.join("node_modules");
    if !node_modules.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in sorted_dirs(&node_modules)? {
        let is_scope = entry
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('@'));

        if is_scope {
            for scoped in sorted_dirs(&entry)? {
                names.extend(read_package_name(&scoped));
            }
        } else {
            names.extend(read_package_name(&entry));
        }
    }

    Ok(names)
}

/// Visible child directories of `dir`, sorted by file name.
fn sorted_dirs(dir: &Path) -> Result<Vec<PathBuf>, SetupError> {
    let entries = std::fs::read_dir(dir).map_err(|source| SetupError::ReadFile {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    Ok(dirs)
}

fn read_package_name(dir: &Path) -> Option<String> {
    let manifest = dir.join("package.json");
    let content = std::fs::read_to_string(&manifest).ok()?;
    let json: Value = match serde_json::from_str(&content) {
        Ok(json) => json,
        Err(err) => {
            log::debug!(target: LOG_TARGET, "Skipping {}: {}", manifest.display(), err);
            return None;
        }
    };
    json.get("name")
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::progress::Silent;
    use std::fs;
    use tempfile::TempDir;

    fn write_package(dir: &Path, json: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("package.json"), json).unwrap();
    }

    #[test]
    fn test_read_direct_names_all_sections() {
        let tmp = TempDir::new().unwrap();
        write_package(
            tmp.path(),
            r#"{
  "name": "my-app",
  "dependencies": { "express": "^4.18.2", "lodash": "^4.17.21" },
  "devDependencies": { "mocha": "^10.0.0" },
  "optionalDependencies": { "fsevents": "^2.0.0" },
  "peerDependencies": { "react": "^18.0.0" }
}"#,
        );
        let names = read_direct_names(&tmp.path().join("package.json")).unwrap();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["express", "lodash", "mocha", "fsevents"]);
    }

    #[test]
    fn test_non_object_section_is_ignored() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), r#"{ "dependencies": "nope", "devDependencies": { "chai": "*" } }"#);
        let names = read_direct_names(&tmp.path().join("package.json")).unwrap();
        assert_eq!(names.len(), 1);
        assert!(names.contains("chai"));
    }

    #[test]
    fn test_malformed_manifest_is_fatal() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "{ not json");
        let err = read_direct_names(&tmp.path().join("package.json")).unwrap_err();
        assert!(matches!(err, SetupError::ManifestInvalid { .. }));
    }

    #[test]
    fn test_find_manifest_walks_up() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), "{}");
        let nested = tmp.path().join("src").join("lib");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_manifest(&nested), Some(tmp.path().join("package.json")));
    }

    #[test]
    fn test_installed_names_include_scopes_and_skip_nameless() {
        let tmp = TempDir::new().unwrap();
        let nm = tmp.path().join("node_modules");
        write_package(&nm.join("left-pad"), r#"{ "name": "left-pad" }"#);
        write_package(&nm.join("@scope").join("foo"), r#"{ "name": "@scope/foo" }"#);
        fs::create_dir_all(nm.join("empty-folder")).unwrap();
        write_package(&nm.join("no-name"), r#"{ "version": "1.0.0" }"#);
        fs::create_dir_all(nm.join(".bin")).unwrap();

        let names = read_installed_names(tmp.path()).unwrap();
        assert_eq!(names, vec!["@scope/foo", "left-pad"]);
    }

    #[test]
    fn test_analyze_without_node_modules_fails() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), r#"{ "dependencies": { "a": "1" } }"#);
        let err = NodeAnalyzer::new().analyze(tmp.path(), &Silent).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::NoPackages { .. })
        ));
    }

    #[test]
    fn test_analyze_reads_project() {
        let tmp = TempDir::new().unwrap();
        write_package(tmp.path(), r#"{ "dependencies": { "left-pad": "1" } }"#);
        write_package(&tmp.path().join("node_modules").join("left-pad"), r#"{ "name": "left-pad" }"#);

        let project = NodeAnalyzer::new().analyze(tmp.path(), &Silent).unwrap();
        assert_eq!(project.root, tmp.path());
        assert!(project.direct.contains("left-pad"));
        assert_eq!(project.installed, vec!["left-pad"]);
    }
}
