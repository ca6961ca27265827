//! Registry URL and credential lookup from `.npmrc` files.
//!
//! Only the keys that matter for reading package metadata are understood:
//! `registry`, `//host/path/:_authToken`, `//host/path/:_auth`, and the bare
//! `_authToken` / `_auth` fallbacks. `${VAR}` references are expanded from the
//! environment.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use super::Auth;

const LOG_TARGET: &str = "thanks::npmrc";
const NPMRC: &str = ".npmrc";

#[derive(Debug, Default, Clone)]
pub struct Npmrc {
    pub registry: Option<String>,
    /// Keyed by `host/path/` without the leading `//`.
    scoped_auth: HashMap<String, Auth>,
    default_auth: Option<Auth>,
}

impl Npmrc {
    /// Read `~/.npmrc`, then the `.npmrc` closest to `project_root`. The
    /// project file takes precedence; files further up are ignored.
    pub fn load(project_root: &Path) -> Self {
        Self::load_from(dirs::home_dir().as_deref(), project_root)
    }

    fn load_from(home: Option<&Path>, project_root: &Path) -> Self {
        let user_file = home.map(|dir| dir.join(NPMRC));
        let project_file = project_root
            .ancestors()
            .map(|dir| dir.join(NPMRC))
            .find(|path| path.is_file())
            .filter(|path| Some(path) != user_file.as_ref());

        let mut rc = Npmrc::default();
        for path in user_file.iter().chain(project_file.iter()) {
            if !path.is_file() {
                continue;
            }
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    log::debug!(target: LOG_TARGET, "Reading {}", path.display());
                    rc.apply(&content);
                }
                Err(err) => log::debug!(target: LOG_TARGET, "Skipping {}: {}", path.display(), err),
            }
        }
        rc
    }

    #[cfg(test)]
    pub fn parse(content: &str) -> Self {
        let mut rc = Npmrc::default();
        rc.apply(content);
        rc
    }

    fn apply(&mut self, content: &str) {
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = expand_env_vars(value.trim().trim_matches('"'));
            if value.is_empty() {
                continue;
            }

            if key == "registry" {
                self.registry = Some(value);
            } else if key == "_authToken" {
                self.default_auth = Some(Auth::Bearer(value));
            } else if key == "_auth" {
                self.default_auth = Some(Auth::Basic(value));
            } else if let Some(rest) = key.strip_prefix("//") {
                if let Some(prefix) = rest.strip_suffix(":_authToken") {
                    self.scoped_auth
                        .insert(normalize_key(prefix), Auth::Bearer(value));
                } else if let Some(prefix) = rest.strip_suffix(":_auth") {
                    self.scoped_auth.insert(normalize_key(prefix), Auth::Basic(value));
                }
            }
        }
    }

    /// Credential for `registry_url`: the longest matching `//host/path/`
    /// entry, falling back to the bare `_authToken` / `_auth`.
    pub fn auth_for(&self, registry_url: &str) -> Option<Auth> {
        let without_scheme = registry_url
            .strip_prefix("https://")
            .or_else(|| registry_url.strip_prefix("http://"))
            .unwrap_or(registry_url);

        let mut candidate = normalize_key(without_scheme);
        loop {
            if let Some(auth) = self.scoped_auth.get(&candidate) {
                return Some(auth.clone());
            }
            // Drop the last path segment: "host/a/b/" -> "host/a/"
            let trimmed = candidate.trim_end_matches('/');
            match trimmed.rfind('/') {
                Some(idx) => candidate = trimmed[..=idx].to_string(),
                None => break,
            }
        }

        self.default_auth.clone()
    }
}

/// Lowercase host, always a trailing `/`.
fn normalize_key(host_and_path: &str) -> String {
    let (host, path) = host_and_path
        .split_once('/')
        .unwrap_or((host_and_path, ""));
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        format!("{}/", host.to_ascii_lowercase())
    } else {
        format!("{}/{}/", host.to_ascii_lowercase(), path)
    }
}

fn expand_env_vars(text: &str) -> String {
    let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_default()
    })
    .into_owned()
}
