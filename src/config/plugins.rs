//! Remote plugin resolution.
//!
//! A plugin entry such as `samp-incognito/samp-streamer-plugin:2.9.4` names a
//! repository to fetch; a bare name such as `streamer` is a local plugin.

use super::types::{Plugin, PluginDependency, PluginVersion, Runtime};
use regex_lite::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginParseError {
    #[error("'{0}' is a local plugin, not a dependency string")]
    Local(String),

    #[error("'{0}' is not a valid dependency string (expected user/repo[:tag|@branch|#commit])")]
    Malformed(String),
}

fn dependency_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:https?://)?(?:github\.com/)?([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:([:@#])(.+))?$",
        )
        .expect("dependency pattern is valid")
    })
}

impl Plugin {
    /// Parse this entry as a remote dependency.
    pub fn as_dependency(&self) -> Result<PluginDependency, PluginParseError> {
        let raw = self.as_str().trim();
        if !raw.contains('/') {
            return Err(PluginParseError::Local(raw.to_string()));
        }

        let caps = dependency_pattern()
            .captures(raw)
            .ok_or_else(|| PluginParseError::Malformed(raw.to_string()))?;

        let version = match (caps.get(3).map(|m| m.as_str()), caps.get(4)) {
            (Some(":"), Some(v)) => PluginVersion::Tag(v.as_str().to_string()),
            (Some("@"), Some(v)) => PluginVersion::Branch(v.as_str().to_string()),
            (Some("#"), Some(v)) => PluginVersion::Commit(v.as_str().to_string()),
            _ => PluginVersion::Latest,
        };

        Ok(PluginDependency {
            user: caps[1].to_string(),
            repo: caps[2].to_string(),
            version,
        })
    }
}

impl Runtime {
    /// Expand remote plugin entries into `plugin_deps`.
    ///
    /// `plugin_deps` is rebuilt from scratch so repeated calls agree. Local
    /// plugins and unparseable entries are left to the server to resolve.
    pub fn resolve_remote_plugins(&mut self) {
        self.plugin_deps.clear();
        for plugin in &self.plugins {
            match plugin.as_dependency() {
                Ok(dep) => self.plugin_deps.push(dep),
                Err(e) => debug!(plugin = %plugin, "not a remote plugin: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(s: &str) -> PluginDependency {
        Plugin::from(s).as_dependency().unwrap()
    }

    #[test]
    fn test_parse_tagged_dependency() {
        let d = dep("samp-incognito/samp-streamer-plugin:2.9.4");
        assert_eq!(d.user, "samp-incognito");
        assert_eq!(d.repo, "samp-streamer-plugin");
        assert_eq!(d.version, PluginVersion::Tag("2.9.4".into()));
    }

    #[test]
    fn test_parse_branch_and_commit() {
        assert_eq!(
            dep("pawn-lang/YSI-Includes@5.x").version,
            PluginVersion::Branch("5.x".into())
        );
        assert_eq!(
            dep("pawn-lang/YSI-Includes#a1b2c3d").version,
            PluginVersion::Commit("a1b2c3d".into())
        );
    }

    #[test]
    fn test_parse_url_form() {
        let d = dep("https://github.com/maddinat0r/sa-mp-mysql.git");
        assert_eq!(d.user, "maddinat0r");
        assert_eq!(d.repo, "sa-mp-mysql");
        assert_eq!(d.version, PluginVersion::Latest);
    }

    #[test]
    fn test_local_and_malformed_entries() {
        assert_eq!(
            Plugin::from("streamer").as_dependency(),
            Err(PluginParseError::Local("streamer".into()))
        );
        assert!(matches!(
            Plugin::from("a/b/c").as_dependency(),
            Err(PluginParseError::Malformed(_))
        ));
    }

    #[test]
    fn test_resolve_remote_plugins_is_idempotent() {
        let mut rt = Runtime {
            plugins: vec![
                Plugin::from("streamer"),
                Plugin::from("Zeex/samp-plugin-crashdetect:v4.19.4"),
            ],
            ..Default::default()
        };
        rt.resolve_remote_plugins();
        rt.resolve_remote_plugins();
        assert_eq!(rt.plugin_deps.len(), 1);
        assert_eq!(rt.plugin_deps[0].repo, "samp-plugin-crashdetect");
        assert_eq!(rt.plugins.len(), 2);
    }
}
