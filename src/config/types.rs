//! Runtime configuration types.
//!
//! [`Runtime`] mirrors the keys of `samp.json` / `samp.yaml`. Every scalar is
//! optional so "not provided" survives until defaults are applied.

use super::overlay::{Field, FieldTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A plugin entry: either a local plugin name or a remote dependency string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plugin(String);

impl Plugin {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Plugin {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a remote plugin should be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PluginVersion {
    Latest,
    Tag(String),
    Branch(String),
    Commit(String),
}

/// A fully expanded remote plugin reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDependency {
    pub user: String,
    pub repo: String,
    pub version: PluginVersion,
}

/// SA-MP server runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Runtime {
    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub working_dir: PathBuf,

    /// Host operating system, stamped after loading.
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty")]
    pub platform: String,

    /// Remote plugins expanded from `plugins`.
    #[serde(skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub plugin_deps: Vec<PluginDependency>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gamemodes: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filterscripts: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rcon_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxplayers: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weburl: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gamemodetext: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub announce: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lanmode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rcon: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logqueries: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxnpc: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_rate: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_distance: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub onfoot_rate: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incar_rate: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_rate: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatlogging: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logtimeformat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub messageholelimit: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub messageslimit: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ackslimit: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub playertimeout: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minconnectiontime: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lagcompmode: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connseedtime: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_logging: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_log_queries: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conncookies: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookielogging: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<bool>,
}

impl FieldTable for Runtime {
    // Keys must match the serde names above; see test_field_table_matches_serde_keys.
    fn field_table(&mut self) -> Vec<Field<'_>> {
        let rt = self;
        crate::field_table!(rt {
            version: Text => "version",
            echo: Text => "echo",
            gamemodes: StringList => "gamemodes",
            filterscripts: StringList => "filterscripts",
            plugins: PluginList => "plugins",
            rcon_password: Text => "rcon_password",
            port: Integer => "port",
            hostname: Text => "hostname",
            maxplayers: Integer => "maxplayers",
            language: Text => "language",
            mapname: Text => "mapname",
            weburl: Text => "weburl",
            gamemodetext: Text => "gamemodetext",
            bind: Text => "bind",
            password: Text => "password",
            announce: Flag => "announce",
            lanmode: Flag => "lanmode",
            query: Flag => "query",
            rcon: Flag => "rcon",
            logqueries: Flag => "logqueries",
            sleep: Integer => "sleep",
            maxnpc: Integer => "maxnpc",
            stream_rate: Integer => "stream_rate",
            stream_distance: Float => "stream_distance",
            onfoot_rate: Integer => "onfoot_rate",
            incar_rate: Integer => "incar_rate",
            weapon_rate: Integer => "weapon_rate",
            chatlogging: Flag => "chatlogging",
            timestamp: Flag => "timestamp",
            logtimeformat: Text => "logtimeformat",
            messageholelimit: Integer => "messageholelimit",
            messageslimit: Integer => "messageslimit",
            ackslimit: Integer => "ackslimit",
            playertimeout: Integer => "playertimeout",
            minconnectiontime: Integer => "minconnectiontime",
            lagcompmode: Integer => "lagcompmode",
            connseedtime: Integer => "connseedtime",
            db_logging: Flag => "db_logging",
            db_log_queries: Flag => "db_log_queries",
            conncookies: Flag => "conncookies",
            cookielogging: Flag => "cookielogging",
            output: Flag => "output",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldKind, describe};
    use serde_json::Value;

    #[test]
    fn test_field_table_matches_serde_keys() {
        let mut rt = Runtime::default();
        rt.apply_defaults();
        rt.gamemodes = vec!["grandlarc".into()];
        rt.filterscripts = vec!["admin".into()];
        rt.plugins = vec![Plugin::from("streamer")];
        rt.bind = Some("0.0.0.0".into());
        rt.password = Some("secret".into());

        let json = serde_json::to_value(&rt).unwrap();
        let Value::Object(map) = json else {
            panic!("runtime should serialize to an object");
        };

        let keys: Vec<&str> = rt
            .field_table()
            .iter()
            .filter_map(|f| f.key)
            .collect();
        for key in &keys {
            assert!(map.contains_key(*key), "no serde key for {}", key);
        }
        // Everything serialized is in the table, apart from the derived fields.
        for key in map.keys() {
            if key == "platform" || key == "plugin_deps" {
                continue;
            }
            assert!(keys.contains(&key.as_str()), "{} missing from field table", key);
        }
    }

    #[test]
    fn test_runtime_table_uses_only_supported_kinds() {
        let mut rt = Runtime::default();
        for field in describe(&mut rt) {
            assert!(
                !matches!(field.kind, FieldKind::Unsupported(_)),
                "{} is unsupported",
                field.field
            );
        }
    }

    #[test]
    fn test_deserialize_partial_json() {
        let rt: Runtime = serde_json::from_str(
            r#"{
                "gamemodes": ["rivershell"],
                "plugins": ["streamer", "pawn-lang/samp-stdlib:0.3.7"],
                "port": 7777,
                "announce": true,
                "stream_distance": 300.5
            }"#,
        )
        .unwrap();
        assert_eq!(rt.gamemodes, vec!["rivershell".to_string()]);
        assert_eq!(rt.plugins.len(), 2);
        assert_eq!(rt.plugins[1].as_str(), "pawn-lang/samp-stdlib:0.3.7");
        assert_eq!(rt.port, Some(7777));
        assert_eq!(rt.announce, Some(true));
        assert_eq!(rt.stream_distance, Some(300.5));
        assert_eq!(rt.hostname, None);
    }

    #[test]
    fn test_platform_is_not_read_from_file() {
        let rt: Runtime = serde_json::from_str(r#"{"platform": "plan9"}"#).unwrap();
        assert!(rt.platform.is_empty());
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let json = serde_json::to_value(Runtime::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
