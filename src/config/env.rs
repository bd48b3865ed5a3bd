//! Environment lookup and variable naming.
//!
//! The overlay never touches `std::env` directly; it asks an [`EnvSource`].
//! [`ProcessEnv`] reads the live process environment, [`EnvSnapshot`] freezes
//! the relevant part of it, and plain maps work for tests.

use std::collections::{BTreeMap, HashMap};
use std::env::VarError;
use std::ffi::OsString;

/// Prefix shared by every runtime override variable.
pub const ENV_PREFIX: &str = "SAMP_";

/// Derive the override variable name for a serialization key.
///
/// Only the first comma-delimited segment counts, so modifiers such as
/// `omitempty` are ignored.
///
/// ```
/// use samp_runtime_env::config::derive_name;
///
/// assert_eq!(derive_name("host,omitempty"), "SAMP_HOST");
/// assert_eq!(derive_name("rcon_password"), "SAMP_RCON_PASSWORD");
/// ```
pub fn derive_name(serialization_key: &str) -> String {
    let segment = serialization_key
        .split(',')
        .next()
        .unwrap_or(serialization_key);
    format!("{}{}", ENV_PREFIX, segment.to_uppercase())
}

/// Read-only, case-sensitive lookup of environment variables by name.
///
/// Mirrors [`std::env::var`]: a variable that is set but not valid unicode
/// is reported as [`VarError::NotUnicode`] rather than treated as absent.
pub trait EnvSource {
    fn lookup(&self, name: &str) -> Result<String, VarError>;
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, name: &str) -> Result<String, VarError> {
        std::env::var(name)
    }
}

/// A frozen copy of every `SAMP_*` variable.
///
/// Overlaying from a snapshot gives consistent results even if another thread
/// mutates the environment mid-merge. Values are kept as raw `OsString`s so a
/// non-unicode value still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, OsString>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        // A non-unicode key can never equal a derived variable name.
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value))),
        )
    }

    /// Build a snapshot from arbitrary key/value pairs, keeping only `SAMP_*`.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<OsString>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        Self { vars }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for EnvSnapshot {
    fn lookup(&self, name: &str) -> Result<String, VarError> {
        let value = self.vars.get(name).ok_or(VarError::NotPresent)?;
        value.clone().into_string().map_err(VarError::NotUnicode)
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Result<String, VarError> {
        self.get(name).cloned().ok_or(VarError::NotPresent)
    }
}

impl EnvSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Result<String, VarError> {
        self.get(name).cloned().ok_or(VarError::NotPresent)
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn lookup(&self, name: &str) -> Result<String, VarError> {
        (**self).lookup(name)
    }
}
