//! Runtime loader.
//!
//! Reads `samp.json` / `samp.yaml` from a directory, overlays `SAMP_*`
//! environment variables, then defaults, resolves plugins, stamps the
//! platform and validates.

use super::env::{EnvSource, ProcessEnv};
use super::overlay::{OverlayReport, overlay};
use super::types::Runtime;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Config file names searched in a runtime directory, in priority order.
pub const CONFIG_FILES: &[&str] = &["samp.json", "samp.yaml", "samp.yml"];

/// On-disk format of a runtime config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "json"),
            ConfigFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Find the config file in `dir`, preferring earlier entries of [`CONFIG_FILES`].
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let mut found = CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file());

    let first = found.next()?;
    for ignored in found {
        warn!(
            "Both {} and {} exist, ignoring {}",
            first.display(),
            ignored.display(),
            ignored.display()
        );
    }
    Some(first)
}

impl Runtime {
    /// Load a runtime from a single config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("unrecognised config file type: {}", path.display()))?;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let runtime: Runtime = match format {
            ConfigFormat::Json => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {} as {}", path.display(), format))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse {} as {}", path.display(), format))?,
        };
        Ok(runtime)
    }

    /// Load the runtime config file from `dir`, or built-in empty values if
    /// there is none.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Ok(read_dir_config(dir)?.0)
    }

    /// Run the full pipeline against the process environment.
    pub fn from_environment(dir: &Path) -> Result<Self> {
        Ok(RuntimeLoader::load(dir)?.into_runtime())
    }

    /// Run the full pipeline against an explicit environment.
    pub fn from_environment_with<E: EnvSource + ?Sized>(dir: &Path, env: &E) -> Result<Self> {
        Ok(RuntimeLoader::load_with_env(dir, env)?.into_runtime())
    }
}

fn read_dir_config(dir: &Path) -> Result<(Runtime, Option<PathBuf>)> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let (mut runtime, config_path) = match find_config_file(dir) {
        Some(path) => {
            info!("Loading runtime config from {}", path.display());
            (Runtime::load(&path)?, Some(path))
        }
        None => {
            debug!(
                "No runtime config found in {}, using built-in defaults",
                dir.display()
            );
            (Runtime::default(), None)
        }
    };
    runtime.working_dir = dir.to_path_buf();
    Ok((runtime, config_path))
}

/// A runtime that went through the whole load pipeline, plus how it got there.
#[derive(Debug, Clone)]
pub struct RuntimeLoader {
    runtime: Runtime,
    /// Config file that was read, if any
    config_path: Option<PathBuf>,
    /// What the environment overlay changed
    report: OverlayReport,
}

impl RuntimeLoader {
    /// Load from `dir` using the process environment.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_with_env(dir, &ProcessEnv)
    }

    /// Load from `dir` using `env` for overrides.
    ///
    /// Order: file, environment, defaults, plugin resolution, platform,
    /// validation. The environment runs before defaults so an explicit
    /// variable always wins over a built-in value.
    pub fn load_with_env<E: EnvSource + ?Sized>(dir: &Path, env: &E) -> Result<Self> {
        let (mut runtime, config_path) = read_dir_config(dir)?;

        let report = overlay(&mut runtime, env);
        if !report.applied.is_empty() {
            info!(
                count = report.applied.len(),
                "Applied environment overrides to runtime config"
            );
        }

        runtime.apply_defaults();
        runtime.resolve_remote_plugins();
        runtime.platform = std::env::consts::OS.to_string();

        runtime
            .validate()
            .context("runtime configuration validation failed")?;

        Ok(Self {
            runtime,
            config_path,
            report,
        })
    }

    /// Get the loaded runtime.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Consume the loader and return the runtime.
    pub fn into_runtime(self) -> Runtime {
        self.runtime
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Get the environment overlay report.
    pub fn report(&self) -> &OverlayReport {
        &self.report
    }
}
