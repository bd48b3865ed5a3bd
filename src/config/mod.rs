//! Runtime configuration.
//!
//! A runtime is loaded in tiers, highest priority first:
//! 1. **Environment** - `SAMP_<KEY>` variables, one per scalar field
//! 2. **File** - `samp.json` or `samp.yaml` in the runtime directory
//! 3. **Defaults** - built in, applied only to fields still unset
//!
//! ## Environment Variables
//! The variable name is `SAMP_` followed by the upper-cased serialization key:
//! - `SAMP_HOSTNAME` - Server name
//! - `SAMP_PORT` - Listen port (integer)
//! - `SAMP_ANNOUNCE` - Announce to the master list (boolean)
//! - `SAMP_STREAM_DISTANCE` - Streaming distance (float)
//!
//! Lists (`gamemodes`, `filterscripts`, `plugins`) can only come from the file.

mod defaults;
mod env;
mod loader;
mod overlay;
mod plugins;
mod types;
mod validate;

pub use defaults::*;
pub use env::{ENV_PREFIX, EnvSnapshot, EnvSource, ProcessEnv, derive_name};
pub use loader::{CONFIG_FILES, ConfigFormat, RuntimeLoader, find_config_file};
pub use overlay::{
    AppliedOverride, Field, FieldDescriptor, FieldKind, FieldSlot, FieldTable, FlagParseError,
    OverlayReport, OverlayWarning, describe, overlay, parse_flag,
};
pub use plugins::PluginParseError;
pub use types::*;
pub use validate::ValidationError;
