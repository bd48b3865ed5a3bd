//! Typed environment overlay.
//!
//! A record exposes its settable fields through [`FieldTable`]: one [`Field`]
//! per field, pairing the serialization key with a typed mutable slot. The
//! [`overlay`] routine walks that table, derives each variable name, and
//! writes parsed values over whatever the file (or defaults) put there.
//!
//! Malformed values are logged and skipped. A field whose kind the overlay
//! does not understand is a schema defect and panics.

use super::env::{EnvSource, derive_name};
use super::types::Plugin;
use std::env::VarError;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Typed mutable access to one field of a record.
#[derive(Debug)]
pub enum FieldSlot<'a> {
    Text(&'a mut Option<String>),
    Flag(&'a mut Option<bool>),
    Integer(&'a mut Option<i32>),
    Float(&'a mut Option<f32>),
    /// File-only; the overlay warns instead of parsing.
    StringList(&'a mut Vec<String>),
    /// File-only; the overlay warns instead of parsing.
    PluginList(&'a mut Vec<Plugin>),
    /// A field of some other type, named by the string.
    Unsupported(&'static str),
}

impl FieldSlot<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSlot::Text(_) => FieldKind::Text,
            FieldSlot::Flag(_) => FieldKind::Flag,
            FieldSlot::Integer(_) => FieldKind::Integer,
            FieldSlot::Float(_) => FieldKind::Float,
            FieldSlot::StringList(_) => FieldKind::StringList,
            FieldSlot::PluginList(_) => FieldKind::PluginList,
            FieldSlot::Unsupported(type_name) => FieldKind::Unsupported(*type_name),
        }
    }

    /// Render the current value, or `None` when unset or empty.
    fn current(&self) -> Option<String> {
        match self {
            FieldSlot::Text(v) => (**v).clone(),
            FieldSlot::Flag(v) => v.map(|b| b.to_string()),
            FieldSlot::Integer(v) => v.map(|i| i.to_string()),
            FieldSlot::Float(v) => v.map(|f| f.to_string()),
            FieldSlot::StringList(v) if !v.is_empty() => Some(v.join(",")),
            FieldSlot::PluginList(v) if !v.is_empty() => Some(
                v.iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }
}

/// Declared kind of a field, as reported by [`describe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    Integer,
    Float,
    StringList,
    PluginList,
    Unsupported(&'static str),
}

impl FieldKind {
    /// Whether the field distinguishes "unset" from a value.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Flag | FieldKind::Integer | FieldKind::Float
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "string"),
            FieldKind::Flag => write!(f, "boolean"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::StringList => write!(f, "string list"),
            FieldKind::PluginList => write!(f, "plugin list"),
            FieldKind::Unsupported(type_name) => write!(f, "unsupported ({})", type_name),
        }
    }
}

/// One entry of a record's field table.
#[derive(Debug)]
pub struct Field<'a> {
    /// Rust field name, used in diagnostics.
    pub ident: &'static str,
    /// Serialization key; fields without one are never overlaid.
    pub key: Option<&'static str>,
    pub slot: FieldSlot<'a>,
}

impl<'a> Field<'a> {
    pub fn new(ident: &'static str, key: &'static str, slot: FieldSlot<'a>) -> Self {
        Self {
            ident,
            key: Some(key),
            slot,
        }
    }

    /// A field that is not serialized and therefore has no variable.
    #[cfg(test)]
    pub(crate) fn unkeyed(ident: &'static str, slot: FieldSlot<'a>) -> Self {
        Self {
            ident,
            key: None,
            slot,
        }
    }
}

/// Records that can be overlaid from the environment.
///
/// Implementations list every settable field in declaration order, usually
/// through [`field_table!`](crate::field_table).
pub trait FieldTable {
    fn field_table(&mut self) -> Vec<Field<'_>>;
}

/// Build a field table from `field: Kind => "key"` entries.
///
/// `Kind` is a [`FieldSlot`] variant name. The record must be a local binding
/// holding `&mut Record`.
///
/// ```ignore
/// let rt = self;
/// field_table!(rt {
///     hostname: Text => "hostname",
///     port: Integer => "port",
/// })
/// ```
#[macro_export]
macro_rules! field_table {
    ($record:ident { $($field:ident: $kind:ident => $key:literal),* $(,)? }) => {
        vec![$(
            $crate::config::Field::new(
                stringify!($field),
                $key,
                $crate::config::FieldSlot::$kind(&mut $record.$field),
            )
        ),*]
    };
}

/// Static description of one field, computed fresh on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub field: &'static str,
    /// Override variable, `None` for unkeyed fields.
    pub variable: Option<String>,
    pub kind: FieldKind,
    pub optional: bool,
    pub current: Option<String>,
}

/// Describe every field of `record` without modifying it.
pub fn describe<R: FieldTable + ?Sized>(record: &mut R) -> Vec<FieldDescriptor> {
    record
        .field_table()
        .into_iter()
        .map(|field| {
            let kind = field.slot.kind();
            FieldDescriptor {
                field: field.ident,
                variable: field.key.map(derive_name),
                kind,
                optional: kind.is_optional(),
                current: field.slot.current(),
            }
        })
        .collect()
}

/// A field that was overwritten from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOverride {
    pub field: &'static str,
    pub variable: String,
    /// The field held no value before the override.
    pub was_unset: bool,
}

/// A recoverable problem found while overlaying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayWarning {
    #[error("cannot set {key} via environment variables yet ({variable} ignored)")]
    NotYetSupported {
        field: &'static str,
        key: &'static str,
        variable: String,
    },

    #[error(
        "environment variable {variable} ({field}): could not interpret value '{value}' as {expected}: {reason}"
    )]
    Malformed {
        field: &'static str,
        variable: String,
        value: String,
        expected: FieldKind,
        reason: String,
    },
}

impl OverlayWarning {
    pub fn field(&self) -> &'static str {
        match self {
            OverlayWarning::NotYetSupported { field, .. }
            | OverlayWarning::Malformed { field, .. } => *field,
        }
    }
}

/// What one overlay pass did. Informational only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayReport {
    pub applied: Vec<AppliedOverride>,
    pub warnings: Vec<OverlayWarning>,
}

impl OverlayReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings_for(&self, field: &str) -> impl Iterator<Item = &OverlayWarning> {
        self.warnings.iter().filter(move |w| w.field() == field)
    }
}

/// Error returned by [`parse_flag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid boolean '{0}', expected true/false, t/f, 1/0, yes/no, y/n or on/off")]
pub struct FlagParseError(pub String);

/// Parse a boolean token. ASCII case-insensitive.
pub fn parse_flag(raw: &str) -> Result<bool, FlagParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
        _ => Err(FlagParseError(raw.to_string())),
    }
}

/// Parse as 64-bit, then narrow. Finite values beyond `f32` range are rejected.
fn parse_float(raw: &str) -> Result<f32, String> {
    let wide: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    let narrow = wide as f32;
    if wide.is_finite() && narrow.is_infinite() {
        return Err(format!("{} is out of range for a 32-bit float", wide));
    }
    Ok(narrow)
}

fn unsupported_kind(ident: &str, type_name: &str) -> ! {
    panic!(
        "unknown kind '{}' for field '{}': the environment overlay cannot set this type",
        type_name, ident
    )
}

enum Rejection {
    NotYetSupported,
    Malformed { expected: FieldKind, reason: String },
}

fn malformed(expected: FieldKind, reason: impl fmt::Display) -> Rejection {
    Rejection::Malformed {
        expected,
        reason: reason.to_string(),
    }
}

/// Store `value`, allocating the slot if it was unset. Returns whether it was.
fn store<T>(slot: &mut Option<T>, value: T) -> bool {
    match slot {
        Some(current) => {
            *current = value;
            false
        }
        None => {
            *slot = Some(value);
            true
        }
    }
}

fn apply(ident: &str, slot: FieldSlot<'_>, raw: &str) -> Result<bool, Rejection> {
    match slot {
        FieldSlot::Text(v) => Ok(store(v, raw.to_string())),
        FieldSlot::StringList(_) | FieldSlot::PluginList(_) => Err(Rejection::NotYetSupported),
        FieldSlot::Flag(v) => {
            let parsed = parse_flag(raw).map_err(|e| malformed(FieldKind::Flag, e))?;
            Ok(store(v, parsed))
        }
        FieldSlot::Integer(v) => {
            let parsed = raw
                .parse::<i32>()
                .map_err(|e| malformed(FieldKind::Integer, e))?;
            Ok(store(v, parsed))
        }
        FieldSlot::Float(v) => {
            let parsed = parse_float(raw).map_err(|e| malformed(FieldKind::Float, e))?;
            Ok(store(v, parsed))
        }
        FieldSlot::Unsupported(type_name) => unsupported_kind(ident, type_name),
    }
}

/// Overlay environment values onto `record`, in field declaration order.
///
/// Absent variables leave their field untouched. Unparseable or non-unicode
/// values are logged with `warn!`, recorded in the report, and skipped.
///
/// # Panics
///
/// If the record declares a [`FieldSlot::Unsupported`] field with a
/// serialization key, whether or not its variable is set.
pub fn overlay<R, E>(record: &mut R, env: &E) -> OverlayReport
where
    R: FieldTable + ?Sized,
    E: EnvSource + ?Sized,
{
    let mut report = OverlayReport::default();

    for field in record.field_table() {
        let Some(key) = field.key else {
            continue;
        };
        let variable = derive_name(key);

        if let FieldSlot::Unsupported(type_name) = field.slot {
            unsupported_kind(field.ident, type_name);
        }

        let raw = match env.lookup(&variable) {
            Ok(raw) => raw,
            Err(VarError::NotPresent) => continue,
            Err(VarError::NotUnicode(value)) => {
                let warning = OverlayWarning::Malformed {
                    field: field.ident,
                    variable,
                    value: value.to_string_lossy().into_owned(),
                    expected: field.slot.kind(),
                    reason: "value is not valid unicode".to_string(),
                };
                warn!(field = field.ident, "{}", warning);
                report.warnings.push(warning);
                continue;
            }
        };

        match apply(field.ident, field.slot, &raw) {
            Ok(was_unset) => {
                debug!(field = field.ident, variable = %variable, was_unset, "applied environment override");
                report.applied.push(AppliedOverride {
                    field: field.ident,
                    variable,
                    was_unset,
                });
            }
            Err(rejection) => {
                let warning = match rejection {
                    Rejection::NotYetSupported => OverlayWarning::NotYetSupported {
                        field: field.ident,
                        key,
                        variable,
                    },
                    Rejection::Malformed { expected, reason } => OverlayWarning::Malformed {
                        field: field.ident,
                        variable,
                        value: raw,
                        expected,
                        reason,
                    },
                };
                warn!(field = field.ident, "{}", warning);
                report.warnings.push(warning);
            }
        }
    }

    report
}
