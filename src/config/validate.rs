//! Structural validation of a fully merged runtime.

use super::types::Runtime;
use thiserror::Error;

/// The first constraint a runtime violates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("runtime requires at least one gamemode")]
    NoGamemodes,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("rcon_password cannot be 'changeme', the server refuses to start with it")]
    DefaultRconPassword,

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i32 },

    #[error("stream_distance must be a finite, non-negative number, got {0}")]
    InvalidStreamDistance(f32),
}

fn require<'a, T>(value: &'a Option<T>, field: &'static str) -> Result<&'a T, ValidationError> {
    value.as_ref().ok_or(ValidationError::MissingField(field))
}

fn in_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Runtime {
    /// Check the merged runtime, returning the first violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.gamemodes.is_empty() {
            return Err(ValidationError::NoGamemodes);
        }

        require(&self.echo, "echo")?;
        let rcon_password = require(&self.rcon_password, "rcon_password")?;
        let port = *require(&self.port, "port")?;
        require(&self.hostname, "hostname")?;
        let maxplayers = *require(&self.maxplayers, "maxplayers")?;

        if rcon_password == "changeme" {
            return Err(ValidationError::DefaultRconPassword);
        }

        in_range("port", port, 1, 65535)?;
        in_range("maxplayers", maxplayers, 1, 1000)?;

        if let Some(distance) = self.stream_distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(ValidationError::InvalidStreamDistance(distance));
            }
        }

        if let Some(mode) = self.lagcompmode {
            in_range("lagcompmode", mode, 0, 2)?;
        }

        let non_negative = [
            ("sleep", self.sleep),
            ("maxnpc", self.maxnpc),
            ("stream_rate", self.stream_rate),
            ("onfoot_rate", self.onfoot_rate),
            ("incar_rate", self.incar_rate),
            ("weapon_rate", self.weapon_rate),
            ("messageholelimit", self.messageholelimit),
            ("messageslimit", self.messageslimit),
            ("ackslimit", self.ackslimit),
            ("playertimeout", self.playertimeout),
            ("minconnectiontime", self.minconnectiontime),
            ("connseedtime", self.connseedtime),
        ];
        for (field, value) in non_negative {
            if let Some(value) = value {
                if value < 0 {
                    return Err(ValidationError::Negative { field, value });
                }
            }
        }

        Ok(())
    }
}
