//! Built-in runtime defaults.
//!
//! Defaults only fill fields that are still unset after the file and the
//! environment have been merged.

use super::types::Runtime;

pub const DEFAULT_VERSION: &str = "0.3.7";
pub const DEFAULT_RCON_PASSWORD: &str = "password";
pub const DEFAULT_PORT: i32 = 8192;
pub const DEFAULT_HOSTNAME: &str = "SA-MP Server";
pub const DEFAULT_MAXPLAYERS: i32 = 50;
pub const DEFAULT_STREAM_DISTANCE: f32 = 200.0;
pub const DEFAULT_LOG_TIME_FORMAT: &str = "[%H:%M:%S]";

fn fill<T>(slot: &mut Option<T>, value: T) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn fill_str(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

impl Runtime {
    /// Fill every unset field with its built-in default.
    ///
    /// `bind` and `password` have no default: unset means "all interfaces"
    /// and "no join password".
    pub fn apply_defaults(&mut self) {
        fill_str(&mut self.version, DEFAULT_VERSION);
        fill_str(&mut self.echo, "-");
        fill_str(&mut self.rcon_password, DEFAULT_RCON_PASSWORD);
        fill(&mut self.port, DEFAULT_PORT);
        fill_str(&mut self.hostname, DEFAULT_HOSTNAME);
        fill(&mut self.maxplayers, DEFAULT_MAXPLAYERS);
        fill_str(&mut self.language, "-");
        fill_str(&mut self.mapname, "San Andreas");
        fill_str(&mut self.weburl, "www.sa-mp.com");
        fill_str(&mut self.gamemodetext, "Unknown");

        fill(&mut self.announce, false);
        fill(&mut self.lanmode, false);
        fill(&mut self.query, true);
        fill(&mut self.rcon, false);
        fill(&mut self.logqueries, false);

        fill(&mut self.sleep, 5);
        fill(&mut self.maxnpc, 0);
        fill(&mut self.stream_rate, 1000);
        fill(&mut self.stream_distance, DEFAULT_STREAM_DISTANCE);
        fill(&mut self.onfoot_rate, 40);
        fill(&mut self.incar_rate, 40);
        fill(&mut self.weapon_rate, 40);

        fill(&mut self.chatlogging, true);
        fill(&mut self.timestamp, true);
        fill_str(&mut self.logtimeformat, DEFAULT_LOG_TIME_FORMAT);

        fill(&mut self.messageholelimit, 3000);
        fill(&mut self.messageslimit, 500);
        fill(&mut self.ackslimit, 3000);
        fill(&mut self.playertimeout, 10_000);
        fill(&mut self.minconnectiontime, 0);
        fill(&mut self.lagcompmode, 1);
        fill(&mut self.connseedtime, 300_000); // 5 minutes

        fill(&mut self.db_logging, false);
        fill(&mut self.db_log_queries, false);
        fill(&mut self.conncookies, true);
        fill(&mut self.cookielogging, false);
        fill(&mut self.output, true);
    }
}
