//! Process-wide configuration (§10 ambient stack).
//!
//! Mirrors the environment-variable surface a conversion engine of this kind
//! exposes (§6): plugin search paths, a cache kill switch, and the default
//! tolerance used when a fish's probe round-trip is considered "close
//! enough". None of the env vars are required; every field has a default.

use std::env;
use std::path::PathBuf;

/// Default tolerance (§6, §10): max per-channel error tolerated during a
/// fish's probe round-trip check before it's logged as suspect.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directories searched for dynamically loaded extensions.
    ///
    /// The engine itself never loads plugins (out of scope); this field
    /// exists so embedders can inspect the configured search path.
    pub plugin_path: Vec<PathBuf>,
    /// When set, the fish cache (§4.8) is bypassed entirely.
    pub inhibit_cache: bool,
    pub tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_path: Vec::new(),
            inhibit_cache: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Config {
    /// Read `BABL_PATH`, `BABL_INHIBIT_CACHE`, `BABL_TOLERANCE` (§6), falling
    /// back to [`Config::default`] for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(path) = env::var("BABL_PATH") {
            config.plugin_path = env::split_paths(&path).collect();
        }
        if let Ok(flag) = env::var("BABL_INHIBIT_CACHE") {
            config.inhibit_cache = parse_inhibit_cache(&flag);
        }
        if let Ok(tolerance) = env::var("BABL_TOLERANCE") {
            match tolerance.parse() {
                Ok(value) => config.tolerance = value,
                Err(_) => log::warn!("BABL_TOLERANCE={tolerance:?} is not a valid float, ignoring"),
            }
        }

        config
    }
}

fn parse_inhibit_cache(flag: &str) -> bool {
    matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
