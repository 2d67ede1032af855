use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TINT_KEY: &str = "mooniform_tint_rgb";
pub const LEFTY_KEY: &str = "mooniform_lefty";
pub const DOCK_HIDDEN_KEY: &str = "mooniform_dock_hidden";
pub const MUTED_KEY: &str = "mooniform_muted";
pub const LAST_TRACK_KEY: &str = "mooniform_last_track";

/// Flat string preferences. Readers re-parse values on every load and fall
/// back to defaults when a value is absent or garbled.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);

    fn flag(&self, key: &str) -> bool {
        matches!(self.get(key).as_deref().map(str::trim), Some("1" | "true"))
    }

    fn set_flag(&mut self, key: &str, on: bool) {
        self.set(key, if on { "1" } else { "0" }.to_string());
    }

    fn number(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|raw| raw.trim().parse().ok())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for Preferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

impl Preferences {
    pub fn tint(&self) -> Option<String> {
        self.get(TINT_KEY).and_then(|raw| parse_tint(&raw))
    }

    /// Stores a tint if it parses; returns the normalized value.
    pub fn set_tint(&mut self, raw: &str) -> Option<String> {
        let tint = parse_tint(raw)?;
        self.set(TINT_KEY, tint.clone());
        Some(tint)
    }

    pub fn lefty(&self) -> bool {
        self.flag(LEFTY_KEY)
    }

    pub fn set_lefty(&mut self, on: bool) {
        self.set_flag(LEFTY_KEY, on);
    }
}

/// Normalizes an `"r,g,b"` tint; each channel must be 0..=255.
pub fn parse_tint(raw: &str) -> Option<String> {
    let channels = raw
        .split(',')
        .map(|part| part.trim().parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    match channels.as_slice() {
        [r, g, b] => Some(format!("{r},{g},{b}")),
        _ => None,
    }
}
