//! # Configuration
//!
//! Read-only settings handed to the session at construction. Loaded from a
//! JSON file; every section has defaults so partial files are accepted.
//!
//! ## Sections
//! - `device`: adb binary, device serial, legacy screencap mode
//! - `assets`: asset root and pack name (`<root>/<pack>/<category>/<name>.png`)
//! - `combat`: map, boss gating overrides, quotas and sortie stop conditions
//! - `search`: thresholds and loop ceilings of the navigation engine
//! - `enhancement` / `retirement`: roster collaborators
//! - `pacing`: sleep jitter scale

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub assets: AssetConfig,
    pub combat: CombatConfig,
    pub search: SearchConfig,
    pub enhancement: CollaboratorConfig,
    pub retirement: CollaboratorConfig,
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub adb_path: PathBuf,
    /// `host:port` of an emulator, or a device serial. Empty = first device.
    pub serial: String,
    /// Older adb builds rewrite `\n` as `\r\n` in exec-out.
    pub legacy_screencap: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
            serial: "127.0.0.1:5555".to_string(),
            legacy_screencap: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub pack: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            pack: "EN".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Map identifier, e.g. `3-4`.
    pub map: String,
    /// Per-map overrides of the built-in kills-before-boss table.
    pub kills_before_boss: HashMap<String, u32>,
    /// Retreat once this many fights were won in a clear. 0 disables.
    pub retreat_after: u32,
    /// Never target mystery nodes.
    pub ignore_mystery_nodes: bool,
    /// Only chase mystery nodes while any are visible.
    pub focus_on_mystery_nodes: bool,
    /// Event maps that draw the boss marker at roughly half size.
    pub small_boss_icon: bool,
    /// Confirm the low-morale alert instead of retreating.
    pub ignore_morale: bool,
    /// Stop sortieing below this much oil. 0 disables the gate.
    pub oil_limit: u32,
    /// Stop the sortie for roster maintenance every N clears. 0 disables.
    pub retire_cycle: u32,
    /// Stop the sortie for roster maintenance after this long. 0 disables.
    pub maintenance_interval_minutes: u64,
    /// Consecutive fleet defeats tolerated before the sortie stops.
    pub max_consecutive_defeats: u32,
    /// Stop the sortie after this many clears. 0 means no limit.
    pub max_clears: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            map: "3-4".to_string(),
            kills_before_boss: HashMap::new(),
            retreat_after: 0,
            ignore_mystery_nodes: false,
            focus_on_mystery_nodes: false,
            small_boss_icon: false,
            ignore_morale: false,
            oil_limit: 1000,
            retire_cycle: 2,
            maintenance_interval_minutes: 0,
            max_consecutive_defeats: 3,
            max_clears: 0,
        }
    }
}

/// Tunables of the navigation engine. Pixel constants varied between
/// historical revisions; none of them is load-bearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub start_similarity: f32,
    pub similarity_step: f32,
    pub similarity_floor: f32,
    /// Start panning once the threshold has dropped to this value.
    pub pan_below_similarity: f32,
    /// Start panning once the blacklist holds more entries than this.
    pub pan_after_blacklisted: usize,
    /// Total camera pans a single search may spend.
    pub max_pans: u32,
    pub mystery_start_similarity: f32,
    pub mystery_floor: f32,
    /// Cheap "is there any marker at all" threshold for mystery nodes.
    pub mystery_hint_similarity: f32,
    pub dedup_radius: f64,
    pub blacklist_tolerance: i32,
    /// Blacklist size that invalidates the registry cache.
    pub rescan_after_blacklisted: usize,
    pub stuck_ticks: u32,
    pub touch_every: u32,
    pub fleet_locate_attempts: u32,
    /// Attempts before the fleet locator starts panning vertically.
    pub fleet_pan_after: u32,
    pub max_empty_scans: u32,
    pub boss_similarity: f32,
    /// Boss marker farther than this from screen center is re-centered.
    pub boss_center_tolerance: i32,
    /// Ceiling for every UI polling loop (map entry, battle, retreat).
    pub max_ui_ticks: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start_similarity: 0.99,
            similarity_step: 0.005,
            similarity_floor: 0.80,
            pan_below_similarity: 0.985,
            pan_after_blacklisted: 3,
            max_pans: 8,
            mystery_start_similarity: 0.95,
            mystery_floor: 0.93,
            mystery_hint_similarity: 0.8,
            dedup_radius: 50.0,
            blacklist_tolerance: 40,
            rescan_after_blacklisted: 2,
            stuck_ticks: 21,
            touch_every: 3,
            fleet_locate_attempts: 8,
            fleet_pan_after: 4,
            max_empty_scans: 3,
            boss_similarity: 0.9,
            boss_center_tolerance: 300,
            max_ui_ticks: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Multiplier on every pacing delay. 0 disables sleeping.
    pub scale: f32,
    pub seed: Option<u64>,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            seed: None,
        }
    }
}

/// Fights needed before the boss fleet is a valid target, by map.
const KILLS_BEFORE_BOSS: &[(&str, u32)] = &[
    ("1-1", 1), ("1-2", 2), ("1-3", 2), ("1-4", 3),
    ("2-1", 2), ("2-2", 3), ("2-3", 3), ("2-4", 3),
    ("3-1", 3), ("3-2", 3), ("3-3", 3), ("3-4", 3),
    ("4-1", 3), ("4-2", 3), ("4-3", 3), ("4-4", 4),
    ("5-1", 4), ("5-2", 4), ("5-3", 4), ("5-4", 4),
    ("6-1", 4), ("6-2", 4), ("6-3", 4), ("6-4", 5),
    ("7-1", 5), ("7-2", 5), ("7-3", 5), ("7-4", 5),
    ("8-1", 4), ("8-2", 4), ("8-3", 4), ("8-4", 4),
    ("9-1", 5), ("9-2", 5), ("9-3", 5), ("9-4", 5),
    ("10-1", 6), ("10-2", 6), ("10-3", 6), ("10-4", 6),
    ("11-1", 6), ("11-2", 6), ("11-3", 6), ("11-4", 6),
    ("12-1", 6), ("12-2", 6), ("12-3", 6), ("12-4", 6),
    ("13-1", 6), ("13-2", 6), ("13-3", 6), ("13-4", 7),
];

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_map(&self.combat.map) {
            return Err(EngineError::InvalidConfig(format!(
                "invalid map selected: '{}'",
                self.combat.map
            )));
        }
        let s = &self.search;
        if s.similarity_step <= 0.0 {
            return Err(EngineError::InvalidConfig("similarity_step must be positive".into()));
        }
        if s.similarity_floor >= s.start_similarity || s.mystery_floor > s.mystery_start_similarity {
            return Err(EngineError::InvalidConfig(
                "similarity floor must be below the start similarity".into(),
            ));
        }
        if s.dedup_radius <= 0.0 || s.blacklist_tolerance <= 0 {
            return Err(EngineError::InvalidConfig("pixel tolerances must be positive".into()));
        }
        if s.touch_every == 0 || s.stuck_ticks == 0 || s.max_ui_ticks == 0 {
            return Err(EngineError::InvalidConfig("tick bounds must be non-zero".into()));
        }
        if self.pacing.scale < 0.0 {
            return Err(EngineError::InvalidConfig("pacing scale cannot be negative".into()));
        }
        Ok(())
    }

    /// Configured override, else the built-in table, else 0.
    pub fn kills_before_boss(&self) -> u32 {
        let map = self.combat.map.as_str();
        if let Some(n) = self.combat.kills_before_boss.get(map) {
            return *n;
        }
        KILLS_BEFORE_BOSS
            .iter()
            .find(|(id, _)| *id == map)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

fn is_valid_map(map: &str) -> bool {
    let Some((chapter, level)) = map.split_once('-') else {
        return false;
    };
    let chapter_ok = chapter == "E" || matches!(chapter.parse::<u32>(), Ok(1..=13));
    let level_ok = matches!(level.parse::<u32>(), Ok(1..=4))
        || level == "SP"
        || (level.len() == 2
            && matches!(level.as_bytes()[0], b'A'..=b'D')
            && matches!(level.as_bytes()[1], b'1'..=b'4'));
    chapter_ok && level_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_and_override() {
        let mut config = Config::default();
        config.combat.map = "3-4".into();
        assert_eq!(config.kills_before_boss(), 3);

        config.combat.kills_before_boss.insert("3-4".into(), 5);
        assert_eq!(config.kills_before_boss(), 5);

        config.combat.map = "E-B3".into();
        assert_eq!(config.kills_before_boss(), 0);
    }

    #[test]
    fn map_identifiers() {
        for ok in ["1-1", "13-4", "E-A1", "E-D4", "E-SP", "7-2"] {
            assert!(is_valid_map(ok), "{ok}");
        }
        for bad in ["", "3", "14-1", "0-1", "3-5", "E-E1", "X-1", "3-A9"] {
            assert!(!is_valid_map(bad), "{bad}");
        }
    }

    #[test]
    fn partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "combat": {{ "map": "2-3", "retreat_after": 4 }}, "pacing": {{ "scale": 0.0 }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.combat.map, "2-3");
        assert_eq!(config.combat.retreat_after, 4);
        assert_eq!(config.search.stuck_ticks, 21);
        assert_eq!(config.assets.pack, "EN");
        assert_eq!(config.pacing.scale, 0.0);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.search.similarity_floor = 0.995;
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_map_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "combat": {{ "map": "99-1" }} }}"#).unwrap();
        assert!(Config::load(file.path()).is_err());
    }
}
