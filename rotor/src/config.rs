//! Rotor configuration
//!
//! `RotorConfig` is the parameter bag for the rotor engine. Raw values may
//! be constructed freely (settings UI, config files); applying a config to
//! a live engine always goes through [`RotorConfig::clamped`], so an engine
//! never holds out-of-range parameters.
//!
//! Also provides TOML persistence helpers for host apps (load/save under
//! the platform config directory) and the key/setter registry used to bind
//! declarative key-value config onto typed fields.

use directories::ProjectDirs;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Default return-to-rest decay speed, degrees per millisecond.
pub const ANGULAR_VELOCITY_DEFAULT: f64 = 40.0 / 1000.0;
/// Lower clamp bound for the decay speed on apply.
pub const ANGULAR_VELOCITY_MIN: f64 = 1.0;
/// Widest angular span of a single digit segment, degrees (360 / 10).
pub const DIGIT_SEGMENT_MAX: f32 = 36.0;
/// Smallest admitted segment span. The segment arc divides the pulse
/// estimate, so saturation keeps it strictly positive.
pub const DIGIT_SEGMENT_MIN: f32 = 1.0e-3;

/// Tunable parameters of the rotor engine.
///
/// Angles are degrees except `finger_stop_azimuth`, which is radians (it is
/// subtracted from raw azimuths before any degree conversion happens).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotorConfig {
    /// Return-to-rest decay speed, degrees per millisecond.
    pub angular_velocity: f64,
    /// Angular offset of the finger stop from azimuth zero, radians.
    pub finger_stop_azimuth: f64,
    /// Rotation angle beyond which pulse counting begins, degrees.
    pub cock_angle_threshold: f32,
    /// Angular width of one pulse/digit segment, degrees.
    pub digit_segment_arc: f32,
    /// Inner dead-zone boundary as a fraction of the pivot radius.
    pub inner_dead_zone_coeff: f32,
    /// Drag sensitivity multiplier inside the inner dead zone.
    pub inner_dead_zone_grip_mult: f32,
    /// Touch-acceptance boundary as a fraction of the pivot radius.
    pub outer_dead_zone_coeff: f32,
}

impl Default for RotorConfig {
    fn default() -> Self {
        Self {
            angular_velocity: ANGULAR_VELOCITY_DEFAULT,
            finger_stop_azimuth: 0.0,
            cock_angle_threshold: 0.0,
            digit_segment_arc: DIGIT_SEGMENT_MAX,
            inner_dead_zone_coeff: 0.0,
            inner_dead_zone_grip_mult: 0.0,
            outer_dead_zone_coeff: 1.0,
        }
    }
}

/// Typed setter for one config field, used by the key registry.
type Setter = fn(&mut RotorConfig, f64);

/// Key registry: canonical field name, optional short alias (the attribute
/// names the original declarative format used), and the typed setter.
const FIELDS: &[(&str, Option<&str>, Setter)] = &[
    ("angular_velocity", None, |c, v| c.angular_velocity = v),
    ("finger_stop_azimuth", None, |c, v| c.finger_stop_azimuth = v),
    ("cock_angle_threshold", None, |c, v| {
        c.cock_angle_threshold = v as f32
    }),
    ("digit_segment_arc", None, |c, v| {
        c.digit_segment_arc = v as f32
    }),
    ("inner_dead_zone_coeff", Some("inner"), |c, v| {
        c.inner_dead_zone_coeff = v as f32
    }),
    ("inner_dead_zone_grip_mult", Some("inner_grip"), |c, v| {
        c.inner_dead_zone_grip_mult = v as f32
    }),
    ("outer_dead_zone_coeff", Some("outer"), |c, v| {
        c.outer_dead_zone_coeff = v as f32
    }),
];

impl RotorConfig {
    /// Copy of this config with every field saturated into its valid range.
    ///
    /// This is the only path onto a live engine; repeated application is
    /// idempotent.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            angular_velocity: self.angular_velocity.max(ANGULAR_VELOCITY_MIN),
            finger_stop_azimuth: self.finger_stop_azimuth,
            cock_angle_threshold: self.cock_angle_threshold.max(0.0),
            digit_segment_arc: self
                .digit_segment_arc
                .clamp(DIGIT_SEGMENT_MIN, DIGIT_SEGMENT_MAX),
            inner_dead_zone_coeff: self.inner_dead_zone_coeff.clamp(0.0, 1.0),
            inner_dead_zone_grip_mult: self.inner_dead_zone_grip_mult.clamp(0.0, 1.0),
            outer_dead_zone_coeff: self.outer_dead_zone_coeff.clamp(0.0, 1.0),
        }
    }

    /// Look up a registry setter by canonical name or short alias.
    fn lookup(key: &str) -> Option<Setter> {
        FIELDS
            .iter()
            .find(|(name, alias, _)| *name == key || *alias == Some(key))
            .map(|(_, _, set)| *set)
    }

    /// Apply a single key-value entry through the registry.
    ///
    /// Returns `false` for unknown keys, which are ignored by design so
    /// declarative sources can carry entries this engine does not know.
    pub fn apply_entry(&mut self, key: &str, value: f64) -> bool {
        match Self::lookup(key) {
            Some(set) => {
                set(self, value);
                true
            }
            None => false,
        }
    }

    /// Build a raw config from key-value entries, starting from defaults.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut config = Self::default();
        for (key, value) in entries {
            config.apply_entry(key, value);
        }
        config
    }
}

// Deserialization funnels through the key registry so short aliases are
// accepted, unknown keys are skipped, and missing fields keep defaults.
impl<'de> Deserialize<'de> for RotorConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ConfigVisitor;

        impl<'de> Visitor<'de> for ConfigVisitor {
            type Value = RotorConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of rotor config fields")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RotorConfig, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut config = RotorConfig::default();
                while let Some(key) = map.next_key::<String>()? {
                    if RotorConfig::lookup(&key).is_some() {
                        let value: f64 = map.next_value()?;
                        config.apply_entry(&key, value);
                    } else {
                        let _ = map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(config)
            }
        }

        deserializer.deserialize_map(ConfigVisitor)
    }
}

/// Why loading or saving a dialer config failed.
#[derive(Debug)]
pub enum ConfigError {
    /// No platform config directory (headless or exotic environment).
    NoConfigDir,
    /// IO error while reading/writing the config file
    Io(io::Error),
    /// The file exists but is not valid TOML for this config.
    Parse(toml::de::Error),
    /// Failed to serialize config
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "no config directory for this platform"),
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Base configuration directory shared by all dialer surfaces.
///
/// `None` only when the platform exposes no home/config location.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "disc-dialer", "dialer")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of the TOML file a named dialer persists to, e.g.
/// `<config_dir>/disc_dialer.toml` for the default app.
pub fn config_path(dialer_name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", dialer_name)))
}

/// Load the persisted configuration for a named dialer.
///
/// A missing file is the first-run case, not an error: the host falls back
/// to defaults and the file appears on the first settings save. A file
/// that exists but fails to parse is reported so hand-edits are not
/// silently discarded.
pub fn load_config<T: de::DeserializeOwned>(dialer_name: &str) -> Result<Option<T>, ConfigError> {
    let path = config_path(dialer_name).ok_or(ConfigError::NoConfigDir)?;

    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    let config: T = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Persist the configuration for a named dialer, creating the config
/// directory on first save.
pub fn save_config<T: Serialize>(dialer_name: &str, config: &T) -> Result<(), ConfigError> {
    let path = config_path(dialer_name).ok_or(ConfigError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    fs::write(&path, contents)?;
    Ok(())
}

/// Remove a named dialer's persisted configuration, reverting it to
/// defaults on the next launch. Missing file is fine.
pub fn delete_config(dialer_name: &str) -> Result<(), ConfigError> {
    let path = config_path(dialer_name).ok_or(ConfigError::NoConfigDir)?;

    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_dial() {
        let config = RotorConfig::default();
        assert_eq!(config.angular_velocity, ANGULAR_VELOCITY_DEFAULT);
        assert_eq!(config.digit_segment_arc, DIGIT_SEGMENT_MAX);
        assert_eq!(config.outer_dead_zone_coeff, 1.0);
        assert_eq!(config.finger_stop_azimuth, 0.0);
        assert_eq!(config.cock_angle_threshold, 0.0);
        assert_eq!(config.inner_dead_zone_coeff, 0.0);
        assert_eq!(config.inner_dead_zone_grip_mult, 0.0);
    }

    #[test]
    fn clamp_saturates_out_of_range_fields() {
        let config = RotorConfig {
            angular_velocity: 0.0,
            digit_segment_arc: 50.0,
            cock_angle_threshold: -10.0,
            inner_dead_zone_coeff: 1.5,
            inner_dead_zone_grip_mult: -0.2,
            outer_dead_zone_coeff: 2.0,
            ..RotorConfig::default()
        }
        .clamped();

        assert_eq!(config.angular_velocity, ANGULAR_VELOCITY_MIN);
        assert_eq!(config.digit_segment_arc, DIGIT_SEGMENT_MAX);
        assert_eq!(config.cock_angle_threshold, 0.0);
        assert_eq!(config.inner_dead_zone_coeff, 1.0);
        assert_eq!(config.inner_dead_zone_grip_mult, 0.0);
        assert_eq!(config.outer_dead_zone_coeff, 1.0);
    }

    #[test]
    fn clamp_keeps_segment_arc_strictly_positive() {
        let config = RotorConfig {
            digit_segment_arc: 0.0,
            ..RotorConfig::default()
        }
        .clamped();
        assert!(config.digit_segment_arc > 0.0);
        assert_eq!(config.digit_segment_arc, DIGIT_SEGMENT_MIN);
    }

    #[test]
    fn clamp_is_idempotent_for_in_range_values() {
        let config = RotorConfig {
            angular_velocity: 2.0,
            finger_stop_azimuth: 1.2,
            cock_angle_threshold: 52.0,
            digit_segment_arc: 28.0,
            inner_dead_zone_coeff: 0.3,
            inner_dead_zone_grip_mult: 0.16,
            outer_dead_zone_coeff: 0.95,
        };
        let once = config.clamped();
        assert_eq!(once, config);
        assert_eq!(once.clamped(), once);
    }

    #[test]
    fn registry_accepts_canonical_names_and_aliases() {
        let mut config = RotorConfig::default();
        assert!(config.apply_entry("inner", 0.4));
        assert!(config.apply_entry("inner_grip", 0.16));
        assert!(config.apply_entry("outer", 0.9));
        assert!(config.apply_entry("cock_angle_threshold", 52.0));
        assert_eq!(config.inner_dead_zone_coeff, 0.4);
        assert_eq!(config.inner_dead_zone_grip_mult, 0.16);
        assert_eq!(config.outer_dead_zone_coeff, 0.9);
        assert_eq!(config.cock_angle_threshold, 52.0);
    }

    #[test]
    fn registry_ignores_unknown_keys() {
        let mut config = RotorConfig::default();
        assert!(!config.apply_entry("renderer", 1.0));
        assert_eq!(config, RotorConfig::default());
    }

    #[test]
    fn from_entries_builds_raw_config() {
        let config =
            RotorConfig::from_entries([("digit_segment_arc", 28.0), ("no_such_key", 7.0)]);
        assert_eq!(config.digit_segment_arc, 28.0);
        assert_eq!(config.angular_velocity, ANGULAR_VELOCITY_DEFAULT);
    }

    #[test]
    fn toml_round_trip_preserves_values() {
        let config = RotorConfig {
            angular_velocity: 1.5,
            finger_stop_azimuth: 0.7,
            cock_angle_threshold: 52.0,
            digit_segment_arc: 28.0,
            inner_dead_zone_coeff: 0.3,
            inner_dead_zone_grip_mult: 0.16,
            outer_dead_zone_coeff: 1.0,
        };
        let text = toml::to_string(&config).unwrap();
        let back: RotorConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn toml_accepts_aliases_and_skips_unknown_keys() {
        let back: RotorConfig = toml::from_str(
            "inner = 0.25\ninner_grip = 0.5\nouter = 0.8\nrenderer = \"drawable\"\n",
        )
        .unwrap();
        assert_eq!(back.inner_dead_zone_coeff, 0.25);
        assert_eq!(back.inner_dead_zone_grip_mult, 0.5);
        assert_eq!(back.outer_dead_zone_coeff, 0.8);
        // Untouched fields keep their defaults.
        assert_eq!(back.digit_segment_arc, DIGIT_SEGMENT_MAX);
    }

    #[test]
    fn toml_accepts_integer_literals_for_float_fields() {
        let back: RotorConfig = toml::from_str("cock_angle_threshold = 52\n").unwrap();
        assert_eq!(back.cock_angle_threshold, 52.0);
    }

    #[test]
    fn config_path_is_named_after_the_dialer() {
        let path = config_path("test_dialer");
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("test_dialer.toml"));
    }
}
