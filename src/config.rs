//! JSON configuration for the scaling policy.
//!
//! Stored as `config.json` under the platform config directory
//! (`%APPDATA%/zoomscale` on Windows, `$XDG_CONFIG_HOME/zoomscale` or
//! `~/.config/zoomscale` elsewhere). Environment variables override the
//! file; see [`ScalingConfig::with_env_overrides`].

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ZoomError, ZoomResult};
use crate::zoom::constants::{MAX_CONFIGURED_ZOOM, MIN_CONFIGURED_ZOOM, REFERENCE_ZOOM};
use crate::zoom::ZoomLevel;

/// Environment variable overriding [`ScalingConfig::auto_scale`].
pub const ENV_AUTOSCALE: &str = "ZOOMSCALE_AUTOSCALE";

/// Environment variable overriding [`ScalingConfig::auto_scale_on_runtime`].
pub const ENV_RUNTIME_AUTOSCALE: &str = "ZOOMSCALE_RUNTIME_AUTOSCALE";

/// How the device zoom is derived from the native (physical) zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AutoScale {
    /// Never scale: device zoom is always 100%.
    Disabled,
    /// Round to whole multiples of 100%, never below 100%.
    #[default]
    Integer,
    /// 200% on any monitor above 100%, otherwise 100%.
    Integer200,
    /// Round to the nearest 25%.
    Quarter,
    /// Round to the nearest 50%.
    Half,
    /// Use the native zoom unchanged.
    Exact,
    /// A fixed percentage, clamped to 25..=1600.
    Fixed(i32),
}

impl AutoScale {
    /// Device zoom for a monitor whose physical zoom is `native`.
    pub fn device_zoom_for(self, native: ZoomLevel) -> ZoomLevel {
        let n = native.percent();
        let zoom = match self {
            Self::Disabled => REFERENCE_ZOOM,
            Self::Integer => (n.saturating_add(25) / 100 * 100).max(REFERENCE_ZOOM),
            Self::Integer200 => {
                if n > REFERENCE_ZOOM {
                    200
                } else {
                    REFERENCE_ZOOM
                }
            }
            Self::Quarter => round_to_step(n, 25),
            Self::Half => round_to_step(n, 50),
            Self::Exact => n,
            Self::Fixed(p) => p.clamp(MIN_CONFIGURED_ZOOM, MAX_CONFIGURED_ZOOM),
        };
        // every branch yields a positive percentage
        ZoomLevel::new(zoom).unwrap_or(ZoomLevel::REFERENCE)
    }
}

fn round_to_step(value: i32, step: i32) -> i32 {
    let steps = (f64::from(value) / f64::from(step)).round() as i64;
    let max = i64::from(i32::MAX / step * step);
    (steps * i64::from(step)).clamp(i64::from(step), max) as i32
}

impl FromStr for AutoScale {
    type Err = ZoomError;

    fn from_str(s: &str) -> ZoomResult<Self> {
        let t = s.trim();
        let mode = match t.to_ascii_lowercase().as_str() {
            "false" => Self::Disabled,
            "integer" => Self::Integer,
            "integer200" => Self::Integer200,
            "quarter" => Self::Quarter,
            "half" => Self::Half,
            "exact" => Self::Exact,
            other => match other.parse::<i32>() {
                Ok(p) => Self::Fixed(p),
                Err(_) => return Err(ZoomError::Config(format!("unknown auto-scale mode '{t}'"))),
            },
        };
        Ok(mode)
    }
}

impl TryFrom<String> for AutoScale {
    type Error = ZoomError;

    fn try_from(s: String) -> ZoomResult<Self> {
        s.parse()
    }
}

impl From<AutoScale> for String {
    fn from(mode: AutoScale) -> String {
        mode.to_string()
    }
}

impl fmt::Display for AutoScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("false"),
            Self::Integer => f.write_str("integer"),
            Self::Integer200 => f.write_str("integer200"),
            Self::Quarter => f.write_str("quarter"),
            Self::Half => f.write_str("half"),
            Self::Exact => f.write_str("exact"),
            Self::Fixed(p) => write!(f, "{p}"),
        }
    }
}

/// Serializable scaling policy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScalingConfig {
    /// Device zoom policy.
    pub auto_scale: AutoScale,
    /// Rescale widgets and fonts when a zoom change arrives at runtime.
    /// When off, zoom-change notifications are ignored and fonts resolve at
    /// the primary zoom.
    pub auto_scale_on_runtime: bool,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            auto_scale: AutoScale::Integer,
            auto_scale_on_runtime: true,
        }
    }
}

impl ScalingConfig {
    /// Load from a JSON file. A missing file yields the defaults; a
    /// malformed one is an error.
    pub fn load(path: &Path) -> ZoomResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = serde_json::from_str(&contents)?;
                debug!(path = %path.display(), ?config, "loaded scaling config");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write as pretty JSON, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> ZoomResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Apply [`ENV_AUTOSCALE`] and [`ENV_RUNTIME_AUTOSCALE`] from the process
    /// environment.
    pub fn with_env_overrides(self) -> ZoomResult<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ZoomResult<Self> {
        if let Some(value) = lookup(ENV_AUTOSCALE) {
            self.auto_scale = value.parse()?;
        }
        if let Some(value) = lookup(ENV_RUNTIME_AUTOSCALE) {
            self.auto_scale_on_runtime = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                _ => {
                    return Err(ZoomError::Config(format!(
                        "{ENV_RUNTIME_AUTOSCALE} must be true or false, got '{value}'"
                    )))
                }
            };
        }
        Ok(self)
    }
}

/// Default config file location.
pub fn config_path() -> PathBuf {
    let base = std::env::var_os("APPDATA")
        .or_else(|| std::env::var_os("XDG_CONFIG_HOME"))
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("zoomscale").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(p: i32) -> ZoomLevel {
        ZoomLevel::new(p).unwrap()
    }

    #[test]
    fn test_integer_mode_rounds_to_hundreds() {
        assert_eq!(AutoScale::Integer.device_zoom_for(zoom(100)).percent(), 100);
        assert_eq!(AutoScale::Integer.device_zoom_for(zoom(125)).percent(), 100);
        assert_eq!(AutoScale::Integer.device_zoom_for(zoom(150)).percent(), 100);
        assert_eq!(AutoScale::Integer.device_zoom_for(zoom(175)).percent(), 200);
        assert_eq!(AutoScale::Integer.device_zoom_for(zoom(250)).percent(), 200);
        assert_eq!(AutoScale::Integer.device_zoom_for(zoom(75)).percent(), 100);
    }

    #[test]
    fn test_huge_native_zoom_stays_in_range() {
        let huge = zoom(i32::MAX);
        assert_eq!(AutoScale::Integer.device_zoom_for(huge).percent(), i32::MAX / 100 * 100);
        assert_eq!(AutoScale::Quarter.device_zoom_for(huge).percent(), i32::MAX / 25 * 25);
        assert_eq!(AutoScale::Half.device_zoom_for(huge).percent(), i32::MAX / 50 * 50);
        assert_eq!(AutoScale::Exact.device_zoom_for(huge), huge);
        assert_eq!(AutoScale::Integer200.device_zoom_for(huge).percent(), 200);
    }

    #[test]
    fn test_other_modes() {
        assert_eq!(AutoScale::Disabled.device_zoom_for(zoom(200)).percent(), 100);
        assert_eq!(AutoScale::Integer200.device_zoom_for(zoom(125)).percent(), 200);
        assert_eq!(AutoScale::Integer200.device_zoom_for(zoom(100)).percent(), 100);
        assert_eq!(AutoScale::Quarter.device_zoom_for(zoom(137)).percent(), 125);
        assert_eq!(AutoScale::Quarter.device_zoom_for(zoom(140)).percent(), 150);
        assert_eq!(AutoScale::Quarter.device_zoom_for(zoom(10)).percent(), 25);
        assert_eq!(AutoScale::Half.device_zoom_for(zoom(170)).percent(), 150);
        assert_eq!(AutoScale::Half.device_zoom_for(zoom(175)).percent(), 200);
        assert_eq!(AutoScale::Exact.device_zoom_for(zoom(137)).percent(), 137);
        assert_eq!(AutoScale::Fixed(3000).device_zoom_for(zoom(100)).percent(), 1600);
        assert_eq!(AutoScale::Fixed(10).device_zoom_for(zoom(100)).percent(), 25);
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("FALSE".parse::<AutoScale>().unwrap(), AutoScale::Disabled);
        assert_eq!(" quarter ".parse::<AutoScale>().unwrap(), AutoScale::Quarter);
        assert_eq!("175".parse::<AutoScale>().unwrap(), AutoScale::Fixed(175));
        assert!("sideways".parse::<AutoScale>().is_err());
    }

    #[test]
    fn test_config_json_roundtrip_uses_string_modes() {
        let config = ScalingConfig {
            auto_scale: AutoScale::Fixed(150),
            auto_scale_on_runtime: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"150\""));
        let back: ScalingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ScalingConfig = serde_json::from_str(r#"{"auto_scale":"exact"}"#).unwrap();
        assert_eq!(config.auto_scale, AutoScale::Exact);
        assert!(config.auto_scale_on_runtime);
    }

    #[test]
    fn test_overrides() {
        let config = ScalingConfig::default()
            .with_overrides(|name| match name {
                ENV_AUTOSCALE => Some("half".to_string()),
                ENV_RUNTIME_AUTOSCALE => Some("off".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.auto_scale, AutoScale::Half);
        assert!(!config.auto_scale_on_runtime);

        let bad = ScalingConfig::default().with_overrides(|name| {
            (name == ENV_RUNTIME_AUTOSCALE).then(|| "maybe".to_string())
        });
        assert!(matches!(bad, Err(ZoomError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("zoomscale-test-missing/nope.json");
        assert_eq!(ScalingConfig::load(&path).unwrap(), ScalingConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("zoomscale-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.json");
        let config = ScalingConfig {
            auto_scale: AutoScale::Quarter,
            auto_scale_on_runtime: true,
        };
        config.save(&path).unwrap();
        assert_eq!(ScalingConfig::load(&path).unwrap(), config);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ScalingConfig::load(&path), Err(ZoomError::Config(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
