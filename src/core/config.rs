//! Animation configuration
//!
//! Loaded from an optional JSON file (`WAVE_CONFIG`) with environment overrides.
//! Every field has a default, so an empty object is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{VisError, VisResult};
use super::point_set::Position;

/// Who advances time and recomputes geometry each displayed frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Server ticks the clock and streams every frame
    #[default]
    ServerDriven,
    /// Server sends the scene once, renderer animates locally
    ClientDriven,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::ServerDriven => "server-driven",
            Mode::ClientDriven => "client-driven",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = VisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "server_driven" | "server" => Ok(Mode::ServerDriven),
            "client_driven" | "client" => Ok(Mode::ClientDriven),
            other => Err(VisError::invalid(format!("unknown mode '{other}'"))),
        }
    }
}

/// Grid shape: `resolution` samples per axis over `[domain_min, domain_max]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub domain_min: f32,
    pub domain_max: f32,
    pub resolution: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            domain_min: -3.0,
            domain_max: 3.0,
            resolution: 30,
        }
    }
}

impl GridSpec {
    pub fn new(domain_min: f32, domain_max: f32, resolution: usize) -> Self {
        Self { domain_min, domain_max, resolution }
    }

    /// Number of grid points (resolution²), checked before anything is allocated
    pub fn point_count(&self) -> VisResult<usize> {
        if self.resolution == 0 {
            return Err(VisError::invalid("resolution must be positive"));
        }
        if !self.domain_min.is_finite() || !self.domain_max.is_finite() {
            return Err(VisError::invalid(format!(
                "domain bounds must be finite, got [{}, {}]",
                self.domain_min, self.domain_max
            )));
        }
        if !(self.domain_max - self.domain_min).is_finite() {
            return Err(VisError::invalid(format!(
                "domain span overflows, got [{}, {}]",
                self.domain_min, self.domain_max
            )));
        }
        // the largest per-point buffer must still fit an allocation
        let max_points = isize::MAX as usize / std::mem::size_of::<Position>();
        self.resolution
            .checked_mul(self.resolution)
            .filter(|&count| count <= max_points)
            .ok_or_else(|| VisError::invalid(format!("resolution {} is too large", self.resolution)))
    }
}

/// Parameters of the height field, shared verbatim by both sides of the boundary
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Spatial frequency ω
    pub omega: f32,
    /// Constant lift above the ground plane
    pub offset: f32,
    /// Clock step Δt per tick
    pub dt: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            omega: 1.0,
            offset: 1.0,
            dt: 0.05,
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> VisResult<()> {
        if !self.omega.is_finite() || !self.offset.is_finite() {
            return Err(VisError::invalid(format!(
                "omega and offset must be finite, got omega={} offset={}",
                self.omega, self.offset
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(VisError::invalid(format!("dt must be positive, got {}", self.dt)));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub mode: Mode,
    pub grid: GridSpec,
    pub field: FieldParams,
    pub point_size: f32,
    /// Frames per second pushed across the boundary (server-driven)
    pub update_rate: f64,
    /// Frames per second the renderer animates at (client-driven)
    pub redraw_rate: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            mode: Mode::ServerDriven,
            grid: GridSpec::default(),
            field: FieldParams::default(),
            point_size: 0.15,
            update_rate: 50.0,
            redraw_rate: 60.0,
        }
    }
}

impl AnimationConfig {
    /// Load from `WAVE_CONFIG` (if set), apply environment overrides and validate
    pub fn load() -> VisResult<Self> {
        let mut config = match std::env::var("WAVE_CONFIG") {
            Ok(path) => {
                debug!(path = %path, "Loading config file");
                Self::from_file(&path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> VisResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> VisResult<Self> {
        serde_json::from_str(text).map_err(|e| VisError::invalid(e.to_string()))
    }

    /// Apply `WAVE_MODE` / `WAVE_RESOLUTION` style overrides from a key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> VisResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("WAVE_MODE") {
            self.mode = mode.parse()?;
        }
        if let Some(raw) = lookup("WAVE_RESOLUTION") {
            let resolution: i64 = raw
                .trim()
                .parse()
                .map_err(|_| VisError::invalid(format!("WAVE_RESOLUTION is not an integer: '{raw}'")))?;
            if resolution <= 0 {
                return Err(VisError::invalid(format!("resolution must be positive, got {resolution}")));
            }
            self.grid.resolution = usize::try_from(resolution)
                .map_err(|_| VisError::invalid(format!("resolution {resolution} is too large")))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> VisResult<()> {
        self.grid.point_count()?;
        self.field.validate()?;
        if !(self.point_size.is_finite() && self.point_size > 0.0) {
            return Err(VisError::invalid(format!("point_size must be positive, got {}", self.point_size)));
        }
        rate_interval("update_rate", self.update_rate)?;
        rate_interval("redraw_rate", self.redraw_rate)?;
        Ok(())
    }

    /// Interval between server ticks
    pub fn update_interval(&self) -> VisResult<Duration> {
        rate_interval("update_rate", self.update_rate)
    }
}

/// Period of a rate in Hz; the period must be a non-zero `Duration`
pub fn rate_interval(name: &str, rate: f64) -> VisResult<Duration> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(VisError::invalid(format!("{name} must be positive, got {rate}")));
    }
    match Duration::try_from_secs_f64(1.0 / rate) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(VisError::invalid(format!("{name} {rate} has no representable period"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_values() {
        let config = AnimationConfig::default();
        assert_eq!(config.grid.resolution, 30);
        assert_eq!(config.grid.domain_min, -3.0);
        assert_eq!(config.field.dt, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        let config = AnimationConfig::from_json("{}").unwrap();
        assert_eq!(config, AnimationConfig::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = AnimationConfig::from_json(
            r#"{"mode": "client_driven", "grid": {"resolution": 50}, "redraw_rate": 30}"#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::ClientDriven);
        assert_eq!(config.grid.resolution, 50);
        assert_eq!(config.grid.domain_max, 3.0);
        assert_eq!(config.redraw_rate, 30.0);
    }

    #[test]
    fn zero_resolution_is_invalid() {
        let config = AnimationConfig {
            grid: GridSpec::new(-1.0, 1.0, 0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(VisError::InvalidConfiguration { .. })));
    }

    #[test]
    fn negative_resolution_in_json_is_invalid() {
        let result = AnimationConfig::from_json(r#"{"grid": {"resolution": -4}}"#);
        assert!(matches!(result, Err(VisError::InvalidConfiguration { .. })));
    }

    #[test]
    fn overflowing_resolution_is_invalid() {
        let spec = GridSpec::new(0.0, 1.0, usize::MAX);
        assert!(matches!(spec.point_count(), Err(VisError::InvalidConfiguration { .. })));
    }

    #[test]
    fn non_positive_rates_are_invalid() {
        let config = AnimationConfig { update_rate: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
        let config = AnimationConfig { redraw_rate: f64::NAN, ..Default::default() };
        assert!(config.validate().is_err());
        let config = AnimationConfig {
            field: FieldParams { dt: 0.0, ..Default::default() },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides() {
        let mut config = AnimationConfig::default();
        config
            .apply_overrides(|key| match key {
                "WAVE_MODE" => Some("client-driven".to_string()),
                "WAVE_RESOLUTION" => Some("12".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.mode, Mode::ClientDriven);
        assert_eq!(config.grid.resolution, 12);

        let err = config.apply_overrides(|key| (key == "WAVE_RESOLUTION").then(|| "-3".to_string()));
        assert!(matches!(err, Err(VisError::InvalidConfiguration { .. })));
    }

    #[test]
    fn update_interval_from_rate() {
        let config = AnimationConfig { update_rate: 50.0, ..Default::default() };
        assert_eq!(config.update_interval().unwrap(), Duration::from_millis(20));
    }

    #[test]
    fn rates_without_a_period_are_invalid() {
        for rate in [1e-20, 1e300] {
            let config = AnimationConfig { update_rate: rate, ..Default::default() };
            assert!(matches!(config.validate(), Err(VisError::InvalidConfiguration { .. })));
            assert!(matches!(config.update_interval(), Err(VisError::InvalidConfiguration { .. })));

            let config = AnimationConfig { redraw_rate: rate, ..Default::default() };
            assert!(matches!(config.validate(), Err(VisError::InvalidConfiguration { .. })));
        }
    }

    #[test]
    fn overflowing_domain_span_is_invalid() {
        let spec = GridSpec::new(-3e38, 3e38, 3);
        assert!(matches!(spec.point_count(), Err(VisError::InvalidConfiguration { .. })));
        // wide but representable
        assert_eq!(GridSpec::new(-1e38, 1e38, 3).point_count().unwrap(), 9);
    }

    #[test]
    fn unallocatable_point_count_is_invalid() {
        let spec = GridSpec::new(-3.0, 3.0, 1_100_000_000);
        assert!(matches!(spec.point_count(), Err(VisError::InvalidConfiguration { .. })));
    }
}
