use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::MascotError;
use crate::math::Vector3;

#[derive(Debug, Default, Deserialize)]
pub struct MascotConfig {
    #[serde(default)]
    pub identity: Identity,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub wander: WanderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Fixed RNG seed. Unset means seed from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Identity {
    #[serde(default = "default_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration per second squared (negative is down).
    pub gravity: f64,
    pub max_x: f64,
    pub restitution: f64,
    pub spawn: Vector3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Multiplier from NDC displacement to launch velocity.
    pub throw_factor: f64,
    /// Half size of the pick box at scale 1.
    pub half_extents: Vector3,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    pub interval_ms: u64,
    pub max_speed: f64,
    pub hop_probability: f64,
    pub hop_min: f64,
    pub hop_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vector3,
    pub target: Vector3,
    pub fov_deg: f64,
    pub aspect: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub base_scale: f64,
    pub growth_per_level: f64,
    /// Yaw speed in radians per second.
    pub spin_rate: f64,
    pub feed_flash_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Clip names the loaded model provides.
    pub clips: Vec<String>,
    /// How long one-shot reaction clips play before returning to the mood clip.
    pub reaction_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub fps: u32,
    /// Print every n-th render frame; 0 disables frame output.
    pub frame_every: u64,
}

fn default_name() -> String {
    "Plankster".into()
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.8 * 0.002,
            max_x: 2.5,
            restitution: 0.5,
            spawn: Vector3::ZERO,
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            throw_factor: -3.0,
            half_extents: Vector3::splat(0.5),
        }
    }
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_speed: 0.15,
            hop_probability: 0.3,
            hop_min: 0.06,
            hop_max: 0.11,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 2.0, 5.0),
            target: Vector3::new(0.0, 2.0, 4.0),
            fov_deg: 75.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            base_scale: 1.0,
            growth_per_level: 0.01,
            spin_rate: 0.0,
            feed_flash_secs: 1.5,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            clips: ["Idle", "Happy", "Hyper", "Moody", "ScamDance"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            reaction_secs: 2.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            frame_every: 30,
        }
    }
}

impl MascotConfig {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), MascotError> {
        self.check_finite()?;

        let p = &self.physics;
        if !(p.max_x > 0.0) {
            return Err(MascotError::InvalidConfig(format!(
                "physics.max_x must be positive, got {}",
                p.max_x
            )));
        }
        if !(0.0..=1.0).contains(&p.restitution) {
            return Err(MascotError::InvalidConfig(format!(
                "physics.restitution must be in [0, 1], got {}",
                p.restitution
            )));
        }
        let w = &self.wander;
        if w.interval_ms == 0 {
            return Err(MascotError::InvalidConfig(
                "wander.interval_ms must be non-zero".into(),
            ));
        }
        if !(w.max_speed >= 0.0) {
            return Err(MascotError::InvalidConfig(format!(
                "wander.max_speed must be non-negative, got {}",
                w.max_speed
            )));
        }
        if !(0.0..=1.0).contains(&w.hop_probability) {
            return Err(MascotError::InvalidConfig(format!(
                "wander.hop_probability must be in [0, 1], got {}",
                w.hop_probability
            )));
        }
        if !(w.hop_min <= w.hop_max) {
            return Err(MascotError::InvalidConfig(format!(
                "wander.hop_min ({}) exceeds wander.hop_max ({})",
                w.hop_min, w.hop_max
            )));
        }
        let c = &self.camera;
        if !(c.fov_deg > 0.0 && c.fov_deg < 180.0) || !(c.aspect > 0.0) {
            return Err(MascotError::InvalidConfig(format!(
                "camera fov_deg {} / aspect {} out of range",
                c.fov_deg, c.aspect
            )));
        }
        if (c.target - c.position).normalize() == Vector3::ZERO {
            return Err(MascotError::InvalidConfig(
                "camera.target must differ from camera.position".into(),
            ));
        }
        if self.output.fps == 0 {
            return Err(MascotError::InvalidConfig("output.fps must be non-zero".into()));
        }
        Ok(())
    }

    /// NaN or infinity anywhere would poison integration or panic in `rand`.
    fn check_finite(&self) -> Result<(), MascotError> {
        let (p, d, w, c, a) = (
            &self.physics,
            &self.drag,
            &self.wander,
            &self.camera,
            &self.appearance,
        );
        let scalars = [
            ("physics.gravity", p.gravity),
            ("physics.max_x", p.max_x),
            ("physics.restitution", p.restitution),
            ("drag.throw_factor", d.throw_factor),
            ("wander.max_speed", w.max_speed),
            ("wander.hop_probability", w.hop_probability),
            ("wander.hop_min", w.hop_min),
            ("wander.hop_max", w.hop_max),
            ("camera.fov_deg", c.fov_deg),
            ("camera.aspect", c.aspect),
            ("appearance.base_scale", a.base_scale),
            ("appearance.growth_per_level", a.growth_per_level),
            ("appearance.spin_rate", a.spin_rate),
            ("appearance.feed_flash_secs", a.feed_flash_secs),
            ("animation.reaction_secs", self.animation.reaction_secs),
        ];
        if let Some((field, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MascotError::InvalidConfig(format!(
                "{field} must be finite, got {value}"
            )));
        }

        let vectors = [
            ("physics.spawn", p.spawn),
            ("drag.half_extents", d.half_extents),
            ("camera.position", c.position),
            ("camera.target", c.target),
        ];
        if let Some((field, value)) = vectors.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MascotError::InvalidConfig(format!(
                "{field} must be finite, got {value:?}"
            )));
        }
        Ok(())
    }
}

/// Read and validate a config file.
pub fn load_from(path: &Path) -> Result<MascotConfig, MascotError> {
    let content = fs::read_to_string(path)?;
    let config = toml::from_str::<MascotConfig>(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the mascot config file.
/// Search order:
///   1. PLANKSTER_CONFIG env var
///   2. ~/.plankster/config.toml
///   3. Default values
pub fn load() -> MascotConfig {
    let candidates = [
        std::env::var("PLANKSTER_CONFIG").ok().map(PathBuf::from),
        dirs::home_dir().map(|h| h.join(".plankster/config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            match load_from(&candidate) {
                Ok(config) => {
                    info!(
                        path = %candidate.display(),
                        name = %config.identity.name,
                        "loaded mascot config"
                    );
                    return config;
                }
                Err(e) => {
                    warn!(path = %candidate.display(), error = %e, "failed to load config");
                }
            }
        }
    }

    info!("no config file found, using defaults");
    MascotConfig::default()
}
