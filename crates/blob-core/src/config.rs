use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::BlobError;
use crate::noise::DEFAULT_SEED;

// ============================================================
// Serializable config types
// ============================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlobConfig {
    pub version: u32,
    #[serde(default = "default_seed")]
    pub noise_seed: u64,
    pub contour: ContourConfig,
    #[serde(default)]
    pub shading: ShadingConfig,
    #[serde(default)]
    pub eyes: EyeConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
}

/// One coherent-noise sampling pass: spatial `scale` around the circle,
/// temporal `speed` per tick and its `weight` in the layered sum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    pub scale: f32,
    pub speed: f32,
    pub weight: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContourConfig {
    pub num_points: usize,
    pub base_radius: f32,
    /// Radius change per unit of combined noise.
    pub deformation_intensity: f32,
    pub chaos_amplitude: f32,
    #[serde(default = "default_chaos_time_rate")]
    pub chaos_time_rate: f32,
    #[serde(default = "default_chaos_index_rate")]
    pub chaos_index_rate: f32,
    pub lean_strength: f32,
    /// Multipliers turning the face offset from center into a tilt.
    #[serde(default = "default_lean_gain")]
    pub lean_gain: [f32; 2],
    /// Coarse/slow, medium, fine/fast.
    pub layers: [NoiseLayer; 3],
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_chaos_time_rate() -> f32 {
    2.0
}

fn default_chaos_index_rate() -> f32 {
    0.5
}

fn default_lean_gain() -> [f32; 2] {
    [0.5, 0.4]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadingConfig {
    /// Drop-shadow translation in surface pixels.
    pub shadow_offset: [f32; 2],
    /// How far the key light follows the face tilt, in units of the blob's
    /// max radius.
    pub light_tilt_gain: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            shadow_offset: [4.0, 4.0],
            light_tilt_gain: 2.2,
        }
    }
}

/// Eye placement and motion, as fractions of the surface size unless noted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyeConfig {
    pub length_ratio: f32,
    pub height_ratio: f32,
    pub spacing_ratio: f32,
    pub vertical_offset_ratio: f32,
    pub tracking_ratio: [f32; 2],
    /// Inward tilt of each eye, in degrees.
    pub rotation_deg: f32,
    pub breathing_amplitude_ratio: f32,
    /// Angular speed of the breathing cycle in rad/s.
    pub breathing_speed: f32,
    pub breathing_scale: f32,
    pub glue_amplitude_ratio: f32,
    pub glue_speed: f32,
    pub color: Rgba,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            length_ratio: 0.20,
            height_ratio: 0.12,
            spacing_ratio: 0.2,
            vertical_offset_ratio: -0.05,
            tracking_ratio: [0.03, 0.03],
            rotation_deg: 50.0,
            breathing_amplitude_ratio: 0.006,
            breathing_speed: 2.0,
            breathing_scale: 0.005,
            glue_amplitude_ratio: 0.008,
            glue_speed: 0.4,
            color: Rgba::WHITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub tick_interval_ms: u64,
    pub success_ticks: u32,
    pub error_ticks: u32,
    pub jump_amplitude: f32,
    pub jump_rate: f32,
    pub wobble_amplitude: f32,
    pub wobble_rate: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 20,
            success_ticks: 50,
            error_ticks: 40,
            jump_amplitude: 10.0,
            jump_rate: 0.3,
            wobble_amplitude: 5.0,
            wobble_rate: 0.5,
        }
    }
}

/// The two window presentations the blob is shown in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    /// Full 400×300 window.
    #[default]
    Active,
    /// Small 150×150 corner orb.
    Ambient,
}

impl Presentation {
    /// Reference surface size `(width, height)` in pixels.
    pub fn surface_size(self) -> (f32, f32) {
        match self {
            Presentation::Active => (400.0, 300.0),
            Presentation::Ambient => (150.0, 150.0),
        }
    }
}

impl ContourConfig {
    pub fn for_presentation(presentation: Presentation) -> Self {
        let layers = [
            NoiseLayer {
                scale: 0.5,
                speed: 0.03,
                weight: 0.6,
            },
            NoiseLayer {
                scale: 0.9,
                speed: 0.05,
                weight: 0.3,
            },
            NoiseLayer {
                scale: 1.8,
                speed: 0.08,
                weight: 0.1,
            },
        ];
        match presentation {
            Presentation::Active => Self {
                num_points: 40,
                base_radius: 100.0,
                deformation_intensity: 50.0,
                chaos_amplitude: 10.0,
                chaos_time_rate: default_chaos_time_rate(),
                chaos_index_rate: default_chaos_index_rate(),
                lean_strength: 40.0,
                lean_gain: default_lean_gain(),
                layers,
            },
            Presentation::Ambient => Self {
                num_points: 30,
                base_radius: 50.0,
                deformation_intensity: 25.0,
                chaos_amplitude: 5.0,
                chaos_time_rate: default_chaos_time_rate(),
                chaos_index_rate: default_chaos_index_rate(),
                lean_strength: 20.0,
                lean_gain: default_lean_gain(),
                layers,
            },
        }
    }

    pub fn layer_speeds(&self) -> [f32; 3] {
        self.layers.map(|layer| layer.speed)
    }
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self::for_presentation(Presentation::Active)
    }
}

// ============================================================
// Validation
// ============================================================

fn require(
    field: &'static str,
    requirement: &'static str,
    value: f64,
    ok: bool,
) -> Result<(), BlobError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(BlobError::InvalidParameter {
            field,
            requirement,
            value,
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), BlobError> {
    require(field, "positive", value as f64, value > 0.0)
}

fn non_negative(field: &'static str, value: f32) -> Result<(), BlobError> {
    require(field, "non-negative", value as f64, value >= 0.0)
}

fn finite(field: &'static str, value: f32) -> Result<(), BlobError> {
    require(field, "finite", value as f64, true)
}

fn positive_count(field: &'static str, value: u64) -> Result<(), BlobError> {
    require(field, "positive", value as f64, value > 0)
}

impl ContourConfig {
    pub fn validate(&self) -> Result<(), BlobError> {
        if self.num_points < 3 {
            return Err(BlobError::TooFewPoints(self.num_points));
        }
        if !(self.base_radius > 0.0 && self.base_radius.is_finite()) {
            return Err(BlobError::NonPositiveRadius(self.base_radius));
        }
        non_negative("contour.deformation_intensity", self.deformation_intensity)?;
        non_negative("contour.chaos_amplitude", self.chaos_amplitude)?;
        finite("contour.chaos_time_rate", self.chaos_time_rate)?;
        finite("contour.chaos_index_rate", self.chaos_index_rate)?;
        non_negative("contour.lean_strength", self.lean_strength)?;
        finite("contour.lean_gain[0]", self.lean_gain[0])?;
        finite("contour.lean_gain[1]", self.lean_gain[1])?;
        for layer in &self.layers {
            finite("contour.layers.scale", layer.scale)?;
            non_negative("contour.layers.speed", layer.speed)?;
            non_negative("contour.layers.weight", layer.weight)?;
        }
        Ok(())
    }
}

impl ShadingConfig {
    pub fn validate(&self) -> Result<(), BlobError> {
        finite("shading.shadow_offset[0]", self.shadow_offset[0])?;
        finite("shading.shadow_offset[1]", self.shadow_offset[1])?;
        finite("shading.light_tilt_gain", self.light_tilt_gain)
    }
}

impl EyeConfig {
    pub fn validate(&self) -> Result<(), BlobError> {
        positive("eyes.length_ratio", self.length_ratio)?;
        positive("eyes.height_ratio", self.height_ratio)?;
        non_negative("eyes.spacing_ratio", self.spacing_ratio)?;
        finite("eyes.vertical_offset_ratio", self.vertical_offset_ratio)?;
        non_negative("eyes.tracking_ratio[0]", self.tracking_ratio[0])?;
        non_negative("eyes.tracking_ratio[1]", self.tracking_ratio[1])?;
        finite("eyes.rotation_deg", self.rotation_deg)?;
        non_negative(
            "eyes.breathing_amplitude_ratio",
            self.breathing_amplitude_ratio,
        )?;
        finite("eyes.breathing_speed", self.breathing_speed)?;
        require(
            "eyes.breathing_scale",
            "in [0, 1)",
            self.breathing_scale as f64,
            (0.0..1.0).contains(&self.breathing_scale),
        )?;
        non_negative("eyes.glue_amplitude_ratio", self.glue_amplitude_ratio)?;
        non_negative("eyes.glue_speed", self.glue_speed)
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), BlobError> {
        positive_count("animation.tick_interval_ms", self.tick_interval_ms)?;
        positive_count("animation.success_ticks", self.success_ticks.into())?;
        positive_count("animation.error_ticks", self.error_ticks.into())?;
        finite("animation.jump_amplitude", self.jump_amplitude)?;
        finite("animation.jump_rate", self.jump_rate)?;
        finite("animation.wobble_amplitude", self.wobble_amplitude)?;
        finite("animation.wobble_rate", self.wobble_rate)
    }
}

// ============================================================
// BlobConfig: top-level config
// ============================================================

impl BlobConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn for_presentation(presentation: Presentation) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            noise_seed: DEFAULT_SEED,
            contour: ContourConfig::for_presentation(presentation),
            shading: ShadingConfig::default(),
            eyes: EyeConfig::default(),
            animation: AnimationConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), BlobError> {
        if self.version != Self::CURRENT_VERSION {
            return Err(BlobError::UnsupportedVersion {
                found: self.version,
                expected: Self::CURRENT_VERSION,
            });
        }
        self.contour.validate()?;
        self.shading.validate()?;
        self.eyes.validate()?;
        self.animation.validate()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a config.
    pub fn from_json(json: &str) -> Result<Self, BlobError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self::for_presentation(Presentation::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for p in [Presentation::Active, Presentation::Ambient] {
            BlobConfig::for_presentation(p).validate().unwrap();
        }
        let ambient = BlobConfig::for_presentation(Presentation::Ambient);
        assert_eq!(ambient.contour.num_points, 30);
        assert_eq!(ambient.contour.base_radius, 50.0);
        assert_eq!(Presentation::Ambient.surface_size(), (150.0, 150.0));
    }

    #[test]
    fn layer_weights_keep_their_ranking() {
        let c = ContourConfig::default();
        assert_eq!(c.layers.map(|l| l.weight), [0.6, 0.3, 0.1]);
        assert!(c.layers[0].scale < c.layers[2].scale);
        assert!(c.layers[0].speed < c.layers[2].speed);
    }

    #[test]
    fn json_round_trip() {
        let config = BlobConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(BlobConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let mut value = serde_json::to_value(BlobConfig::default()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("eyes");
        obj.remove("animation");
        obj.remove("noise_seed");
        let parsed = BlobConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(parsed.eyes, EyeConfig::default());
        assert_eq!(parsed.noise_seed, DEFAULT_SEED);
    }

    #[test]
    fn rejects_degenerate_point_count() {
        let mut config = BlobConfig::default();
        config.contour.num_points = 2;
        let json = config.to_json().unwrap();
        assert!(matches!(
            BlobConfig::from_json(&json),
            Err(BlobError::TooFewPoints(2))
        ));
    }

    #[test]
    fn rejects_non_positive_radius_and_eye_size() {
        let mut config = BlobConfig::default();
        config.contour.base_radius = 0.0;
        assert!(matches!(config.validate(), Err(BlobError::NonPositiveRadius(_))));

        let mut config = BlobConfig::default();
        config.eyes.height_ratio = -0.1;
        assert!(matches!(config.validate(), Err(BlobError::InvalidParameter { .. })));

        let mut config = BlobConfig::default();
        config.animation.success_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_version_and_bad_json() {
        let mut config = BlobConfig::default();
        config.version = 99;
        assert!(matches!(
            config.validate(),
            Err(BlobError::UnsupportedVersion { found: 99, .. })
        ));
        assert!(matches!(BlobConfig::from_json("{"), Err(BlobError::Json(_))));
    }
}
