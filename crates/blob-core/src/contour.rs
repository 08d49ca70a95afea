//! Noise-deformed closed outline of the blob.

use std::f32::consts::TAU;

use crate::animation::TimeAccumulators;
use crate::canvas::{Path, Point};
use crate::color::BlobState;
use crate::config::{AnimationConfig, ContourConfig};
use crate::error::BlobError;
use crate::noise::NoiseField;
use crate::presence::FacePosition;

/// Distances below this are treated as "all points on the center".
pub(crate) const DEGENERATE_EPSILON: f32 = 1e-4;

/// One frame's outline. Always holds the configured number of points.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
    /// Set when the lean term was skipped because every point sat on the
    /// center.
    pub degenerate: bool,
}

impl Contour {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            degenerate: false,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of the points.
    pub fn centroid(&self) -> Point {
        if self.points.is_empty() {
            return Point::ORIGIN;
        }
        let n = self.points.len() as f32;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }

    pub fn max_distance_from(&self, center: Point) -> f32 {
        self.points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Contour {
        Contour {
            points: self.points.iter().map(|p| p.offset(dx, dy)).collect(),
            degenerate: self.degenerate,
        }
    }

    /// Closed polyline through all points.
    pub fn to_path(&self) -> Path {
        Path::polygon(&self.points)
    }
}

#[derive(Clone, Debug)]
pub struct ContourGenerator {
    config: ContourConfig,
}

impl ContourGenerator {
    pub fn new(config: ContourConfig) -> Result<Self, BlobError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    pub fn num_points(&self) -> usize {
        self.config.num_points
    }

    /// Build the outline around `center` for the given noise phases.
    ///
    /// `center_offset` is the state displacement (jump/wobble) for this frame;
    /// the lean toward `face` is measured from the displaced center.
    pub fn generate(
        &self,
        noise: &NoiseField,
        center: Point,
        phases: &TimeAccumulators,
        face: FacePosition,
        center_offset: [f32; 2],
    ) -> Contour {
        let cfg = &self.config;
        let center = center.offset(center_offset[0], center_offset[1]);
        let times = phases.as_array();
        let n = cfg.num_points;

        let mut points: Vec<Point> = (0..n)
            .map(|i| {
                let angle = TAU * i as f32 / n as f32;
                let (sin, cos) = angle.sin_cos();

                let total_noise: f32 = cfg
                    .layers
                    .iter()
                    .zip(times)
                    .map(|(layer, time)| {
                        let nx = cos * layer.scale + time;
                        let ny = sin * layer.scale + time;
                        noise.sample(nx, ny) * layer.weight
                    })
                    .sum();

                let chaos_phase =
                    phases.primary * cfg.chaos_time_rate + i as f32 * cfg.chaos_index_rate;
                let chaos = chaos_phase.sin() * cfg.chaos_amplitude;
                let radius = cfg.base_radius + total_noise * cfg.deformation_intensity + chaos;

                center.offset(cos * radius, sin * radius)
            })
            .collect();

        let degenerate = !self.apply_lean(&mut points, center, face);
        if degenerate {
            log::warn!("blob contour collapsed onto its center, skipping lean");
        }
        Contour { points, degenerate }
    }

    /// Same as [`generate`](Self::generate) but derives the state
    /// displacement from `state` and `state_timer`.
    #[allow(clippy::too_many_arguments)]
    pub fn generate_for_state(
        &self,
        noise: &NoiseField,
        center: Point,
        phases: &TimeAccumulators,
        face: FacePosition,
        animation: &AnimationConfig,
        state: BlobState,
        state_timer: u32,
    ) -> Contour {
        let offset = animation.transient_offset(state, state_timer);
        self.generate(noise, center, phases, face, offset)
    }

    /// Tilt every point toward the face. Returns `false` when the contour is
    /// degenerate and nothing was applied.
    fn apply_lean(&self, points: &mut [Point], center: Point, face: FacePosition) -> bool {
        let max_distance = points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max);
        if !(max_distance > DEGENERATE_EPSILON) {
            return false;
        }

        let [tilt_x, tilt_y] = face.tilt(self.config.lean_gain);
        let k = self.config.lean_strength;
        for p in points.iter_mut() {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            p.x += tilt_x * k * (dy / max_distance);
            p.y += tilt_y * k * (dx / max_distance);
        }
        true
    }
}
