//! Camera configuration and orbit navigation math
//!
//! Coordinates are Y-up. The controller orbits a fixed target (the model
//! origin); panning is not supported.

use serde::Serialize;

/// Immutable camera configuration, set once when the scene is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            // Pulled back for full-body framing
            position: [0.0, 1.6, 3.8],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 35.0,
            min_distance: 2.5,
            max_distance: 5.0,
        }
    }
}

impl CameraConfig {
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

/// Elevation limit, just short of the poles
const MAX_ELEVATION: f32 = 1.5;
/// Distance multiplier per zoom-in step
const ZOOM_SCALE: f32 = 0.95;

/// Spherical orbit state around a fixed target
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitController {
    distance: f32,
    target_distance: f32,
    azimuth: f32,
    elevation: f32,
    target: [f32; 3],
    min_distance: f32,
    max_distance: f32,
    pub sensitivity: f32,
    pub smooth_factor: f32,
}

impl OrbitController {
    pub fn from_config(config: &CameraConfig) -> Self {
        let offset = sub(config.position, config.target);
        let length = norm(offset);
        let distance = length.clamp(config.min_distance, config.max_distance);

        let (azimuth, elevation) = if length > f32::EPSILON {
            (
                offset[0].atan2(offset[2]),
                (offset[1] / length).clamp(-1.0, 1.0).asin(),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            distance,
            target_distance: distance,
            azimuth,
            elevation: elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION),
            target: config.target,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            sensitivity: 0.005,
            smooth_factor: 0.15,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn target(&self) -> [f32; 3] {
        self.target
    }

    /// Rotate around the target by a pointer delta in pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.elevation =
            (self.elevation + dy * self.sensitivity).clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Zoom by wheel steps; positive steps move the camera closer
    pub fn zoom(&mut self, steps: f32) {
        let scaled = self.target_distance * ZOOM_SCALE.powf(steps);
        self.target_distance = self.clamp_distance(scaled);
    }

    /// Zoom from a two-finger pinch, given the finger span before and after
    pub fn pinch(&mut self, previous_span: f32, current_span: f32) {
        if previous_span <= 0.0 {
            return;
        }
        let factor = previous_span / current_span.max(1.0);
        self.target_distance = self.clamp_distance(self.target_distance * factor);
    }

    /// Ease the rendered distance toward the requested one
    pub fn advance(&mut self, dt: f32) {
        let lerp_factor = 1.0 - (-self.smooth_factor * 60.0 * dt).exp();
        let next = self.distance + (self.target_distance - self.distance) * lerp_factor;
        self.distance = self.clamp_distance(next);
    }

    /// Camera position on the orbit sphere
    pub fn eye(&self) -> [f32; 3] {
        let horizontal = self.distance * self.elevation.cos();
        [
            self.target[0] + horizontal * self.azimuth.sin(),
            self.target[1] + self.distance * self.elevation.sin(),
            self.target[2] + horizontal * self.azimuth.cos(),
        ]
    }

    fn clamp_distance(&self, d: f32) -> f32 {
        if d.is_finite() {
            d.clamp(self.min_distance, self.max_distance)
        } else {
            self.max_distance
        }
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn norm(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-4, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_starts_at_configured_position() {
        let config = CameraConfig::default();
        let orbit = OrbitController::from_config(&config);
        assert_close(orbit.eye(), config.position);
        assert!((orbit.distance() - 4.1231).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_sequence_stays_clamped() {
        let config = CameraConfig::default();
        let mut orbit = OrbitController::from_config(&config);

        // Deterministic pseudo-random walk of wheel and pinch input
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let r = (seed >> 8) as f32 / (1u32 << 24) as f32;
            match seed % 3 {
                0 => orbit.zoom((r - 0.5) * 40.0),
                1 => orbit.pinch(100.0, 10.0 + r * 400.0),
                _ => orbit.advance(r * 0.1),
            }
            assert!(orbit.distance() >= 2.5 && orbit.distance() <= 5.0);
            assert!(orbit.target_distance() >= 2.5 && orbit.target_distance() <= 5.0);
        }
    }

    #[test]
    fn test_zoom_saturates_at_bounds() {
        let mut orbit = OrbitController::from_config(&CameraConfig::default());
        for _ in 0..200 {
            orbit.zoom(1.0);
            orbit.advance(1.0 / 60.0);
        }
        assert!((orbit.target_distance() - 2.5).abs() < 1e-6);

        for _ in 0..200 {
            orbit.zoom(-1.0);
            orbit.advance(1.0 / 60.0);
        }
        assert!((orbit.target_distance() - 5.0).abs() < 1e-6);
        assert!(orbit.distance() <= 5.0);
    }

    #[test]
    fn test_orbit_clamps_elevation_and_keeps_distance() {
        let mut orbit = OrbitController::from_config(&CameraConfig::default());
        let before = orbit.distance();

        orbit.orbit(120.0, 10_000.0);
        assert_eq!(orbit.elevation(), MAX_ELEVATION);
        orbit.orbit(0.0, -20_000.0);
        assert_eq!(orbit.elevation(), -MAX_ELEVATION);

        let eye = orbit.eye();
        let radius = (eye[0] * eye[0] + eye[1] * eye[1] + eye[2] * eye[2]).sqrt();
        assert!((radius - before).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut orbit = OrbitController::from_config(&CameraConfig::default());
        orbit.pinch(0.0, 50.0);
        orbit.zoom(f32::INFINITY);
        assert!(orbit.target_distance() >= 2.5 && orbit.target_distance() <= 5.0);
    }

    #[test]
    fn test_out_of_range_config_is_clamped() {
        let config = CameraConfig {
            position: [0.0, 0.0, 10.0],
            ..CameraConfig::default()
        };
        let orbit = OrbitController::from_config(&config);
        assert_eq!(orbit.distance(), 5.0);
        assert_close(orbit.eye(), [0.0, 0.0, 5.0]);
    }
}
