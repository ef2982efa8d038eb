//! Synthetic elevation profiles.
//!
//! Routes are drawn on a flat map, so there is no measured elevation. A
//! profile is generated from the distance travelled to each point instead.
//! The stats display and the GPX exporter both call [`ElevationModel::profile`]
//! and [`elevation_gain_m`], so the gain shown to the user matches the file.
//! Profiles are quantized to the 0.1 m the file carries, so the gain recomputed
//! from the written `<ele>` values is the same number.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::geometry::cumulative_distances_km;
use crate::models::RoutePoint;

/// No synthesized elevation goes below this, in meters.
pub const ELEVATION_FLOOR_M: f64 = 20.0;

/// Rounds to the nearest decimeter, the resolution written to `<ele>`.
pub fn quantize_elevation(meters: f64) -> f64 {
    (meters * 10.0).round() / 10.0
}

/// Produces one elevation per point from cumulative distances (km).
pub trait ElevationModel {
    /// `cumulative_km` must be non-decreasing and start at 0. Values are
    /// quantized with [`quantize_elevation`].
    fn profile(&self, cumulative_km: &[f64]) -> Vec<f64>;

    /// Convenience wrapper computing the distances from the points.
    fn profile_for(&self, points: &[RoutePoint]) -> Vec<f64> {
        self.profile(&cumulative_distances_km(points))
    }
}

/// Rolling hills: one hill per 2 km, with a smaller ripple on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveProfile {
    /// Mean elevation in meters.
    pub base_m: f64,
    /// Height of the main hills. The ripple is a quarter of this.
    pub amplitude_m: f64,
}

impl Default for WaveProfile {
    fn default() -> Self {
        Self {
            base_m: 100.0,
            amplitude_m: 30.0,
        }
    }
}

impl WaveProfile {
    pub fn with_base(mut self, meters: f64) -> Self {
        self.base_m = meters;
        self
    }

    pub fn with_amplitude(mut self, meters: f64) -> Self {
        self.amplitude_m = meters;
        self
    }

    fn elevation_at(&self, progress: f64, cycles: f64) -> f64 {
        let hill = self.amplitude_m * (progress * cycles * std::f64::consts::TAU).sin();
        let ripple =
            (self.amplitude_m / 4.0) * (progress * cycles * 4.0 * std::f64::consts::TAU).sin();

        quantize_elevation((self.base_m + hill + ripple).max(ELEVATION_FLOOR_M))
    }
}

impl ElevationModel for WaveProfile {
    fn profile(&self, cumulative_km: &[f64]) -> Vec<f64> {
        let total_km = cumulative_km.last().copied().unwrap_or(0.0);
        let cycles = (total_km / 2.0).floor().max(1.0);

        cumulative_km
            .iter()
            .map(|&distance| {
                let progress = if total_km > 0.0 {
                    distance / total_km
                } else {
                    0.0
                };
                self.elevation_at(progress, cycles)
            })
            .collect()
    }
}

/// Seeded random walk that drifts gently upward while `bias < 0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalk {
    /// Elevation of the first point in meters.
    pub start_m: f64,
    /// Subtracted from each uniform `[0, 1)` draw before scaling.
    pub bias: f64,
    /// Largest change between two consecutive points in meters.
    pub max_step_m: f64,
    pub seed: u64,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            start_m: 100.0,
            bias: 0.45,
            max_step_m: 4.0,
            seed: 42,
        }
    }
}

impl RandomWalk {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn with_start(mut self, meters: f64) -> Self {
        self.start_m = meters;
        self
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_max_step(mut self, meters: f64) -> Self {
        self.max_step_m = meters;
        self
    }
}

impl ElevationModel for RandomWalk {
    fn profile(&self, cumulative_km: &[f64]) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let unit = Uniform::new(0.0, 1.0);

        let mut result = Vec::with_capacity(cumulative_km.len());
        let mut elevation = self.start_m.max(ELEVATION_FLOOR_M);

        for i in 0..cumulative_km.len() {
            if i > 0 {
                let step = (unit.sample(&mut rng) - self.bias) * self.max_step_m;
                elevation = (elevation + step).max(ELEVATION_FLOOR_M);
            }
            result.push(quantize_elevation(elevation));
        }

        result
    }
}

/// Elevation policy selected in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ElevationPolicy {
    Wave(WaveProfile),
    RandomWalk(RandomWalk),
}

impl Default for ElevationPolicy {
    fn default() -> Self {
        ElevationPolicy::Wave(WaveProfile::default())
    }
}

impl ElevationModel for ElevationPolicy {
    fn profile(&self, cumulative_km: &[f64]) -> Vec<f64> {
        match self {
            ElevationPolicy::Wave(wave) => wave.profile(cumulative_km),
            ElevationPolicy::RandomWalk(walk) => walk.profile(cumulative_km),
        }
    }
}

/// Total climb over a profile, rounded to the nearest meter.
pub fn elevation_gain_m(profile: &[f64]) -> f64 {
    profile
        .windows(2)
        .filter(|pair| pair[1] > pair[0])
        .fold(0.0, |gain, pair| gain + (pair[1] - pair[0]))
        .round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distances(total_km: f64, steps: usize) -> Vec<f64> {
        (0..=steps)
            .map(|i| total_km * i as f64 / steps as f64)
            .collect()
    }

    #[test]
    fn test_wave_shape() {
        let profile = WaveProfile::default().profile(&distances(4.0, 400));
        assert_eq!(profile.len(), 401);

        // Starts and ends at the base, two hills in 4 km
        assert!((profile[0] - 100.0).abs() < 1e-9);
        assert!((profile[400] - 100.0).abs() < 1e-6);
        let max = profile.iter().cloned().fold(f64::MIN, f64::max);
        assert!(max > 125.0 && max <= 137.5);
    }

    #[test]
    fn test_wave_respects_floor() {
        let wave = WaveProfile::default().with_base(30.0).with_amplitude(60.0);
        let profile = wave.profile(&distances(10.0, 500));
        assert!(profile.iter().all(|&e| e >= ELEVATION_FLOOR_M));
        assert!(profile.iter().any(|&e| e == ELEVATION_FLOOR_M));
    }

    #[test]
    fn test_wave_zero_length_route() {
        let profile = WaveProfile::default().profile(&[0.0, 0.0, 0.0]);
        assert_eq!(profile, vec![100.0, 100.0, 100.0]);
        assert_eq!(elevation_gain_m(&profile), 0.0);
    }

    #[test]
    fn test_random_walk_is_reproducible() {
        let cumulative = distances(3.0, 200);
        let a = RandomWalk::new(7).profile(&cumulative);
        let b = RandomWalk::new(7).profile(&cumulative);
        let c = RandomWalk::new(8).profile(&cumulative);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a[0], 100.0);
    }

    #[test]
    fn test_random_walk_floor_and_steps() {
        let walk = RandomWalk::new(3).with_start(21.0).with_bias(0.9);
        let profile = walk.profile(&distances(5.0, 1000));

        assert!(profile.iter().all(|&e| e >= ELEVATION_FLOOR_M));
        for pair in profile.windows(2) {
            assert!((pair[1] - pair[0]).abs() <= walk.max_step_m);
        }
    }

    #[test]
    fn test_random_walk_start_below_floor() {
        let profile = RandomWalk::new(1).with_start(5.0).profile(&[0.0]);
        assert_eq!(profile, vec![ELEVATION_FLOOR_M]);
    }

    #[test]
    fn test_profiles_are_quantized() {
        let cumulative = distances(7.3, 700);
        let profiles = [
            WaveProfile::default().with_amplitude(33.3).profile(&cumulative),
            RandomWalk::new(13).profile(&cumulative),
        ];

        for profile in profiles {
            for e in profile {
                assert_eq!(format!("{e:.1}").parse::<f64>().unwrap(), e);
            }
        }
    }

    #[test]
    fn test_quantize_elevation() {
        assert_eq!(quantize_elevation(101.26), 101.3);
        assert_eq!(quantize_elevation(20.0), 20.0);
        assert_eq!(quantize_elevation(99.94), 99.9);
    }

    #[test]
    fn test_elevation_gain() {
        assert_eq!(elevation_gain_m(&[]), 0.0);
        assert_eq!(elevation_gain_m(&[100.0]), 0.0);
        assert_eq!(elevation_gain_m(&[100.0, 110.4, 105.0, 106.0, 90.0]), 11.0);
    }

    #[test]
    fn test_policy_json() {
        let policy: ElevationPolicy =
            serde_json::from_str(r#"{"policy": "random_walk", "seed": 99}"#).unwrap();
        assert_eq!(policy, ElevationPolicy::RandomWalk(RandomWalk::new(99)));

        let policy: ElevationPolicy = serde_json::from_str(r#"{"policy": "wave"}"#).unwrap();
        assert_eq!(policy, ElevationPolicy::default());
    }
}
