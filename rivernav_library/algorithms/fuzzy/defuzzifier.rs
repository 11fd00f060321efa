//! Defuzzifier: centroid of the aggregated output sets
//!
//! Output category shapes are triangles of half-width 0.5 on a normalized
//! universe (steering [-1, 1], speed [0, 1]). Each triangle is clipped at its
//! aggregated level, the clipped triangles are combined with max, and the
//! centroid is taken over evenly spaced points. The crisp value is then scaled
//! to the configured range.

use super::inference::OutputSets;
use super::rule_base::{Speed, Steering};

const HALF_WIDTH: f32 = 0.5;

fn triangle(x: f32, center: f32) -> f32 {
    (1.0 - (x - center).abs() / HALF_WIDTH).max(0.0)
}

/// Centroid defuzzifier over discretized universes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defuzzifier {
    steering_range: f32,
    speed_range: f32,
    resolution: usize,
}

impl Defuzzifier {
    /// `resolution` is the number of points per unit of normalized universe
    pub fn new(steering_range: f32, speed_range: f32, resolution: usize) -> Self {
        Self {
            steering_range,
            speed_range,
            resolution: resolution.max(1),
        }
    }

    fn steering_membership(sets: &OutputSets, x: f32) -> f32 {
        Steering::ALL
            .iter()
            .map(|&c| triangle(x, c.center()).min(sets.steering_level(c)))
            .fold(0.0, f32::max)
    }

    fn speed_membership(sets: &OutputSets, x: f32) -> f32 {
        Speed::ALL
            .iter()
            .map(|&c| triangle(x, c.center()).min(sets.speed_level(c)))
            .fold(0.0, f32::max)
    }

    /// Crisp steering delta in degrees; negative turns left.
    ///
    /// Points are summed in mirrored pairs (x, -x), so a mirror-symmetric
    /// output set gives exactly zero. An empty set gives zero.
    pub fn steering(&self, sets: &OutputSets) -> f32 {
        let n = self.resolution as i32;
        let mut numerator = 0.0f32;
        let mut denominator = Self::steering_membership(sets, 0.0);

        for k in 1..=n {
            let x = k as f32 / n as f32;
            let right = Self::steering_membership(sets, x);
            let left = Self::steering_membership(sets, -x);
            numerator += x * (right - left);
            denominator += right + left;
        }

        if denominator <= 0.0 {
            return 0.0;
        }
        self.steering_range * numerator / denominator
    }

    /// Crisp target speed; an empty set gives zero
    pub fn speed(&self, sets: &OutputSets) -> f32 {
        let n = self.resolution as i32;
        let mut numerator = 0.0f32;
        let mut denominator = 0.0f32;

        for k in 0..=n {
            let x = k as f32 / n as f32;
            let mu = Self::speed_membership(sets, x);
            numerator += x * mu;
            denominator += mu;
        }

        if denominator <= 0.0 {
            return 0.0;
        }
        self.speed_range * numerator / denominator
    }
}
