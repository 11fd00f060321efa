//! Fuzzifier: raw depths to shallow/medium/deep memberships
//!
//! Breakpoints are placed relative to the depths observed this tick, so the
//! same rule base works whether the river is 2 m or 200 m deep.

use super::{Zone, ZoneSoundings};

/// Linguistic depth terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Shallow,
    Medium,
    Deep,
}

impl Term {
    pub const ALL: [Term; 3] = [Term::Shallow, Term::Medium, Term::Deep];

    fn slot(self) -> usize {
        match self {
            Term::Shallow => 0,
            Term::Medium => 1,
            Term::Deep => 2,
        }
    }
}

/// Membership degrees of one sample (or one zone) in each term
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Membership([f32; 3]);

impl Membership {
    pub fn new(shallow: f32, medium: f32, deep: f32) -> Self {
        Self([shallow, medium, deep])
    }

    pub fn degree(&self, term: Term) -> f32 {
        self.0[term.slot()]
    }

    /// Sum of all degrees; 1 for any fuzzified sample, 0 for an empty zone
    pub fn total(&self) -> f32 {
        self.0.iter().sum()
    }
}

/// Memberships of the three sensor zones
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoneMemberships {
    pub front: Membership,
    pub left: Membership,
    pub right: Membership,
}

impl ZoneMemberships {
    pub fn zone(&self, zone: Zone) -> &Membership {
        match zone {
            Zone::Front => &self.front,
            Zone::Left => &self.left,
            Zone::Right => &self.right,
        }
    }
}

/// Term breakpoints scaled to the observed depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthScale {
    min: f32,
    max: f32,
}

impl DepthScale {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Position of `depth` in the observed range, 0 = shallowest, 1 = deepest.
    /// A collapsed range counts every sample as deepest.
    pub fn normalize(&self, depth: f32) -> f32 {
        let span = self.max - self.min;
        if span.is_nan() || span <= 0.0 {
            return 1.0;
        }
        ((depth - self.min) / span).clamp(0.0, 1.0)
    }

    /// Shallow falls from 1 to 0 over the lower half, deep rises over the
    /// upper half, medium peaks in the middle. Degrees always sum to 1.
    pub fn membership(&self, depth: f32) -> Membership {
        let u = self.normalize(depth);
        let shallow = (1.0 - 2.0 * u).clamp(0.0, 1.0);
        let deep = (2.0 * u - 1.0).clamp(0.0, 1.0);
        let medium = (1.0 - (2.0 * u - 1.0).abs()).max(0.0);
        Membership::new(shallow, medium, deep)
    }

    /// Mean membership over a zone's samples; all zeros for an empty zone
    pub fn zone_membership(&self, samples: &[f32]) -> Membership {
        if samples.is_empty() {
            return Membership::default();
        }
        let mut sum = [0.0f32; 3];
        for &depth in samples {
            let m = self.membership(depth);
            for (acc, degree) in sum.iter_mut().zip(m.0) {
                *acc += degree;
            }
        }
        let n = samples.len() as f32;
        Membership(sum.map(|s| s / n))
    }
}

/// Stage 1: fuzzify all three zones against the observed (min, max)
pub fn fuzzify(soundings: &ZoneSoundings<'_>, min: f32, max: f32) -> ZoneMemberships {
    let scale = DepthScale::new(min, max);
    ZoneMemberships {
        front: scale.zone_membership(soundings.front),
        left: scale.zone_membership(soundings.left),
        right: scale.zone_membership(soundings.right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_extremes() {
        let scale = DepthScale::new(2.0, 10.0);
        assert_eq!(scale.membership(2.0), Membership::new(1.0, 0.0, 0.0));
        assert_eq!(scale.membership(6.0), Membership::new(0.0, 1.0, 0.0));
        assert_eq!(scale.membership(10.0), Membership::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_partition_of_unity() {
        let scale = DepthScale::new(0.5, 30.0);
        for i in 0..=40 {
            let depth = 0.5 + i as f32 * 0.75;
            assert_relative_eq!(scale.membership(depth).total(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rescaled_to_observed_range() {
        // Same relative position, different absolute scale
        let shallow_river = DepthScale::new(1.0, 3.0).membership(2.5);
        let deep_river = DepthScale::new(100.0, 300.0).membership(250.0);
        assert_relative_eq!(
            shallow_river.degree(Term::Deep),
            deep_river.degree(Term::Deep),
            epsilon = 1e-5
        );
        assert_relative_eq!(shallow_river.degree(Term::Deep), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_collapsed_range_is_deep() {
        let scale = DepthScale::new(4.0, 4.0);
        assert_eq!(scale.membership(4.0), Membership::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_out_of_range_depths_clamped() {
        let scale = DepthScale::new(2.0, 4.0);
        assert_eq!(scale.membership(-5.0).degree(Term::Shallow), 1.0);
        assert_eq!(scale.membership(50.0).degree(Term::Deep), 1.0);
    }

    #[test]
    fn test_zone_mean_and_empty_zone() {
        let scale = DepthScale::new(0.0, 10.0);
        let zone = scale.zone_membership(&[0.0, 10.0]);
        assert_relative_eq!(zone.degree(Term::Shallow), 0.5);
        assert_relative_eq!(zone.degree(Term::Deep), 0.5);
        assert_eq!(zone.degree(Term::Medium), 0.0);

        assert_eq!(scale.zone_membership(&[]).total(), 0.0);
    }

    #[test]
    fn test_fuzzify_zones() {
        let soundings = ZoneSoundings {
            front: &[1.0, 1.0],
            left: &[9.0],
            right: &[5.0],
        };
        let zones = fuzzify(&soundings, 1.0, 9.0);
        assert_eq!(zones.front.degree(Term::Shallow), 1.0);
        assert_eq!(zones.left.degree(Term::Deep), 1.0);
        assert_eq!(zones.zone(Zone::Right).degree(Term::Medium), 1.0);
    }
}
