//! Fuzzy Steering and Speed Controller
//!
//! Turns the depth soundings around the boat into a steering delta and a target
//! speed, once per tick.
//!
//! # Pipeline
//!
//! ```text
//! ZoneSoundings ──fuzzify──▶ ZoneMemberships ──infer──▶ OutputSets ──centroid──▶ ControlDecision
//!  (raw depths)              (shallow/medium/deep)      (clip level per          (degrees, speed)
//!                                                        category)
//! ```
//!
//! Each stage is a plain function over plain values and is tested on its own.
//!
//! # Conventions
//!
//! - Positive steering turns right, negative turns left
//! - Term breakpoints follow the (min, max) depth observed this tick
//! - Output may exceed the boat's limits; the caller clamps
//!
//! # Example
//!
//! ```rust
//! use rivernav_library::algorithms::fuzzy::{FuzzyController, ZoneSoundings};
//!
//! let controller = FuzzyController::new(10.0, 4.0);
//!
//! // Shoal ahead and to the right, open water on the left
//! let soundings = ZoneSoundings {
//!     front: &[1.0, 1.2, 1.1],
//!     left: &[9.0, 8.5],
//!     right: &[1.5, 1.0],
//! };
//! let decision = controller.decide(&soundings, 1.0, 9.0);
//! assert!(decision.steering_delta < 0.0);
//! ```

pub mod defuzzifier;
pub mod fuzzifier;
pub mod inference;
pub mod rule_base;

use rivernav_core::params::ControllerConfig;

pub use defuzzifier::Defuzzifier;
pub use fuzzifier::{fuzzify, DepthScale, Membership, Term, ZoneMemberships};
pub use inference::{infer, OutputSets};
pub use rule_base::{Rule, RuleBase, Speed, Steering};

/// Default discretization of the output universes
pub const DEFAULT_RESOLUTION: usize = 50;

/// Sensor zones around the hull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Front,
    Left,
    Right,
}

/// Raw depth samples per zone for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneSoundings<'a> {
    pub front: &'a [f32],
    pub left: &'a [f32],
    pub right: &'a [f32],
}

impl ZoneSoundings<'_> {
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.left.is_empty() && self.right.is_empty()
    }

    /// (min, max) over every sample of every zone
    pub fn observed_bounds(&self) -> Option<(f32, f32)> {
        self.front
            .iter()
            .chain(self.left)
            .chain(self.right)
            .fold(None, |acc, &d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }
}

/// Crisp controller output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlDecision {
    /// Degrees; positive turns right
    pub steering_delta: f32,
    pub speed: f32,
}

/// Four-stage fuzzy controller
#[derive(Debug, Clone)]
pub struct FuzzyController {
    rules: RuleBase,
    defuzzifier: Defuzzifier,
}

impl FuzzyController {
    /// Controller proposing steering in [-steering_range, steering_range]
    /// degrees and speed in [0, speed_range]
    pub fn new(steering_range: f32, speed_range: f32) -> Self {
        Self {
            rules: RuleBase::standard(),
            defuzzifier: Defuzzifier::new(steering_range, speed_range, DEFAULT_RESOLUTION),
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            rules: RuleBase::standard(),
            defuzzifier: Defuzzifier::new(
                config.steering_range,
                config.speed_range,
                config.resolution,
            ),
        }
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Run the whole pipeline.
    ///
    /// `min`/`max` are the depths observed this tick. Empty soundings produce
    /// a zero decision.
    pub fn decide(&self, soundings: &ZoneSoundings<'_>, min: f32, max: f32) -> ControlDecision {
        let zones = fuzzify(soundings, min, max);
        let sets = infer(&self.rules, &zones);
        ControlDecision {
            steering_delta: self.defuzzifier.steering(&sets),
            speed: self.defuzzifier.speed(&sets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FuzzyController {
        FuzzyController::new(10.0, 5.0)
    }

    #[test]
    fn test_identical_soundings_no_turn() {
        let cases: [&[f32]; 4] = [
            &[3.0, 3.0, 3.0],
            &[1.0, 5.0, 9.0],
            &[2.0, 7.5],
            &[0.4, 12.0, 6.1, 3.3],
        ];
        for samples in cases {
            let soundings = ZoneSoundings {
                front: samples,
                left: samples,
                right: samples,
            };
            let (min, max) = soundings.observed_bounds().unwrap();
            let decision = controller().decide(&soundings, min, max);
            assert_eq!(decision.steering_delta, 0.0, "samples {:?}", samples);
        }
    }

    #[test]
    fn test_shoal_ahead_turns_toward_deep_left() {
        let soundings = ZoneSoundings {
            front: &[1.0, 1.0, 1.0],
            left: &[10.0, 10.0],
            right: &[1.0, 1.0],
        };
        let decision = controller().decide(&soundings, 1.0, 10.0);
        assert!(decision.steering_delta < 0.0);
        assert!(decision.steering_delta.abs() > 1.0);
    }

    #[test]
    fn test_shoal_ahead_turns_toward_deep_right() {
        let soundings = ZoneSoundings {
            front: &[1.0, 1.0, 1.0],
            left: &[3.0, 3.0],
            right: &[10.0, 10.0],
        };
        let decision = controller().decide(&soundings, 1.0, 10.0);
        assert!(decision.steering_delta > 0.0);
    }

    #[test]
    fn test_mirrored_soundings_mirror_the_turn() {
        let a = ZoneSoundings {
            front: &[2.0, 3.0],
            left: &[8.0, 6.0],
            right: &[2.5, 4.0],
        };
        let b = ZoneSoundings {
            front: a.front,
            left: a.right,
            right: a.left,
        };
        let left_turn = controller().decide(&a, 2.0, 8.0);
        let right_turn = controller().decide(&b, 2.0, 8.0);
        assert!((left_turn.steering_delta + right_turn.steering_delta).abs() < 1e-4);
        assert_eq!(left_turn.speed, right_turn.speed);
    }

    #[test]
    fn test_speed_tracks_water_ahead() {
        let deep_ahead = ZoneSoundings {
            front: &[10.0],
            left: &[1.0],
            right: &[1.0],
        };
        let shallow_ahead = ZoneSoundings {
            front: &[1.0],
            left: &[10.0],
            right: &[10.0],
        };
        let fast = controller().decide(&deep_ahead, 1.0, 10.0).speed;
        let slow = controller().decide(&shallow_ahead, 1.0, 10.0).speed;
        assert!(fast > slow);
        assert!(fast > 2.5);
    }

    #[test]
    fn test_empty_soundings() {
        let soundings = ZoneSoundings::default();
        assert!(soundings.is_empty());
        assert_eq!(soundings.observed_bounds(), None);
        assert_eq!(
            controller().decide(&soundings, 0.0, 0.0),
            ControlDecision::default()
        );
    }

    #[test]
    fn test_output_range_follows_config() {
        let config = ControllerConfig {
            steering_range: 30.0,
            speed_range: 2.0,
            resolution: 20,
        };
        let soundings = ZoneSoundings {
            front: &[1.0],
            left: &[10.0],
            right: &[1.0],
        };
        let decision = FuzzyController::from_config(&config).decide(&soundings, 1.0, 10.0);
        assert!(decision.steering_delta >= -30.0 && decision.steering_delta < 0.0);
        assert!(decision.speed >= 0.0 && decision.speed <= 2.0);
    }
}
