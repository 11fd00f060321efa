//! Rule base: fixed antecedent/consequent table
//!
//! Every rule is a conjunction over the front, left and right zones. A zone left
//! as `None` does not take part in the rule. Consequents name a steering
//! category, a speed category, or both.
//!
//! The table is mirror-symmetric: swapping left and right in every rule (and
//! mirroring steering) yields the same table. That keeps the controller free of
//! turn bias.

use super::fuzzifier::Term;
use super::fuzzifier::Term::{Deep, Medium, Shallow};
use self::Speed::{Full, Half, Slow};
use self::Steering::{HardLeft, HardRight, Left, Right, Straight};

/// Steering categories, ordered left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Steering {
    HardLeft,
    Left,
    Straight,
    Right,
    HardRight,
}

impl Steering {
    pub const ALL: [Steering; 5] = [
        Steering::HardLeft,
        Steering::Left,
        Steering::Straight,
        Steering::Right,
        Steering::HardRight,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }

    /// Peak of the category on the normalized universe [-1, 1]
    pub fn center(self) -> f32 {
        match self {
            Steering::HardLeft => -1.0,
            Steering::Left => -0.5,
            Steering::Straight => 0.0,
            Steering::Right => 0.5,
            Steering::HardRight => 1.0,
        }
    }

    pub fn mirrored(self) -> Self {
        match self {
            Steering::HardLeft => Steering::HardRight,
            Steering::Left => Steering::Right,
            Steering::Straight => Steering::Straight,
            Steering::Right => Steering::Left,
            Steering::HardRight => Steering::HardLeft,
        }
    }
}

/// Speed categories, ordered slow to fast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speed {
    Slow,
    Half,
    Full,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Half, Speed::Full];

    pub fn slot(self) -> usize {
        self as usize
    }

    /// Peak of the category on the normalized universe [0, 1]
    pub fn center(self) -> f32 {
        match self {
            Speed::Slow => 0.0,
            Speed::Half => 0.5,
            Speed::Full => 1.0,
        }
    }
}

/// One row of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub front: Option<Term>,
    pub left: Option<Term>,
    pub right: Option<Term>,
    pub steering: Option<Steering>,
    pub speed: Option<Speed>,
}

impl Rule {
    /// Same rule with the flanks (and steering) swapped
    pub fn mirrored(&self) -> Self {
        Self {
            front: self.front,
            left: self.right,
            right: self.left,
            steering: self.steering.map(Steering::mirrored),
            speed: self.speed,
        }
    }
}

const fn rule(
    front: Option<Term>,
    left: Option<Term>,
    right: Option<Term>,
    steering: Option<Steering>,
    speed: Option<Speed>,
) -> Rule {
    Rule {
        front,
        left,
        right,
        steering,
        speed,
    }
}

/// Standard rules
pub const STANDARD_RULES: [Rule; 14] = [
    // Speed follows the water ahead
    rule(Some(Deep), None, None, Some(Straight), Some(Full)),
    rule(Some(Medium), None, None, None, Some(Half)),
    rule(Some(Shallow), None, None, None, Some(Slow)),
    // Water ahead getting shallower: lean toward the deeper flank
    rule(Some(Medium), Some(Deep), None, Some(Left), None),
    rule(Some(Medium), None, Some(Deep), Some(Right), None),
    rule(Some(Medium), Some(Medium), Some(Medium), Some(Straight), None),
    rule(Some(Medium), Some(Shallow), Some(Shallow), Some(Straight), None),
    // Shoal ahead: turn hard toward open water
    rule(Some(Shallow), Some(Deep), None, Some(HardLeft), None),
    rule(Some(Shallow), None, Some(Deep), Some(HardRight), None),
    rule(Some(Shallow), Some(Medium), None, Some(Left), None),
    rule(Some(Shallow), None, Some(Medium), Some(Right), None),
    rule(Some(Shallow), Some(Shallow), Some(Shallow), Some(Straight), Some(Slow)),
    // Keep off a shallow bank
    rule(None, Some(Shallow), Some(Deep), Some(Right), None),
    rule(None, Some(Deep), Some(Shallow), Some(Left), None),
];

/// Rule table handed to the inference engine
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl Default for RuleBase {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleBase {
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES.to_vec(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule's mirror image is also in the table
    pub fn is_mirror_symmetric(&self) -> bool {
        self.rules
            .iter()
            .all(|rule| self.rules.contains(&rule.mirrored()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_symmetric() {
        assert!(RuleBase::standard().is_mirror_symmetric());
    }

    #[test]
    fn test_every_rule_has_antecedent_and_consequent() {
        for rule in RuleBase::standard().rules() {
            assert!(rule.front.is_some() || rule.left.is_some() || rule.right.is_some());
            assert!(rule.steering.is_some() || rule.speed.is_some());
        }
    }

    #[test]
    fn test_every_front_term_sets_speed() {
        let base = RuleBase::standard();
        for term in Term::ALL {
            assert!(base
                .rules()
                .iter()
                .any(|r| r.front == Some(term) && r.left.is_none() && r.right.is_none() && r.speed.is_some()));
        }
    }

    #[test]
    fn test_mirror_is_involution() {
        for rule in STANDARD_RULES {
            assert_eq!(rule.mirrored().mirrored(), rule);
        }
        for steering in Steering::ALL {
            assert_eq!(steering.mirrored().center(), -steering.center());
        }
    }

    #[test]
    fn test_category_slots_follow_order() {
        for (i, steering) in Steering::ALL.iter().enumerate() {
            assert_eq!(steering.slot(), i);
        }
        for (i, speed) in Speed::ALL.iter().enumerate() {
            assert_eq!(speed.slot(), i);
        }
    }
}
