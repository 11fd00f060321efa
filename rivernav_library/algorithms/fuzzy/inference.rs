//! Inference engine: min for conjunction, max for aggregation

use super::fuzzifier::ZoneMemberships;
use super::rule_base::{Rule, RuleBase, Speed, Steering};

/// Aggregated output fuzzy sets, one clip level per category
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutputSets {
    /// Indexed by [`Steering::slot`]
    pub steering: [f32; 5],
    /// Indexed by [`Speed::slot`]
    pub speed: [f32; 3],
}

impl OutputSets {
    pub fn steering_level(&self, category: Steering) -> f32 {
        self.steering[category.slot()]
    }

    pub fn speed_level(&self, category: Speed) -> f32 {
        self.speed[category.slot()]
    }
}

/// Firing strength of one rule: the weakest of its named antecedents
pub fn firing_strength(rule: &Rule, zones: &ZoneMemberships) -> f32 {
    let antecedents = [
        rule.front.map(|t| zones.front.degree(t)),
        rule.left.map(|t| zones.left.degree(t)),
        rule.right.map(|t| zones.right.degree(t)),
    ];

    antecedents
        .into_iter()
        .flatten()
        .reduce(f32::min)
        .unwrap_or(0.0)
}

/// Stage 3: fire every rule and keep, per category, the strongest firing
pub fn infer(rules: &RuleBase, zones: &ZoneMemberships) -> OutputSets {
    let mut sets = OutputSets::default();

    for rule in rules.rules() {
        let strength = firing_strength(rule, zones);
        if strength <= 0.0 {
            continue;
        }
        if let Some(category) = rule.steering {
            let slot = &mut sets.steering[category.slot()];
            *slot = slot.max(strength);
        }
        if let Some(category) = rule.speed {
            let slot = &mut sets.speed[category.slot()];
            *slot = slot.max(strength);
        }
    }

    sets
}
