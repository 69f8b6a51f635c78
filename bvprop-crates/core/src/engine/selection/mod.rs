//! Strategies for selecting the violated constraint which the next move tries to repair.
mod bandit;
mod uniform;

use std::fmt::Debug;

pub(crate) use bandit::BanditSelector;
pub(crate) use uniform::UniformSelector;

use super::roots::RootSet;
use crate::basic_types::Random;
use crate::terms::NodeId;

/// Selects one of the violated constraints of a [`RootSet`].
pub(crate) trait ConstraintSelector: Debug {
    /// Returns a violated constraint, or `None` if every constraint is satisfied.
    fn select(&mut self, roots: &RootSet, random: &mut dyn Random) -> Option<NodeId>;

    /// Whether the selector needs the scores of the constraints.
    fn uses_scores(&self) -> bool {
        false
    }

    fn update_score(&mut self, _root: NodeId, _score: f64) {}

    /// Called after every applied move.
    fn on_move(&mut self) {}

    /// Called when the search restarts; forgets everything learned during the round.
    fn on_restart(&mut self) {}
}
