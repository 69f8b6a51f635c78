use super::ConstraintSelector;
use crate::basic_types::Random;
use crate::containers::HashMap;
use crate::engine::roots::RootSet;
use crate::terms::NodeId;

/// Treats the violated constraints as arms of a multi-armed bandit: the constraint maximising
/// `score + C * sqrt(ln(selections) / moves)` is selected, where a constraint which has not been
/// selected before always takes precedence.
#[derive(Clone, Debug)]
pub(crate) struct BanditSelector {
    exploration_constant: f64,
    scores: HashMap<NodeId, f64>,
    selections: HashMap<NodeId, u64>,
    moves: u64,
}

impl BanditSelector {
    pub(crate) fn new(exploration_constant: f64) -> BanditSelector {
        BanditSelector {
            exploration_constant,
            scores: HashMap::default(),
            selections: HashMap::default(),
            moves: 0,
        }
    }

    fn value(&self, root: NodeId, selections: u64) -> f64 {
        let score = self.scores.get(&root).copied().unwrap_or_default();
        score
            + self.exploration_constant
                * ((selections as f64).ln() / self.moves.max(1) as f64).sqrt()
    }
}

impl ConstraintSelector for BanditSelector {
    fn select(&mut self, roots: &RootSet, _random: &mut dyn Random) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for root in roots.iter() {
            let selections = self.selections.get(&root).copied().unwrap_or_default();
            if selections == 0 {
                best = Some((root, f64::INFINITY));
                break;
            }
            let value = self.value(root, selections);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((root, value));
            }
        }

        let (selected, _) = best?;
        *self.selections.entry(selected).or_default() += 1;
        Some(selected)
    }

    fn uses_scores(&self) -> bool {
        true
    }

    fn update_score(&mut self, root: NodeId, score: f64) {
        let _ = self.scores.insert(root, score);
    }

    fn on_move(&mut self) {
        self.moves += 1;
    }

    fn on_restart(&mut self) {
        self.scores.clear();
        self.selections.clear();
        self.moves = 0;
    }
}
